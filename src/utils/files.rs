use std::{fs, path::Path};

use serde::Serialize;

use crate::{pipelines::text_classification::History, Error, Result};

/// Create a directory and its parents if they are missing
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Write one CSV row per epoch, headed `epoch,loss,accuracy,val_loss,val_accuracy`
pub fn write_history(path: &Path, history: &History) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;

    for metrics in &history.epochs {
        writer.serialize(metrics).map_err(|e| csv_error(path, e))?;
    }

    writer.flush().map_err(|e| Error::io(path, e))
}

/// Write any serializable value as pretty-printed JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| Error::io(path, e.into()))?;

    fs::write(path, json).map_err(|e| Error::io(path, e))
}

fn csv_error(path: &Path, e: csv::Error) -> Error {
    Error::io(path, e.into())
}
