use std::{collections::BTreeMap, fs::File, path::Path, path::PathBuf};

use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{pipelines::text_classification, Error, Result};

use super::Source;

/// A labelled sentence
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Record {
    /// The sentence text
    pub text: String,

    /// 1 for positive sentiment, 0 for negative
    pub label: u8,

    /// Where the sentence came from
    pub source: Source,
}

impl text_classification::Item for Record {
    fn input(&self) -> &str {
        &self.text
    }

    fn label(&self) -> u8 {
        self.label
    }
}

/// The concatenated labelled sentences of every requested source
pub struct Corpus {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Record>,
}

/// Implement the Dataset trait for the corpus
impl dataset::Dataset<Record> for Corpus {
    /// Returns a specific record from the corpus
    fn get(&self, index: usize) -> Option<Record> {
        self.dataset.get(index)
    }

    /// Returns the number of records in the corpus
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

impl Corpus {
    /// Builds a corpus from records that are already in memory
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            dataset: InMemDataset::new(records),
        }
    }

    /// Loads every source file and concatenates them in source enumeration order
    pub fn load(files: &BTreeMap<Source, PathBuf>) -> Result<Self> {
        let mut records = Vec::new();

        for (source, path) in files {
            let loaded = read_source(*source, path)?;

            info!("Loaded {} {} records from {}", loaded.len(), source, path.display());

            records.extend(loaded);
        }

        Ok(Self::from_records(records))
    }

    /// Counts the records contributed by each source
    pub fn count_by_source(&self) -> BTreeMap<Source, usize> {
        let mut counts = BTreeMap::new();

        for record in self.dataset.iter() {
            *counts.entry(record.source).or_insert(0) += 1;
        }

        counts
    }
}

/// Maps every source to its conventional file name inside `data_dir`
pub fn source_files(data_dir: &Path, sources: &[Source]) -> BTreeMap<Source, PathBuf> {
    sources
        .iter()
        .map(|source| (*source, data_dir.join(source.file_name())))
        .collect()
}

fn read_source(source: Source, path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;

    // Sentences carry stray quotes, so quoting is disabled and field counts are checked by hand
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(|e| Error::Format {
            path: path.to_path_buf(),
            line: e.position().map(|p| p.line()).unwrap_or_default(),
            reason: e.to_string(),
        })?;

        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let malformed = |reason: String| Error::Format {
            path: path.to_path_buf(),
            line,
            reason,
        };

        if row.len() != 2 {
            return Err(malformed(format!(
                "expected 2 tab-separated fields, found {}",
                row.len()
            )));
        }

        let label = match row[1].trim() {
            "0" => 0,
            "1" => 1,
            other => return Err(malformed(format!("label must be 0 or 1, found {other:?}"))),
        };

        records.push(Record::new(row[0].to_string(), label, source));
    }

    debug!("Parsed {} rows from {}", records.len(), path.display());

    Ok(records)
}
