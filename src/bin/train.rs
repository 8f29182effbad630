//! Command line tool to run the sentiment experiment end to end

use std::path::PathBuf;

use anyhow::anyhow;
use burn::config::Config as _;
use burn_sentiment::{
    datasets::Source,
    models::embedding_pool,
    pipelines::text_classification::{self, Config},
    utils::files,
};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Usage: train [OPTIONS]

Options:
  -h, --help           Print help
  -c, --config         A JSON experiment config to start from
  -d, --data-dir       The labelled sentence directory (defaults to 'sentiment_analysis')
  -o, --artifact-dir   Where to write the config, history and report (defaults to 'artifacts')
  -n, --num-epochs     Number of epochs to train for
  -b, --batch-size     Batch size
  -s, --seed           Seed for the split, initialization and shuffling
  --sources            Comma-separated sources to load (e.g., 'yelp,amazon,imdb')
";

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    data_dir: Option<String>,
    artifact_dir: Option<String>,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    seed: Option<u64>,
    sources: Option<String>,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            artifact_dir: pargs.opt_value_from_str(["-o", "--artifact-dir"])?,
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            seed: pargs.opt_value_from_str(["-s", "--seed"])?,
            sources: pargs.opt_value_from_str("--sources")?,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        Ok(Some(args))
    }

    /// Layer the flags over the config file, or over the defaults when there is none
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .map_err(|e| anyhow!("Unable to load config {}: {}", path.display(), e))?,
            None => Config::new(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.to_string();
        }

        if let Some(artifact_dir) = &self.artifact_dir {
            config.artifact_dir = artifact_dir.to_string();
        }

        if let Some(num_epochs) = self.num_epochs {
            config.epochs = num_epochs;
        }

        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }

        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }

        if let Some(sources) = &self.sources {
            config.sources = sources
                .split(',')
                .map(Source::try_from)
                .collect::<Result<Vec<_>, _>>()?;
        }

        Ok(config)
    }
}

#[cfg(not(feature = "tch"))]
mod backend {
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

    pub type Backend = Autodiff<NdArray>;

    pub fn device() -> NdArrayDevice {
        NdArrayDevice::Cpu
    }
}

#[cfg(feature = "tch")]
mod backend {
    use burn::backend::{libtorch::LibTorchDevice, Autodiff, LibTorch};

    pub type Backend = Autodiff<LibTorch>;

    pub fn device() -> LibTorchDevice {
        LibTorchDevice::Cuda(0)
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let config = args.config()?;
    let device = backend::device();

    let report = text_classification::run(&config, |config, vocabulary| {
        embedding_pool::Classifier::<backend::Backend>::new(
            embedding_pool::Config::for_experiment(config, vocabulary),
            device.clone(),
        )
    })?;

    println!("{}", report.evaluation);

    let artifact_dir = PathBuf::from(&config.artifact_dir);
    files::ensure_dir(&artifact_dir)?;

    config
        .save(artifact_dir.join("config.json"))
        .map_err(|e| anyhow!("Unable to save config: {}", e))?;
    files::write_history(&artifact_dir.join("history.csv"), &report.history)?;
    files::write_json(&artifact_dir.join("report.json"), &report)?;

    info!("Artifacts written to {}", artifact_dir.display());

    Ok(())
}
