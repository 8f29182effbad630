use std::{collections::BTreeMap, path::PathBuf};

use burn::LearningRate;

use crate::{
    datasets::{sentiment, Source},
    Error,
};

use super::vectorizer::Truncation;

/// Define configuration struct for the experiment
#[derive(burn::config::Config)]
pub struct Config {
    /// Directory holding the labelled sentence files
    #[config(default = "\"sentiment_analysis\".to_string()")]
    pub data_dir: String,

    /// Sources to concatenate
    #[config(default = "Source::ALL.to_vec()")]
    pub sources: Vec<Source>,

    /// Where the run's config, history and report are written
    #[config(default = "\"artifacts\".to_string()")]
    pub artifact_dir: String,

    /// Size of the id space, including the reserved padding id
    #[config(default = 5000)]
    pub num_words: usize,

    /// Length every sequence is padded or truncated to
    #[config(default = 100)]
    pub max_len: usize,

    /// Which end of an over-long sequence is dropped
    #[config(default = "Truncation::Post")]
    pub truncation: Truncation,

    /// Embedding width
    #[config(default = 50)]
    pub embedding_dim: usize,

    /// Width of the hidden dense layer
    #[config(default = 10)]
    pub hidden_size: usize,

    /// Share of the corpus held out for testing
    #[config(default = 0.1)]
    pub test_fraction: f64,

    /// Seed for the split, parameter initialization and shuffling
    #[config(default = 1000)]
    pub random_seed: u64,

    /// Number of epochs
    #[config(default = 50)]
    pub epochs: usize,

    /// Batch size
    #[config(default = 128)]
    pub batch_size: usize,

    /// Adam learning rate
    #[config(default = 1e-3)]
    pub learning_rate: LearningRate,
}

impl Config {
    /// Check the settings before any stage runs
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |reason: String| Err(Error::invalid_input("config", reason));

        if self.sources.is_empty() {
            return invalid("at least one source is required".to_string());
        }

        if self.num_words < 2 {
            return invalid(format!("num_words must be at least 2, got {}", self.num_words));
        }

        for (name, value) in [
            ("max_len", self.max_len),
            ("embedding_dim", self.embedding_dim),
            ("hidden_size", self.hidden_size),
            ("epochs", self.epochs),
            ("batch_size", self.batch_size),
        ] {
            if value == 0 {
                return invalid(format!("{name} must be positive"));
            }
        }

        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return invalid(format!(
                "test_fraction must lie strictly between 0 and 1, got {}",
                self.test_fraction
            ));
        }

        if !(self.learning_rate > 0.0) {
            return invalid(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        Ok(())
    }

    /// The input file of every configured source
    pub fn source_files(&self) -> BTreeMap<Source, PathBuf> {
        sentiment::source_files(&PathBuf::from(&self.data_dir), &self.sources)
    }
}

#[cfg(test)]
mod tests {
    use burn::config::Config as _;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_the_reference_experiment() {
        let config = Config::new();

        assert_eq!(config.num_words, 5000);
        assert_eq!(config.max_len, 100);
        assert_eq!(config.embedding_dim, 50);
        assert_eq!(config.test_fraction, 0.1);
        assert_eq!(config.random_seed, 1000);
        assert_eq!(config.epochs, 50);
        assert_eq!(config.batch_size, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unusable_settings() {
        assert!(Config::new().with_batch_size(0).validate().is_err());
        assert!(Config::new().with_num_words(1).validate().is_err());
        assert!(Config::new().with_test_fraction(1.0).validate().is_err());
        assert!(Config::new().with_sources(vec![]).validate().is_err());
    }

    #[test]
    fn locates_files_in_source_order() {
        let config = Config::new()
            .with_data_dir("data".to_string())
            .with_sources(vec![Source::Imdb, Source::Yelp]);

        let files: Vec<_> = config.source_files().into_iter().collect();

        assert_eq!(
            files,
            vec![
                (Source::Yelp, PathBuf::from("data/yelp_labelled.txt")),
                (Source::Imdb, PathBuf::from("data/imdb_labelled.txt")),
            ]
        );
    }

    #[test]
    fn round_trips_through_json() {
        let dir =
            std::env::temp_dir().join(format!("burn-sentiment-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let config = Config::new().with_epochs(3).with_truncation(Truncation::Pre);
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded.epochs, 3);
        assert_eq!(loaded.truncation, Truncation::Pre);
        assert_eq!(loaded.sources, Source::ALL.to_vec());
    }
}
