use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The UCI Sentiment Labelled Sentences corpus
pub mod sentiment;

/// Seeded train/test splitting
pub mod split;

pub use sentiment::{Corpus, Record};
pub use split::{train_test_split, Split};

/// The sources making up the labelled sentences corpus, in concatenation order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Yelp restaurant reviews
    Yelp,

    /// Amazon product reviews
    Amazon,

    /// IMDb movie reviews
    Imdb,
}

impl Source {
    /// Every source, in enumeration order
    pub const ALL: [Source; 3] = [Source::Yelp, Source::Amazon, Source::Imdb];

    /// Get the unique string token that identifies this source
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Yelp => "yelp",
            Source::Amazon => "amazon",
            Source::Imdb => "imdb",
        }
    }

    /// The file name the source is distributed under
    pub fn file_name(&self) -> &'static str {
        match self {
            Source::Yelp => "yelp_labelled.txt",
            Source::Amazon => "amazon_cells_labelled.txt",
            Source::Imdb => "imdb_labelled.txt",
        }
    }
}

impl TryFrom<&str> for Source {
    type Error = DatasetError;

    /// Try to convert a string to a Source
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let name = value.trim().to_lowercase();

        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == name)
            .ok_or_else(|| DatasetError::Unknown(value.to_string()))
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// No source found for the given string
    #[error("no dataset source found for {0}")]
    Unknown(String),
}
