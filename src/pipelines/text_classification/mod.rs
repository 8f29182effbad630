/// Items and their vectorized form
pub mod item;

/// Tokenization, vocabulary and sequence padding
pub mod vectorizer;

/// Batcher
pub mod batcher;

/// The classifier capability and its training history
pub mod model;

/// Held-out evaluation
pub mod evaluation;

/// Experiment configuration
pub mod config;

/// The end-to-end experiment
pub mod pipeline;

pub use batcher::Batcher;
pub use config::Config;
pub use evaluation::{evaluate, Evaluation};
pub use item::{Encoded, Item};
pub use model::{Classifier, EpochMetrics, History};
pub use pipeline::{run, Report};
pub use vectorizer::{Truncation, Vocabulary};
