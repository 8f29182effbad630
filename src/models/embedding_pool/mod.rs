/// The model configuration
pub mod config;

/// Embedding pool model
pub mod model;

/// Adapt the model to the text classification pipeline
pub mod classifier;

pub use classifier::Classifier;
pub use config::Config;
pub use model::Model;
