//! # Burn Sentiment
#![forbid(unsafe_code)]

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// Datasets
pub mod datasets;

/// Utilities
pub mod utils;

/// Pipeline errors
pub mod error;

pub use error::{Error, Result};
