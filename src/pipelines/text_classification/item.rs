use std::fmt::Debug;

use derive_new::new;
use serde::{Deserialize, Serialize};

/// A trait for items that can be used for binary text classification
pub trait Item: Send + Sync + Clone + Debug {
    /// Returns the input text for the item
    fn input(&self) -> &str;

    /// Returns the binary label for the item
    fn label(&self) -> u8;
}

/// A vectorized item, ready to be batched
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Encoded {
    /// Fixed-length token ids
    pub tokens: Vec<usize>,

    /// The binary label
    pub label: u8,
}
