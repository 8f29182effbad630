use burn::{
    data::dataloader,
    tensor::{backend::Backend, Int, Tensor},
};
use derive_new::new;

use crate::utils::tensors::{label_column, pad_to};

use super::{item::Encoded, vectorizer::PAD_ID};

/// An inference batch of token ids
#[derive(Clone, Debug, new)]
pub struct Infer<B: Backend> {
    /// Token ids, `[batch, max_len]`
    pub tokens: Tensor<B, 2, Int>,
}

/// A training batch for binary text classification
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// Model input
    pub input: Infer<B>,

    /// Labels as a `[batch, 1]` float column
    pub targets: Tensor<B, 2>,
}

/// Struct for batching vectorized items
#[derive(Clone, new)]
pub struct Batcher<B: Backend> {
    /// Sequence length every row is brought to
    max_len: usize,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    device: B::Device,
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<Vec<usize>, Infer<B>> for Batcher<B> {
    /// Stacks token id sequences into an inference batch
    fn batch(&self, items: Vec<Vec<usize>>) -> Infer<B> {
        Infer {
            tokens: pad_to::<B>(PAD_ID, items, self.max_len, &self.device),
        }
    }
}

/// Implement Batcher trait for Batcher struct for training
impl<B: Backend> dataloader::batcher::Batcher<Encoded, Train<B>> for Batcher<B> {
    /// Stacks vectorized items into a training batch
    fn batch(&self, items: Vec<Encoded>) -> Train<B> {
        let labels: Vec<u8> = items.iter().map(|item| item.label).collect();
        let tokens: Vec<Vec<usize>> = items.into_iter().map(|item| item.tokens).collect();

        Train {
            input: dataloader::batcher::Batcher::<Vec<usize>, Infer<B>>::batch(self, tokens),
            targets: label_column::<B>(&labels, &self.device),
        }
    }
}
