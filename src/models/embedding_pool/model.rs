use burn::{
    module::Module,
    nn::{
        loss::{MseLoss, Reduction},
        Embedding, Linear,
    },
    tensor::{
        activation::relu,
        backend::{AutodiffBackend, Backend},
        Int, Tensor,
    },
    train::{RegressionOutput, TrainOutput, TrainStep, ValidStep},
};

use crate::pipelines::text_classification::batcher;

/// Token embeddings, max-pooled over positions, followed by two dense layers
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    /// Token embeddings
    pub embedding: Embedding<B>,

    /// Hidden dense layer, relu activated
    pub hidden: Linear<B>,

    /// Single-unit output layer with a linear activation
    pub output: Linear<B>,
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Scores `[batch, seq_len]` token ids, returning a `[batch, 1]` column
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let embedded = self.embedding.forward(tokens);

        // Pool over the last dimension, padding positions included
        let pooled = embedded.swap_dims(1, 2).max_dim(2).squeeze::<2>(2);

        let hidden = relu(self.hidden.forward(pooled));

        self.output.forward(hidden)
    }

    /// Defines forward pass for training, with the squared error against the labels
    pub fn forward_regression(&self, item: batcher::Train<B>) -> RegressionOutput<B> {
        let targets = item.targets;
        let output = self.forward(item.input.tokens);

        let loss = MseLoss::new().forward(output.clone(), targets.clone(), Reduction::Mean);

        RegressionOutput {
            loss,
            output,
            targets,
        }
    }

    /// Defines forward pass for inference
    pub fn infer(&self, input: batcher::Infer<B>) -> Tensor<B, 2> {
        self.forward(input.tokens)
    }
}

/// Define training step
impl<B: AutodiffBackend> TrainStep<batcher::Train<B>, RegressionOutput<B>> for Model<B> {
    fn step(&self, item: batcher::Train<B>) -> TrainOutput<RegressionOutput<B>> {
        let output = self.forward_regression(item);
        let grads = output.loss.backward();

        TrainOutput::new(self, grads, output)
    }
}

/// Define validation step
impl<B: Backend> ValidStep<batcher::Train<B>, RegressionOutput<B>> for Model<B> {
    fn step(&self, item: batcher::Train<B>) -> RegressionOutput<B> {
        self.forward_regression(item)
    }
}
