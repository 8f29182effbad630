use burn::{
    module::Param,
    nn::{EmbeddingConfig, Initializer, Linear, LinearConfig},
    tensor::{backend::Backend, Tensor},
    LearningRate,
};

use crate::pipelines::text_classification::{self, Vocabulary};

use super::Model;

/// The Model Configuration
#[derive(burn::config::Config)]
pub struct Config {
    /// Number of embedding rows, including the padding id
    pub vocab_size: usize,

    /// Length of every input sequence
    pub max_len: usize,

    /// Embedding width
    #[config(default = 50)]
    pub embedding_dim: usize,

    /// Width of the hidden dense layer
    #[config(default = 10)]
    pub hidden_size: usize,

    /// Adam learning rate
    #[config(default = 1e-3)]
    pub learning_rate: LearningRate,

    /// Adam epsilon
    #[config(default = 1e-7)]
    pub adam_epsilon: f32,

    /// Seed for parameter initialization and batch shuffling
    #[config(default = 1000)]
    pub seed: u64,

    /// Batch size used by `predict`
    #[config(default = 32)]
    pub predict_batch_size: usize,
}

impl Config {
    /// Derive the model settings from the experiment and its fitted vocabulary
    pub fn for_experiment(
        experiment: &text_classification::Config,
        vocabulary: &Vocabulary,
    ) -> Self {
        Config::new(vocabulary.id_space(), experiment.max_len)
            .with_embedding_dim(experiment.embedding_dim)
            .with_hidden_size(experiment.hidden_size)
            .with_learning_rate(experiment.learning_rate)
            .with_seed(experiment.random_seed)
    }

    /// Initializes a model with fresh weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim)
            .with_initializer(Initializer::Uniform {
                min: -0.05,
                max: 0.05,
            })
            .init(device);

        let hidden = dense(self.embedding_dim, self.hidden_size, device);
        let output = dense(self.hidden_size, 1, device);

        Model {
            embedding,
            hidden,
            output,
        }
    }
}

/// A Glorot-uniform dense layer whose bias starts at zero
fn dense<B: Backend>(d_input: usize, d_output: usize, device: &B::Device) -> Linear<B> {
    let mut linear = LinearConfig::new(d_input, d_output)
        .with_initializer(Initializer::XavierUniform { gain: 1.0 })
        .init(device);

    linear.bias = Some(Param::from_tensor(Tensor::zeros([d_output], device)));

    linear
}
