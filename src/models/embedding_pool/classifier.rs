//! Adapt the embedding pool model to the text classification pipeline

use burn::{
    data::{
        dataloader::{batcher::Batcher as BatcherTrait, DataLoaderBuilder},
        dataset::InMemDataset,
    },
    module::{AutodiffModule, Module},
    optim::{AdamConfig, Optimizer},
    tensor::{
        backend::{AutodiffBackend, Backend},
        ElementConversion,
    },
    train::{RegressionOutput, TrainStep, ValidStep},
};
use log::{debug, info};

use crate::{
    pipelines::text_classification::{
        self, batcher, evaluation::binarize, Batcher, Encoded, EpochMetrics, History,
    },
    utils::tensors::to_vec,
    Error, Result,
};

use super::{Config, Model};

/// A Burn-backed classifier owning its model parameters
pub struct Classifier<B: AutodiffBackend> {
    /// The model configuration
    config: Config,

    /// Current parameters
    model: Model<B>,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    device: B::Device,
}

impl<B: AutodiffBackend> Classifier<B> {
    /// Seed the backend and initialize fresh parameters
    pub fn new(config: Config, device: B::Device) -> Self {
        B::seed(config.seed);

        let model = config.init::<B>(&device);

        info!(
            "Initialized embedding pool model with {} parameters",
            model.num_params()
        );

        Self {
            config,
            model,
            device,
        }
    }

    /// The current parameters
    pub fn model(&self) -> &Model<B> {
        &self.model
    }
}

impl<B: AutodiffBackend> text_classification::Classifier for Classifier<B> {
    fn train(
        &mut self,
        train: Vec<Encoded>,
        validation: Vec<Encoded>,
        epochs: usize,
        batch_size: usize,
    ) -> Result<History> {
        if train.is_empty() || validation.is_empty() {
            return Err(Error::invalid_input(
                "classifier",
                "training needs both training and validation items",
            ));
        }

        if batch_size == 0 {
            return Err(Error::invalid_input("classifier", "batch size must be positive"));
        }

        let batcher_train = Batcher::<B>::new(self.config.max_len, self.device.clone());
        let batcher_valid =
            Batcher::<B::InnerBackend>::new(self.config.max_len, self.device.clone());

        let dataloader_train = DataLoaderBuilder::new(batcher_train)
            .batch_size(batch_size)
            .shuffle(self.config.seed)
            .build(InMemDataset::new(train));

        let dataloader_valid = DataLoaderBuilder::new(batcher_valid)
            .batch_size(batch_size)
            .build(InMemDataset::new(validation));

        let mut optim = AdamConfig::new()
            .with_epsilon(self.config.adam_epsilon)
            .init();

        let mut model = self.model.clone();
        let mut history = History::default();

        for epoch in 1..=epochs {
            let mut train_stats = Running::default();

            for batch in dataloader_train.iter() {
                let output = TrainStep::step(&model, batch);
                train_stats.update(&output.item);

                model = optim.step(self.config.learning_rate, model, output.grads);
            }

            let model_valid = model.valid();
            let mut valid_stats = Running::default();

            for batch in dataloader_valid.iter() {
                valid_stats.update(&ValidStep::step(&model_valid, batch));
            }

            let metrics = EpochMetrics::new(
                epoch,
                train_stats.loss(),
                train_stats.accuracy(),
                valid_stats.loss(),
                valid_stats.accuracy(),
            );

            debug!(
                "Epoch {:>3}/{} | loss={:.4} | acc={:.4} | val_loss={:.4} | val_acc={:.4}",
                epoch,
                epochs,
                metrics.loss,
                metrics.accuracy,
                metrics.val_loss,
                metrics.val_accuracy
            );

            history.push(metrics);
        }

        self.model = model;

        if let Some(last) = history.last() {
            info!(
                "Training finished: acc={:.4} val_acc={:.4}",
                last.accuracy, last.val_accuracy
            );
        }

        Ok(history)
    }

    fn predict(&self, sequences: Vec<Vec<usize>>) -> Result<Vec<f32>> {
        if self.config.predict_batch_size == 0 {
            return Err(Error::invalid_input(
                "classifier",
                "prediction batch size must be positive",
            ));
        }

        let model = self.model.valid();
        let batcher_infer =
            Batcher::<B::InnerBackend>::new(self.config.max_len, self.device.clone());

        let mut scores = Vec::with_capacity(sequences.len());

        for chunk in sequences.chunks(self.config.predict_batch_size) {
            let input: batcher::Infer<B::InnerBackend> = batcher_infer.batch(chunk.to_vec());

            scores.extend(to_vec(model.infer(input)));
        }

        Ok(scores)
    }
}

/// Sample-weighted loss and thresholded accuracy over an epoch
#[derive(Default)]
struct Running {
    loss_sum: f64,
    correct: usize,
    seen: usize,
}

impl Running {
    fn update<B: Backend>(&mut self, output: &RegressionOutput<B>) {
        let batch_size = output.targets.dims()[0];
        let loss = output.loss.clone().into_scalar().elem::<f64>();

        let predictions = binarize(&to_vec(output.output.clone()));
        let targets = to_vec(output.targets.clone());

        self.correct += predictions
            .iter()
            .zip(targets)
            .filter(|(prediction, target)| **prediction as f32 == *target)
            .count();
        self.loss_sum += loss * batch_size as f64;
        self.seen += batch_size;
    }

    fn loss(&self) -> f64 {
        self.loss_sum / self.seen.max(1) as f64
    }

    fn accuracy(&self) -> f64 {
        self.correct as f64 / self.seen.max(1) as f64
    }
}
