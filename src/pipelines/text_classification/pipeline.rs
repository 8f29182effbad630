use burn::data::dataset::Dataset as _;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    datasets::{train_test_split, Corpus},
    Result,
};

use super::{
    evaluation::{evaluate, Evaluation},
    item::Encoded,
    model::{Classifier, History},
    vectorizer::{transform, Vocabulary},
    Config, Item,
};

/// The outcome of a full experiment run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    /// Number of training records
    pub train_len: usize,

    /// Number of held-out records
    pub test_len: usize,

    /// Number of tokens in the fitted vocabulary
    pub vocabulary_len: usize,

    /// Per-epoch training curves
    pub history: History,

    /// Held-out metrics
    pub evaluation: Evaluation,
}

/// Load, split, vectorize, train, predict and evaluate, one stage after the other.
///
/// `init` builds the classifier once the vocabulary is known, which keeps this function agnostic
/// to the numerical backend.
pub fn run<C, F>(config: &Config, init: F) -> Result<Report>
where
    C: Classifier,
    F: FnOnce(&Config, &Vocabulary) -> C,
{
    config.validate()?;

    let corpus = Corpus::load(&config.source_files())?;
    info!("Corpus ready: {} records {:?}", corpus.len(), corpus.count_by_source());

    let split = train_test_split(&corpus, config.test_fraction, config.random_seed)?;

    let train_texts = inputs(&split.train);
    let vocabulary = Vocabulary::fit(&train_texts, config.num_words)?;
    info!("Vocabulary holds {} tokens", vocabulary.len());

    let train = encode(&split.train, &vocabulary, config);
    let test = encode(&split.test, &vocabulary, config);

    let mut classifier = init(config, &vocabulary);

    info!("Training for {} epochs...", config.epochs);
    let history = classifier.train(train, test.clone(), config.epochs, config.batch_size)?;

    info!("Running inference...");
    let (sequences, labels): (Vec<_>, Vec<_>) =
        test.into_iter().map(|item| (item.tokens, item.label)).unzip();
    let scores = classifier.predict(sequences)?;

    let evaluation = evaluate(&labels, &scores)?;

    Ok(Report {
        train_len: split.train.len(),
        test_len: split.test.len(),
        vocabulary_len: vocabulary.len(),
        history,
        evaluation,
    })
}

fn inputs<I: Item>(items: &[I]) -> Vec<&str> {
    items.iter().map(|item| item.input()).collect()
}

fn encode<I: Item>(items: &[I], vocabulary: &Vocabulary, config: &Config) -> Vec<Encoded> {
    transform(&inputs(items), vocabulary, config.max_len, config.truncation)
        .into_iter()
        .zip(items)
        .map(|(tokens, item)| Encoded::new(tokens, item.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{datasets::Source, pipelines::text_classification::model::EpochMetrics};

    /// Scores every sequence by whether it contains the id of "good"
    struct KeywordClassifier {
        positive: usize,
        trained: bool,
    }

    impl Classifier for KeywordClassifier {
        fn train(
            &mut self,
            train: Vec<Encoded>,
            validation: Vec<Encoded>,
            epochs: usize,
            _batch_size: usize,
        ) -> Result<History> {
            assert!(!train.is_empty() && !validation.is_empty());
            self.trained = true;

            let mut history = History::default();
            for epoch in 1..=epochs {
                history.push(EpochMetrics::new(epoch, 0.0, 1.0, 0.0, 1.0));
            }

            Ok(history)
        }

        fn predict(&self, sequences: Vec<Vec<usize>>) -> Result<Vec<f32>> {
            assert!(self.trained);

            Ok(sequences
                .iter()
                .map(|tokens| if tokens.contains(&self.positive) { 0.9 } else { 0.1 })
                .collect())
        }
    }

    #[test]
    fn runs_every_stage_in_order() {
        let dir = std::env::temp_dir().join(format!("burn-sentiment-run-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        for source in Source::ALL {
            let rows: String = (0..20)
                .map(|i| {
                    if i % 2 == 0 {
                        format!("A good {source} experience number {i}.\t1\n")
                    } else {
                        format!("A poor {source} experience number {i}.\t0\n")
                    }
                })
                .collect();
            fs::write(dir.join(source.file_name()), rows).unwrap();
        }

        let config = Config::new()
            .with_data_dir(dir.to_string_lossy().to_string())
            .with_test_fraction(0.25)
            .with_epochs(3)
            .with_max_len(8);

        let report = run(&config, |_, vocabulary| KeywordClassifier {
            positive: vocabulary.id("good"),
            trained: false,
        })
        .unwrap();

        assert_eq!(report.train_len + report.test_len, 60);
        assert_eq!(report.test_len, 15);
        assert_eq!(report.history.len(), 3);
        assert_eq!(report.evaluation.accuracy, 1.0);
        assert_eq!(report.evaluation.confusion_matrix.total(), 15);
    }
}
