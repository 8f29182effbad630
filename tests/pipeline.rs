use std::{fs, path::PathBuf};

use burn::backend::{Autodiff, NdArray};
use burn_sentiment::{
    datasets::Source,
    models::embedding_pool,
    pipelines::text_classification::{self, Config},
    Error,
};
use pretty_assertions::assert_eq;

type Backend = Autodiff<NdArray>;

const POSITIVE: [&str; 4] = [
    "Great food and a friendly staff!",
    "I loved it, works great.",
    "A wonderful, moving film.",
    "Excellent value, highly recommended.",
];

const NEGATIVE: [&str; 4] = [
    "Terrible service, cold food.",
    "It broke after a week.",
    "A dull and boring movie.",
    "Awful quality, would not buy again.",
];

/// Write `rows` labelled sentences per source into a fresh directory
fn corpus_dir(name: &str, rows: usize) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("burn-sentiment-it-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    for source in Source::ALL {
        let body: String = (0..rows)
            .map(|i| {
                if i % 2 == 0 {
                    format!("{}\t1\n", POSITIVE[i / 2 % POSITIVE.len()])
                } else {
                    format!("{}\t0\n", NEGATIVE[i / 2 % NEGATIVE.len()])
                }
            })
            .collect();

        fs::write(dir.join(source.file_name()), body).unwrap();
    }

    dir
}

fn small_config(dir: &PathBuf) -> Config {
    Config::new()
        .with_data_dir(dir.to_string_lossy().to_string())
        .with_num_words(50)
        .with_max_len(8)
        .with_embedding_dim(8)
        .with_hidden_size(4)
        .with_test_fraction(0.25)
        .with_epochs(2)
        .with_batch_size(8)
}

fn run(config: &Config) -> burn_sentiment::Result<text_classification::Report> {
    text_classification::run(config, |config, vocabulary| {
        embedding_pool::Classifier::<Backend>::new(
            embedding_pool::Config::for_experiment(config, vocabulary),
            Default::default(),
        )
    })
}

#[test]
fn trains_and_evaluates_on_every_source() {
    let dir = corpus_dir("full", 16);

    let report = run(&small_config(&dir)).unwrap();

    assert_eq!(report.train_len + report.test_len, 48);
    assert_eq!(report.test_len, 12);
    assert_eq!(report.history.len(), 2);
    assert_eq!(report.evaluation.confusion_matrix.total(), 12);
    assert!(report.vocabulary_len > 0 && report.vocabulary_len < 50);
    assert!((0.0..=1.0).contains(&report.evaluation.accuracy));
    assert!((0.0..=1.0).contains(&report.evaluation.f1));
    assert!((0.0..=1.0).contains(&report.evaluation.auc));
}

#[test]
fn loads_only_the_selected_sources() {
    let dir = corpus_dir("selected", 40);
    let config = small_config(&dir)
        .with_sources(vec![Source::Yelp, Source::Imdb])
        .with_epochs(1);

    let report = run(&config).unwrap();

    assert_eq!(report.train_len + report.test_len, 80);
    assert_eq!(report.test_len, 20);
    assert_eq!(report.history.len(), 1);
}

#[test]
fn missing_source_file_is_an_io_error() {
    let dir = corpus_dir("missing", 8);
    fs::remove_file(dir.join(Source::Amazon.file_name())).unwrap();

    let result = run(&small_config(&dir));

    assert!(matches!(result, Err(Error::Io { .. })), "{result:?}");
}

#[test]
fn malformed_label_is_a_format_error() {
    let dir = corpus_dir("malformed", 8);
    fs::write(dir.join(Source::Yelp.file_name()), "Fine.\t1\nNot sure.\tmaybe\n").unwrap();

    let result = run(&small_config(&dir));

    assert!(
        matches!(result, Err(Error::Format { line: 2, .. })),
        "{result:?}"
    );
}
