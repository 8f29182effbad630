use burn::data::dataset::Dataset;
use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{Error, Result};

/// A train/test partition of labelled items
#[derive(Clone, Debug)]
pub struct Split<I> {
    /// Items used to fit the vocabulary and the classifier
    pub train: Vec<I>,

    /// Held-out items used for validation and evaluation
    pub test: Vec<I>,
}

/// Partitions a dataset with a seeded permutation.
///
/// The test set takes `ceil(test_fraction * n)` items from the front of the permutation and the
/// train set takes the rest, so each item lands in exactly one side. Items move as a whole, which
/// keeps every text paired with its own label.
pub fn train_test_split<I, D>(dataset: &D, test_fraction: f64, seed: u64) -> Result<Split<I>>
where
    D: Dataset<I>,
{
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::invalid_input(
            "split",
            format!("test fraction must lie strictly between 0 and 1, got {test_fraction}"),
        ));
    }

    let total = dataset.len();
    let n_test = (test_fraction * total as f64).ceil() as usize;
    let n_train = total.saturating_sub(n_test);

    if n_test == 0 || n_train == 0 {
        return Err(Error::invalid_input(
            "split",
            format!("{total} records cannot fill both a train and a test set"),
        ));
    }

    let mut indices: Vec<usize> = (0..total).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let (test_indices, train_indices) = indices.split_at(n_test);
    let collect = |indices: &[usize]| -> Vec<I> {
        indices.iter().filter_map(|&i| dataset.get(i)).collect()
    };

    let split = Split {
        train: collect(train_indices),
        test: collect(test_indices),
    };

    info!(
        "Split {} records into {} train / {} test",
        total,
        split.train.len(),
        split.test.len()
    );

    Ok(split)
}

#[cfg(test)]
mod tests {
    use burn::data::dataset::InMemDataset;
    use pretty_assertions::assert_eq;

    use super::*;

    fn numbers(n: usize) -> InMemDataset<usize> {
        InMemDataset::new((0..n).collect())
    }

    #[test]
    fn sizes_follow_the_test_fraction() {
        let split = train_test_split(&numbers(3000), 0.1, 1000).unwrap();

        assert_eq!(split.test.len(), 300);
        assert_eq!(split.train.len(), 2700);
    }

    #[test]
    fn rounds_the_test_share_up() {
        let split = train_test_split(&numbers(11), 0.1, 7).unwrap();

        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 9);
    }

    #[test]
    fn partitions_every_item_exactly_once() {
        let split = train_test_split(&numbers(57), 0.25, 3).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();

        assert_eq!(all, (0..57).collect::<Vec<_>>());
    }

    #[test]
    fn is_stable_for_a_fixed_seed() {
        let first = train_test_split(&numbers(100), 0.1, 1000).unwrap();
        let second = train_test_split(&numbers(100), 0.1, 1000).unwrap();
        let other = train_test_split(&numbers(100), 0.1, 1001).unwrap();

        assert_eq!(first.test, second.test);
        assert_eq!(first.train, second.train);
        assert_ne!(first.test, other.test);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert!(train_test_split(&numbers(0), 0.1, 1).is_err());
        assert!(train_test_split(&numbers(1), 0.1, 1).is_err());
        assert!(train_test_split(&numbers(10), 0.0, 1).is_err());
        assert!(train_test_split(&numbers(10), 1.0, 1).is_err());
    }
}
