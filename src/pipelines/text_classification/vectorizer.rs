use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Characters treated as separators in addition to whitespace
pub const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// The id shared by padding and out-of-vocabulary tokens
pub const PAD_ID: usize = 0;

/// Which end of an over-long sequence gets dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Truncation {
    /// Drop tokens from the front, keeping the last `max_len`
    Pre,

    /// Drop tokens from the end, keeping the first `max_len`
    #[default]
    Post,
}

/// Lowercases the text and splits it on whitespace and punctuation
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || FILTERS.contains(c))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// A frequency-ranked mapping from tokens to ids.
///
/// Ids start at 1; `PAD_ID` is never handed out. Tokens are ranked by descending frequency, and
/// equally frequent tokens keep the order in which they were first seen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Token to id
    word_index: HashMap<String, usize>,

    /// Tokens ordered by id, offset by one
    words: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary holding at most `num_words - 1` tokens, so every id is below `num_words`
    pub fn fit<S: AsRef<str>>(texts: &[S], num_words: usize) -> Result<Self> {
        if texts.is_empty() {
            return Err(Error::invalid_input(
                "vectorizer",
                "cannot fit a vocabulary on an empty set of texts",
            ));
        }

        if num_words < 2 {
            return Err(Error::invalid_input(
                "vectorizer",
                format!("num_words must leave room for at least one token, got {num_words}"),
            ));
        }

        // Tokens in first-seen order, with their counts
        let mut seen: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for text in texts {
            for token in tokenize(text.as_ref()) {
                match positions.get(&token) {
                    Some(&position) => seen[position].1 += 1,
                    None => {
                        positions.insert(token.clone(), seen.len());
                        seen.push((token, 1));
                    }
                }
            }
        }

        let distinct = seen.len();

        // Stable sort keeps first-seen order among ties
        seen.sort_by(|a, b| b.1.cmp(&a.1));
        seen.truncate(num_words - 1);

        let words: Vec<String> = seen.into_iter().map(|(token, _)| token).collect();
        let word_index = words
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i + 1))
            .collect();

        debug!(
            "Fitted vocabulary: kept {} of {} distinct tokens",
            words.len(),
            distinct
        );

        Ok(Self { word_index, words })
    }

    /// The id of a token, or `PAD_ID` when it is unknown
    pub fn id(&self, token: &str) -> usize {
        self.word_index.get(token).copied().unwrap_or(PAD_ID)
    }

    /// The token behind an id
    pub fn token(&self, id: usize) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|i| self.words.get(i))
            .map(String::as_str)
    }

    /// Number of tokens in the vocabulary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether no token made it into the vocabulary
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of distinct ids, including `PAD_ID`
    pub fn id_space(&self) -> usize {
        self.words.len() + 1
    }

    /// Maps a single text to ids, without padding
    pub fn encode(&self, text: &str) -> Vec<usize> {
        tokenize(text).iter().map(|token| self.id(token)).collect()
    }
}

/// Truncates or zero-pads a sequence of ids to exactly `max_len` entries
pub fn pad_sequence(mut ids: Vec<usize>, max_len: usize, truncation: Truncation) -> Vec<usize> {
    if ids.len() > max_len {
        match truncation {
            Truncation::Pre => {
                ids.drain(..ids.len() - max_len);
            }
            Truncation::Post => ids.truncate(max_len),
        }
    }

    ids.resize(max_len, PAD_ID);
    ids
}

/// Maps every text to a fixed-length sequence of vocabulary ids
pub fn transform<S: AsRef<str>>(
    texts: &[S],
    vocabulary: &Vocabulary,
    max_len: usize,
    truncation: Truncation,
) -> Vec<Vec<usize>> {
    texts
        .iter()
        .map(|text| pad_sequence(vocabulary.encode(text.as_ref()), max_len, truncation))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tokenizes_like_a_word_tokenizer() {
        assert_eq!(
            tokenize("Wow... Loved this place!\tDon't  GO"),
            vec!["wow", "loved", "this", "place", "don't", "go"]
        );
        assert!(tokenize("?!...").is_empty());
    }

    #[test]
    fn ranks_by_frequency_then_first_seen() {
        let texts = ["b a c", "a c d", "c"];

        let vocabulary = Vocabulary::fit(&texts, 100).unwrap();

        // c: 3, a: 2, then b and d once each in first-seen order
        assert_eq!(vocabulary.id("c"), 1);
        assert_eq!(vocabulary.id("a"), 2);
        assert_eq!(vocabulary.id("b"), 3);
        assert_eq!(vocabulary.id("d"), 4);
        assert_eq!(vocabulary.token(3), Some("b"));
        assert_eq!(vocabulary.token(0), None);
        assert_eq!(vocabulary.id_space(), 5);
    }

    #[test]
    fn caps_the_vocabulary_including_the_reserved_id() {
        let texts = ["one two two three three three"];

        let vocabulary = Vocabulary::fit(&texts, 3).unwrap();

        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.id("three"), 1);
        assert_eq!(vocabulary.id("two"), 2);
        assert_eq!(vocabulary.id("one"), PAD_ID);
    }

    #[test]
    fn never_assigns_the_padding_id() {
        let texts = ["the food was great", "the service was slow", "great great food"];

        let vocabulary = Vocabulary::fit(&texts, 5000).unwrap();

        for text in texts {
            for token in tokenize(text) {
                assert_ne!(vocabulary.id(&token), PAD_ID);
            }
        }
    }

    #[test]
    fn rejects_empty_training_texts() {
        let texts: [&str; 0] = [];

        assert!(matches!(
            Vocabulary::fit(&texts, 5000),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn pads_and_truncates_to_max_len() {
        let vocabulary = Vocabulary::fit(&["a b c d e f"], 5000).unwrap();

        let sequences = transform(
            &["a b", "a b c d e f", "a zzz c"],
            &vocabulary,
            4,
            Truncation::Post,
        );

        assert_eq!(
            sequences,
            vec![vec![1, 2, 0, 0], vec![1, 2, 3, 4], vec![1, 0, 3, 0]]
        );
        assert_eq!(
            pad_sequence(vec![1, 2, 3, 4, 5, 6], 4, Truncation::Pre),
            vec![3, 4, 5, 6]
        );
    }

    #[test]
    fn every_sequence_has_max_len_entries_with_trailing_zeros() {
        let texts = ["short", "a somewhat longer sentence here", "", "x y z w v u t s r q"];
        let vocabulary = Vocabulary::fit(&texts, 5000).unwrap();

        let sequences = transform(&texts, &vocabulary, 6, Truncation::Post);

        for (text, sequence) in texts.iter().zip(sequences) {
            let count = tokenize(text).len().min(6);

            assert_eq!(sequence.len(), 6);
            assert!(sequence[..count].iter().all(|&id| id != PAD_ID));
            assert!(sequence[count..].iter().all(|&id| id == PAD_ID));
        }
    }

    #[test]
    fn transform_is_idempotent() {
        let texts = ["Great phone.", "Battery died fast!"];
        let vocabulary = Vocabulary::fit(&texts, 5000).unwrap();

        assert_eq!(
            transform(&texts, &vocabulary, 10, Truncation::Post),
            transform(&texts, &vocabulary, 10, Truncation::Post)
        );
    }
}
