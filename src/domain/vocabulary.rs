// ============================================================
// Layer 3 - Vocabulary Domain Type
// ============================================================
// The word → id mapping shared by both pipelines.
//
// The vocabulary is built elsewhere (by whatever tokenizer the
// caller uses) and handed to us read-only. Ids are the raw ids
// of that tokenizer; the pipelines add the index offset that
// reserves the low ids for padding, start and OOV.
//
// On disk a vocabulary is a flat JSON object:
//   { "the": 0, "movie": 1, "great": 2, ... }

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Immutable word → id mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    word_to_id: HashMap<String, u32>,
}

impl Vocabulary {
    /// Wrap an existing map. Map keys are unique by construction.
    pub fn from_map(word_to_id: HashMap<String, u32>) -> Self {
        Self { word_to_id }
    }

    /// Build from (word, id) pairs, rejecting a word seen twice.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut word_to_id = HashMap::new();
        for (word, id) in pairs {
            let word = word.into();
            if word_to_id.contains_key(&word) {
                return Err(PrepError::DuplicateWord(word));
            }
            word_to_id.insert(word, id);
        }
        Ok(Self { word_to_id })
    }

    /// Read a vocabulary saved as a flat JSON object.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read vocabulary '{}'", path.display()))?;

        let vocab: Self = serde_json::from_str(&json)
            .with_context(|| format!("Vocabulary '{}' is not a word → id object", path.display()))?;

        tracing::debug!("Loaded {} vocabulary words from '{}'", vocab.len(), path.display());
        Ok(vocab)
    }

    pub fn get(&self, word: &str) -> Option<u32> {
        self.word_to_id.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.word_to_id.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.word_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_to_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.word_to_id.iter().map(|(w, &id)| (w.as_str(), id))
    }
}

impl FromIterator<(String, u32)> for Vocabulary {
    /// Collects without the duplicate check; later pairs win.
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        Self { word_to_id: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_pairs_and_lookup() {
        let vocab = Vocabulary::from_pairs([("movie", 0), ("great", 1)]).unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.get("great"), Some(1));
        assert_eq!(vocab.get("awful"), None);
        assert!(vocab.contains("movie"));
    }

    #[test]
    fn test_duplicate_word_rejected() {
        let err = Vocabulary::from_pairs([("movie", 0), ("movie", 4)]).unwrap_err();
        assert!(matches!(err, PrepError::DuplicateWord(w) if w == "movie"));
    }

    #[test]
    fn test_collect_and_iterate() {
        let vocab: Vocabulary = [("plot", 3), ("twist", 5), ("plot", 7)]
            .into_iter()
            .map(|(w, id)| (w.to_string(), id))
            .collect();

        // Collecting keeps the last id for a repeated word
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.get("plot"), Some(7));

        let mut pairs: Vec<(&str, u32)> = vocab.iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![("plot", 7), ("twist", 5)]);
    }

    #[test]
    fn test_json_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"the": 0, "plot": 1}}"#).unwrap();

        let vocab = Vocabulary::from_json_file(file.path()).unwrap();
        assert_eq!(vocab.get("plot"), Some(1));
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_json_file_missing_names_path() {
        let err = Vocabulary::from_json_file("/no/such/vocab.json").unwrap_err();
        assert!(err.to_string().contains("/no/such/vocab.json"));
    }
}
