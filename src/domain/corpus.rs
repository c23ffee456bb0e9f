// ============================================================
// Layer 3 - Corpus Domain Type
// ============================================================
// A labelled corpus of integer-encoded sentences.
//
// Each sentence is the raw id sequence produced by the caller's
// tokenizer (before any index offset), and each has exactly one
// label at the same position:
//
//   sequences: [[4, 9], [1]]
//   labels:    [ 0,      1 ]
//
// The pairing is checked once here so nothing downstream has to
// worry about it.

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Token sequences paired one-to-one with labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    sequences: Vec<Vec<u32>>,
    labels:    Vec<i32>,
}

impl Corpus {
    /// Pair sequences with labels; both must have the same length.
    pub fn new(sequences: Vec<Vec<u32>>, labels: Vec<i32>) -> Result<Self> {
        if sequences.len() != labels.len() {
            return Err(PrepError::shape(format!(
                "{} sequences but {} labels",
                sequences.len(),
                labels.len()
            )));
        }
        Ok(Self { sequences, labels })
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn sequences(&self) -> &[Vec<u32>] {
        &self.sequences
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Longest sentence, in tokens
    pub fn max_len(&self) -> usize {
        self.sequences.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Split back into the parallel vectors.
    pub fn into_parts(self) -> (Vec<Vec<u32>>, Vec<i32>) {
        (self.sequences, self.labels)
    }
}
