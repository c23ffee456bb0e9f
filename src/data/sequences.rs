// ============================================================
// Layer 4 - Sequence Batcher
// ============================================================
// Turns a labelled corpus of raw id sequences into one padded
// id matrix plus a label column.
//
// Steps (applied in order):
//   1. Shuffle sentences and labels with one seeded permutation
//   2. Shift every id by index_offset, optionally prepending
//      the start id
//   3. Cap the vocabulary: ids >= vocab_capacity become the OOV
//      id, or are dropped when there is no OOV id
//   4. Pad/truncate every row to sentence_length
//   5. Reshape labels into an (n, 1) column
//
// Reserved ids (the caller picks index_offset to match):
//   0 = padding   1 = start   2 = out-of-vocabulary
//
// Example (start 1, offset 3, no cap, length 3):
//   [[4, 9], [1]]  →  [[1, 7, 12], [1, 4]]  →  [[1, 7, 12],
//                                               [0, 1,  4]]

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::padding::{pad_sequences, PaddedMatrix};
use crate::data::shuffle::shuffle_pair;
use crate::domain::corpus::Corpus;
use crate::error::{PrepError, Result};

/// Shape (num_samples, 1) label matrix.
pub type LabelColumn = Array2<i32>;

pub const PAD_ID: u32 = 0;
pub const START_ID: u32 = 1;
pub const OOV_ID: u32 = 2;

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Ids at or above this are capped; None or 0 disables capping
    pub vocab_capacity: Option<u32>,
    /// Row width; None pads to the longest sentence
    pub sentence_length: Option<usize>,
    /// Replacement for capped ids; None drops them instead
    pub oov_id: Option<u32>,
    /// Id prepended to every sentence; None prepends nothing
    pub start_id: Option<u32>,
    /// Added to every raw id
    pub index_offset: u32,
    /// Seed for the shuffle permutation
    pub seed: u64,
    pub shuffle: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            vocab_capacity:  Some(20_000),
            sentence_length: Some(100),
            oov_id:          Some(OOV_ID),
            start_id:        Some(START_ID),
            index_offset:    3,
            seed:            113,
            shuffle:         true,
        }
    }
}

// ─── SequenceBatcher ─────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default)]
pub struct SequenceBatcher {
    config: BatchConfig,
}

impl SequenceBatcher {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Pad a corpus given as parallel sequences and labels.
    ///
    /// Fails with `ShapeMismatch` when the lengths differ.
    pub fn prepare(
        &self,
        sequences: Vec<Vec<u32>>,
        labels:    Vec<i32>,
    ) -> Result<(PaddedMatrix, LabelColumn)> {
        self.prepare_corpus(Corpus::new(sequences, labels)?)
    }

    /// Pad an already paired corpus.
    pub fn prepare_corpus(&self, corpus: Corpus) -> Result<(PaddedMatrix, LabelColumn)> {
        let cfg = &self.config;
        let (mut sequences, mut labels) = corpus.into_parts();

        // ── Step 1: Shuffle ──────────────────────────────────────────────────
        if cfg.shuffle {
            (sequences, labels) = shuffle_pair(sequences, labels, cfg.seed);
        }

        // ── Step 2: Offset ids and prepend start ─────────────────────────────
        let mut sequences = sequences
            .into_iter()
            .map(|seq| self.offset_ids(seq))
            .collect::<Result<Vec<_>>>()?;

        // ── Step 3: Cap the vocabulary ───────────────────────────────────────
        match cfg.vocab_capacity.filter(|&cap| cap > 0) {
            Some(cap) => cap_vocabulary(&mut sequences, cap, cfg.oov_id),
            None => tracing::debug!(
                "No vocabulary cap; largest id is {}",
                sequences.iter().flatten().max().copied().unwrap_or(0)
            ),
        }

        // ── Step 4: Pad / truncate ───────────────────────────────────────────
        let padded = pad_sequences(&sequences, cfg.sentence_length, PAD_ID);

        // ── Step 5: Label column ─────────────────────────────────────────────
        let rows   = labels.len();
        let labels = Array2::from_shape_vec((rows, 1), labels)
            .map_err(|e| PrepError::shape(format!("label column: {e}")))?;

        tracing::debug!(
            "Prepared {} samples of width {}",
            padded.nrows(),
            padded.ncols()
        );

        Ok((padded, labels))
    }

    fn offset_ids(&self, seq: Vec<u32>) -> Result<Vec<u32>> {
        let offset = self.config.index_offset;
        let start  = self.config.start_id;

        let mut out = Vec::with_capacity(seq.len() + usize::from(start.is_some()));
        out.extend(start);

        for id in seq {
            let shifted = id
                .checked_add(offset)
                .ok_or(PrepError::IdOverflow { id, offset })?;
            out.push(shifted);
        }
        Ok(out)
    }
}

/// Replace (or drop) every id at or above `cap`.
fn cap_vocabulary(sequences: &mut [Vec<u32>], cap: u32, oov_id: Option<u32>) {
    match oov_id {
        Some(oov) => sequences
            .iter_mut()
            .flat_map(|seq| seq.iter_mut())
            .filter(|id| **id >= cap)
            .for_each(|id| *id = oov),
        None => sequences
            .iter_mut()
            .for_each(|seq| seq.retain(|&id| id < cap)),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    fn unshuffled() -> BatchConfig {
        BatchConfig {
            vocab_capacity:  None,
            sentence_length: Some(3),
            shuffle:         false,
            ..BatchConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let batcher = SequenceBatcher::new(unshuffled());
        let (x, y)  = batcher.prepare(vec![vec![4, 9], vec![1]], vec![0, 1]).unwrap();

        assert_eq!(x, array![[1u32, 7, 12], [0, 1, 4]]);
        assert_eq!(y, array![[0i32], [1]]);
    }

    #[test]
    fn test_oov_substitution_keeps_length() {
        let batcher = SequenceBatcher::new(BatchConfig {
            vocab_capacity:  Some(5),
            oov_id:          Some(2),
            start_id:        None,
            index_offset:    0,
            sentence_length: None,
            shuffle:         false,
            ..BatchConfig::default()
        });

        let (x, _) = batcher.prepare(vec![vec![3, 7, 4]], vec![1]).unwrap();
        assert_eq!(x, array![[3u32, 2, 4]]);
    }

    #[test]
    fn test_without_oov_capped_ids_are_dropped() {
        let batcher = SequenceBatcher::new(BatchConfig {
            vocab_capacity:  Some(5),
            oov_id:          None,
            start_id:        None,
            index_offset:    0,
            sentence_length: None,
            shuffle:         false,
            ..BatchConfig::default()
        });

        // Longest row after dropping is 2, so width is 2
        let (x, _) = batcher.prepare(vec![vec![3, 7, 4], vec![9]], vec![1, 0]).unwrap();
        assert_eq!(x, array![[3u32, 4], [0, 0]]);
    }

    #[test]
    fn test_zero_capacity_means_uncapped() {
        let batcher = SequenceBatcher::new(BatchConfig {
            vocab_capacity: Some(0),
            ..unshuffled()
        });
        let (x, _) = batcher.prepare(vec![vec![500]], vec![0]).unwrap();
        assert_eq!(x, array![[0u32, 1, 503]]);
    }

    #[test]
    fn test_start_id_is_capped_like_any_other() {
        let batcher = SequenceBatcher::new(BatchConfig {
            vocab_capacity: Some(1),
            oov_id:         Some(0),
            ..unshuffled()
        });
        let (x, _) = batcher.prepare(vec![vec![0]], vec![0]).unwrap();
        assert_eq!(x, array![[0u32, 0, 0]]);
    }

    #[test]
    fn test_long_sentence_keeps_tail() {
        let batcher = SequenceBatcher::new(unshuffled());
        let (x, _) = batcher.prepare(vec![vec![1, 2, 3, 4]], vec![0]).unwrap();
        assert_eq!(x, array![[5u32, 6, 7]]);
    }

    #[test]
    fn test_mismatched_labels_fail() {
        let batcher = SequenceBatcher::default();
        let err = batcher.prepare(vec![vec![1], vec![2]], vec![0]).unwrap_err();
        assert!(matches!(err, PrepError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_offset_overflow_fails() {
        let batcher = SequenceBatcher::new(unshuffled());
        let err = batcher.prepare(vec![vec![u32::MAX]], vec![0]).unwrap_err();
        assert!(matches!(err, PrepError::IdOverflow { .. }));
    }

    #[test]
    fn test_empty_corpus() {
        let batcher = SequenceBatcher::default();
        let (x, y)  = batcher.prepare(Vec::new(), Vec::new()).unwrap();
        assert_eq!(x.dim(), (0, 100));
        assert_eq!(y.dim(), (0, 1));
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let batcher = SequenceBatcher::new(BatchConfig { shuffle: true, ..unshuffled() });
        let seqs: Vec<Vec<u32>> = (0..20).map(|i| vec![i]).collect();
        let labels: Vec<i32>    = (0..20).collect();

        let first  = batcher.prepare(seqs.clone(), labels.clone()).unwrap();
        let second = batcher.prepare(seqs, labels).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_shuffle_keeps_rows_paired(n in 1usize..40, seed in any::<u64>()) {
            let batcher = SequenceBatcher::new(BatchConfig {
                seed,
                shuffle: true,
                sentence_length: Some(2),
                ..unshuffled()
            });

            // Sentence i is [i] and label i is i, so pairing is checkable
            let seqs: Vec<Vec<u32>> = (0..n as u32).map(|i| vec![i]).collect();
            let labels: Vec<i32>    = (0..n as i32).collect();

            let (x, y) = batcher.prepare(seqs, labels).unwrap();

            for row in 0..n {
                // [start, id + offset]
                prop_assert_eq!(x[[row, 0]], START_ID);
                prop_assert_eq!(x[[row, 1]] as i32 - 3, y[[row, 0]]);
            }
        }
    }
}
