// ============================================================
// Layer 4 - Embedding Aligner
// ============================================================
// Builds an embedding matrix for OUR vocabulary out of a
// pre-trained word2vec file that knows nothing about it.
//
// Column layout of the output (index_offset = 3):
//
//   column:  0     1      2     3      4      ...
//   meaning: pad   start  oov   vocab  vocab  ...
//                               id 0   id 1
//
// How a column gets filled:
//   1. Walk the file entries in order
//   2. Word in the vocabulary and (id + offset) < capacity
//      → copy its vector verbatim into that column
//   3. Anything else → consume the vector bytes and drop them
//   4. Every column nobody claimed gets a random vector
//      drawn from U[-0.25, 0.25)
//
// Capacity is min(|vocab| + offset, vocab_capacity_limit), so
// the reserved columns always exist and only ever receive
// random vectors.

use std::io::BufRead;

use ndarray::{Array2, ArrayView1};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::word2vec::Word2VecReader;
use crate::domain::vocabulary::Vocabulary;
use crate::error::{PrepError, Result};

/// Half-width of the fallback distribution
pub const FALLBACK_RANGE: f32 = 0.25;

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Upper bound on the number of output columns
    pub vocab_capacity_limit: usize,
    /// Reserved low ids in front of the vocabulary ids
    pub index_offset: usize,
    /// Report progress at info level instead of debug
    pub verbose: bool,
    /// Seed for the fallback vectors when the pipeline owns the RNG
    pub seed: u64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            vocab_capacity_limit: 50_000,
            index_offset:         3,
            verbose:              true,
            seed:                 113,
        }
    }
}

// ─── EmbeddingMatrix ─────────────────────────────────────────────────────────
/// Aligned embeddings, shape [dimension, capacity].
/// Column j is the vector for id j.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    weights: Array2<f32>,
    matched: usize,
}

impl EmbeddingMatrix {
    /// Floats per vector (rows)
    pub fn dimension(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of ids covered (columns)
    pub fn capacity(&self) -> usize {
        self.weights.ncols()
    }

    /// Columns filled from the file
    pub fn matched(&self) -> usize {
        self.matched
    }

    /// Columns filled with random vectors
    pub fn fallback(&self) -> usize {
        self.capacity() - self.matched
    }

    pub fn column(&self, id: usize) -> ArrayView1<'_, f32> {
        self.weights.column(id)
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn into_weights(self) -> Array2<f32> {
        self.weights
    }
}

// ─── EmbeddingAligner ────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default)]
pub struct EmbeddingAligner {
    config: AlignConfig,
}

impl EmbeddingAligner {
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Number of columns the output will have for `vocab`.
    pub fn effective_capacity(&self, vocab: &Vocabulary) -> usize {
        (vocab.len() + self.config.index_offset).min(self.config.vocab_capacity_limit)
    }

    /// Align a decompressed word2vec stream to `vocab`.
    ///
    /// `source` is consumed and dropped before returning, on
    /// success or failure. `rng` only feeds the fallback vectors,
    /// so the same seed and file always give the same matrix.
    pub fn align<R, G>(&self, source: R, vocab: &Vocabulary, rng: &mut G) -> Result<EmbeddingMatrix>
    where
        R: BufRead,
        G: Rng + ?Sized,
    {
        let mut reader = Word2VecReader::new(source)?;
        let dimension  = reader.header().dimension;
        let capacity   = self.effective_capacity(vocab);
        let offset     = self.config.index_offset;

        self.report(format_args!(
            "Loading vectors for {capacity} vocabulary columns with dimension {dimension}"
        ));

        let mut weights = Array2::<f32>::zeros((dimension, capacity));
        let mut found   = vec![false; capacity];

        // ── Pass over the file ────────────────────────────────────────────────
        while let Some(word) = reader.next_word()? {
            let column = std::str::from_utf8(word)
                .ok()
                .and_then(|w| vocab.get(w))
                .map(|id| (id as usize).saturating_add(offset))
                .filter(|&col| col < capacity);

            match column {
                Some(col) => {
                    let vector = reader.read_vector()?;
                    weights.column_mut(col).assign(&ArrayView1::from(vector.as_slice()));
                    found[col] = true;
                }
                None => reader.skip_vector()?,
            }
        }

        let matched = found.iter().filter(|&&hit| hit).count();
        self.report(format_args!("{matched} words with word2vec embeddings"));
        self.report(format_args!(
            "Initialising {} remaining columns with random vectors",
            capacity - matched
        ));

        // ── Fallback for unclaimed columns ────────────────────────────────────
        let uniform      = Uniform::new(-FALLBACK_RANGE, FALLBACK_RANGE);
        let mut fallback = 0usize;

        for (col, &hit) in found.iter().enumerate() {
            if hit {
                continue;
            }
            for value in weights.column_mut(col).iter_mut() {
                *value = uniform.sample(&mut *rng);
            }
            fallback += 1;
        }

        if matched + fallback != capacity {
            tracing::error!(matched, fallback, capacity, "Embedding columns left unassigned");
            return Err(PrepError::AssertionViolation {
                message: format!(
                    "{matched} matched + {fallback} fallback columns != capacity {capacity}"
                ),
            });
        }

        Ok(EmbeddingMatrix { weights, matched })
    }

    fn report(&self, message: std::fmt::Arguments<'_>) {
        if self.config.verbose {
            tracing::info!("{}", message);
        } else {
            tracing::debug!("{}", message);
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::word2vec::encode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io::Cursor;

    fn vocab(words: &[&str]) -> Vocabulary {
        Vocabulary::from_pairs(words.iter().enumerate().map(|(i, w)| (*w, i as u32))).unwrap()
    }

    fn quiet(limit: usize, offset: usize) -> EmbeddingAligner {
        EmbeddingAligner::new(AlignConfig {
            vocab_capacity_limit: limit,
            index_offset:         offset,
            verbose:              false,
            seed:                 0,
        })
    }

    fn align(aligner: &EmbeddingAligner, bytes: Vec<u8>, vocab: &Vocabulary) -> Result<EmbeddingMatrix> {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        aligner.align(Cursor::new(bytes), vocab, &mut rng)
    }

    #[test]
    fn test_matched_word_lands_at_offset_column() {
        let vocab = vocab(&["good", "bad", "plot"]);
        let bytes = encode(
            &[
                ("unused", vec![9.0, 9.0]),
                ("bad", vec![1.5, -0.5]),
                ("good", vec![0.125, 2.0]),
            ],
            2,
        );

        let m = align(&quiet(100, 3), bytes, &vocab).unwrap();

        assert_eq!(m.capacity(), 6);
        assert_eq!(m.dimension(), 2);
        assert_eq!(m.column(3).to_vec(), vec![0.125, 2.0]);
        assert_eq!(m.column(4).to_vec(), vec![1.5, -0.5]);
        assert_eq!(m.matched(), 2);
        assert_eq!(m.fallback(), 4);
    }

    #[test]
    fn test_every_column_is_filled() {
        let vocab = vocab(&["a", "b", "c", "d"]);
        let bytes = encode(&[("c", vec![1.0; 4])], 4);

        let m = align(&quiet(100, 3), bytes, &vocab).unwrap();

        assert_eq!(m.matched() + m.fallback(), m.capacity());
        for col in 0..m.capacity() {
            if col == 5 {
                assert!(m.column(col).iter().all(|&v| v == 1.0));
            } else {
                assert!(m
                    .column(col)
                    .iter()
                    .all(|&v| (-FALLBACK_RANGE..FALLBACK_RANGE).contains(&v)));
            }
        }
    }

    #[test]
    fn test_capacity_is_clamped_and_overflow_vectors_are_skipped() {
        // ids 0..4 + offset 3 → columns 3..7, but only 5 columns allowed
        let vocab = vocab(&["w0", "w1", "w2", "w3"]);
        let bytes = encode(
            &[
                ("w3", vec![3.0]),   // column 6: out of range, skipped
                ("w1", vec![1.0]),   // column 4: kept
                ("w2", vec![2.0]),   // column 5: out of range, skipped
            ],
            1,
        );

        let m = align(&quiet(5, 3), bytes, &vocab).unwrap();

        assert_eq!(m.capacity(), 5);
        assert_eq!(m.column(4).to_vec(), vec![1.0]);
        assert_eq!(m.matched(), 1);
    }

    #[test]
    fn test_non_utf8_words_are_unmatched() {
        let vocab = vocab(&["ok"]);
        let mut bytes = b"2 1\n\xff\xfe ".to_vec();
        bytes.extend_from_slice(&5.0f32.to_le_bytes());
        bytes.extend_from_slice(b"ok ");
        bytes.extend_from_slice(&6.0f32.to_le_bytes());

        let m = align(&quiet(100, 3), bytes, &vocab).unwrap();
        assert_eq!(m.column(3).to_vec(), vec![6.0]);
        assert_eq!(m.matched(), 1);
    }

    #[test]
    fn test_repeated_file_word_keeps_last_vector() {
        let vocab = vocab(&["dup"]);
        let bytes = encode(&[("dup", vec![1.0]), ("dup", vec![2.0])], 1);

        let m = align(&quiet(100, 3), bytes, &vocab).unwrap();
        assert_eq!(m.column(3).to_vec(), vec![2.0]);
        assert_eq!(m.matched(), 1);
        assert_eq!(m.fallback(), 3);
    }

    #[test]
    fn test_same_seed_same_matrix() {
        let vocab = vocab(&["a", "b"]);
        let bytes = encode(&[("a", vec![0.0; 3])], 3);

        let first  = align(&quiet(100, 3), bytes.clone(), &vocab).unwrap();
        let second = align(&quiet(100, 3), bytes, &vocab).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_truncated_file_fails() {
        let vocab = vocab(&["a"]);
        let mut bytes = encode(&[("a", vec![1.0, 2.0])], 2);
        bytes.truncate(bytes.len() - 3);

        let err = align(&quiet(100, 3), bytes, &vocab).unwrap_err();
        assert!(matches!(err, PrepError::TruncatedInput { .. }));
    }

    #[test]
    fn test_bad_header_fails() {
        let vocab = vocab(&["a"]);
        let err = align(&quiet(100, 3), b"300\n".to_vec(), &vocab).unwrap_err();
        assert!(matches!(err, PrepError::Format { .. }));
    }

    #[test]
    fn test_defaults() {
        let cfg = AlignConfig::default();
        assert_eq!(cfg.vocab_capacity_limit, 50_000);
        assert_eq!(cfg.index_offset, 3);
        assert!(cfg.verbose);
    }
}
