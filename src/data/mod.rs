// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Two independent flows share this layer:
//
//   Embeddings                      Sentences
//   ──────────                      ─────────
//   word2vec bytes                  raw text
//       │                               │
//       ▼                               ▼
//   Word2VecReader                  Preprocessor
//       │                               │   (caller tokenizes)
//       ▼                               ▼
//   EmbeddingAligner                SequenceBatcher
//       │                           (shuffle → offset → cap → pad)
//       ▼                               │
//   EmbeddingMatrix                     ▼
//                                   PaddedDataset → PaddedBatcher
//
// Each module does one step and is tested on its own.

/// Sentence normalisation
pub mod preprocessor;

/// word2vec binary format reader
pub mod word2vec;

/// Aligns pretrained vectors to the caller's vocabulary
pub mod aligner;

/// Seeded permutation of parallel collections
pub mod shuffle;

/// Right-aligned padding and tail-keeping truncation
pub mod padding;

/// Offsets, caps and pads a labelled corpus
pub mod sequences;

/// Implements Burn's Dataset trait over padded rows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
