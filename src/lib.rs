//! Text preparation for numeric training pipelines.
//!
//! Two independent pipelines that share only an integer-indexed
//! vocabulary:
//!
//! - [`EmbeddingAligner`] reads a word2vec binary stream and builds a
//!   `[dimension, capacity]` matrix aligned to a caller vocabulary, with
//!   seeded random vectors for every id the file does not cover.
//! - [`SequenceBatcher`] shuffles, offsets, caps and pads a labelled
//!   corpus of id sequences into a fixed-width matrix and a label column.
//!
//! [`Preprocessor`] normalises raw sentences before the caller's
//! tokenizer runs, and the `data::dataset`/`data::batcher`/`ml` modules
//! hand the results to Burn.

// Layer 2 - workflow over the lower layers
pub mod application;

// Layer 3 - plain data types
pub mod domain;

// Layer 4 - parsing, alignment, padding
pub mod data;

// Layer 5 - Burn model inputs
pub mod ml;

// Layer 6 - filesystem access
pub mod infra;

pub mod error;

pub use application::pipeline::{Pipeline, PipelineConfig};
pub use data::aligner::{AlignConfig, EmbeddingAligner, EmbeddingMatrix};
pub use data::padding::{pad_sequences, PaddedMatrix};
pub use data::preprocessor::Preprocessor;
pub use data::sequences::{BatchConfig, LabelColumn, SequenceBatcher};
pub use domain::{corpus::Corpus, vocabulary::Vocabulary};
pub use error::{PrepError, Result};
