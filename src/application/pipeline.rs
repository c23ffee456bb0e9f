// ============================================================
// Layer 2 - Preparation Pipeline
// ============================================================
// Wires the data layer together for a caller that has:
//   - raw sentences        → clean_texts
//   - a word2vec file      → load_embeddings
//   - id sequences + labels → prepare
//
// The two halves stay independent: load_embeddings never looks
// at the corpus and prepare never looks at the embeddings. The
// only thing they share is the index offset convention, which
// lives in the config.
//
// Randomness is seeded from the config, never from global
// state, so a saved PipelineConfig reproduces a run exactly.

use std::path::Path;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::data::{
    aligner::{AlignConfig, EmbeddingAligner, EmbeddingMatrix},
    padding::PaddedMatrix,
    preprocessor::Preprocessor,
    sequences::{BatchConfig, LabelColumn, SequenceBatcher},
};
use crate::domain::vocabulary::Vocabulary;
use crate::infra::{config_store::ConfigStore, embedding_file::open_embedding_file};

// ─── Pipeline Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub align: AlignConfig,
    pub batch: BatchConfig,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────
pub struct Pipeline {
    config:       PipelineConfig,
    preprocessor: Preprocessor,
    aligner:      EmbeddingAligner,
    batcher:      SequenceBatcher,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        if config.align.index_offset != config.batch.index_offset as usize {
            tracing::warn!(
                "Embedding offset {} differs from sequence offset {}; ids will not line up",
                config.align.index_offset,
                config.batch.index_offset
            );
        }

        Self {
            preprocessor: Preprocessor::new(),
            aligner:      EmbeddingAligner::new(config.align.clone()),
            batcher:      SequenceBatcher::new(config.batch.clone()),
            config,
        }
    }

    /// Build from a directory holding a saved `prep_config.json`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let config = ConfigStore::new(dir.as_ref()).load()?;
        Ok(Self::new(config))
    }

    /// Save this pipeline's config into `dir`.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<()> {
        ConfigStore::new(dir.as_ref()).save(&self.config)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalise raw sentences.
    pub fn clean_texts<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        self.preprocessor.clean_all(texts)
    }

    /// Align the word2vec file at `path` to `vocab`.
    pub fn load_embeddings(&self, path: impl AsRef<Path>, vocab: &Vocabulary) -> Result<EmbeddingMatrix> {
        let path   = path.as_ref();
        let source = open_embedding_file(path)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.align.seed);

        let matrix = self
            .aligner
            .align(source, vocab, &mut rng)
            .with_context(|| format!("Cannot align embeddings from '{}'", path.display()))?;

        tracing::info!(
            "Aligned '{}': {} columns, {} pretrained, {} random",
            path.display(),
            matrix.capacity(),
            matrix.matched(),
            matrix.fallback()
        );
        Ok(matrix)
    }

    /// Shuffle, offset, cap and pad a labelled corpus.
    pub fn prepare(&self, sequences: Vec<Vec<u32>>, labels: Vec<i32>) -> Result<(PaddedMatrix, LabelColumn)> {
        let n = sequences.len();
        let prepared = self.batcher.prepare(sequences, labels)?;

        tracing::info!("Prepared {} samples of width {}", n, prepared.0.ncols());
        Ok(prepared)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
