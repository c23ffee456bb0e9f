// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Filesystem concerns kept out of the pipelines themselves:
//
//   embedding_file.rs - opens word2vec files, gunzipping `.gz`
//   config_store.rs   - saves/loads the pipeline config as JSON
//
// Everything here returns anyhow::Result with the path in the
// error context.

/// Buffered (and optionally gzip-decoded) embedding file reader
pub mod embedding_file;

/// JSON persistence for PipelineConfig
pub mod config_store;
