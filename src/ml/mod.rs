// ============================================================
// Layer 5 - ML Layer (Burn)
// ============================================================
// Hands prepared data to Burn models.
//
//   embedding.rs - aligned EmbeddingMatrix → Burn Embedding
//                  module (and the raw weight tensor)
//
// The padded batches themselves go through data::batcher, which
// implements Burn's Batcher trait for the DataLoader.

/// Pretrained embedding layer construction
pub mod embedding;
