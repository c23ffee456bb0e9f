// ============================================================
// Layer 2 - Application Layer
// ============================================================
// Orchestrates the lower layers for a caller:
//
//   pipeline.rs - cleaning, embedding alignment from a file on
//                 disk, and corpus batching behind one config
//
// No parsing or padding logic lives here, only workflow.

/// Config-driven preparation workflow
pub mod pipeline;
