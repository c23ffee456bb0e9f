// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain data types shared by both pipelines:
//
//   Vocabulary - word → id mapping, built by the caller
//   Corpus     - id sequences paired with their labels
//
// Rules for this layer:
//   - NO burn types
//   - NO byte-stream parsing
//   - Only structs, their invariants, and small accessors

/// Word → id mapping owned by the caller
pub mod vocabulary;

/// Integer-encoded sentences with parallel labels
pub mod corpus;
