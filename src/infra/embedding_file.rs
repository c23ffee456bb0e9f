// ============================================================
// Layer 6 - Embedding File Access
// ============================================================
// Opens a word2vec file on disk as a buffered byte stream.
//
// The published vectors ship gzip-compressed
// (GoogleNews-vectors-negative300.bin.gz), so a `.gz` extension
// is decompressed on the fly with flate2; anything else is read
// as-is. The aligner never sees the difference.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

/// Open `path`, gunzipping when it ends in `.gz`.
pub fn open_embedding_file(path: impl AsRef<Path>) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Cannot open embedding file '{}'", path.display()))?;

    let is_gzip = path.extension().and_then(|e| e.to_str()) == Some("gz");

    tracing::debug!(
        "Opened embedding file '{}' ({})",
        path.display(),
        if is_gzip { "gzip" } else { "raw" }
    );

    if is_gzip {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
