// ============================================================
// Layer 4 - word2vec Binary Reader
// ============================================================
// Streams entries out of the word2vec binary format.
//
// File layout (after gzip decompression):
//
//   "3000000 300\n"                        ← ASCII header
//   word␠ f32 f32 ... f32                  ← entry 1
//   \nword␠ f32 f32 ... f32                ← entry 2
//   ...
//
//   - the header holds the entry count and the vector dimension
//   - a word is raw bytes terminated by a single space byte
//   - newline bytes seen before that space are dropped
//     (writers put one after every vector)
//   - each vector is `dimension` little-endian f32s, no separator
//
// Byte order is everything here: the word boundary tells us
// where the vector starts, and the vector length tells us where
// the next word starts. Entries must be consumed strictly in
// order, even the ones the caller throws away.

use std::io::{self, BufRead, Read};

use crate::error::{PrepError, Result};

const F32_BYTES: usize = std::mem::size_of::<f32>();

/// Longest header line accepted, newline included
const MAX_HEADER_BYTES: u64 = 64;

/// Largest vector dimension accepted
pub const MAX_DIMENSION: usize = 1 << 16;

/// The two integers on the first line of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word2VecHeader {
    /// Number of entries that follow
    pub vocab_size: usize,
    /// Floats per vector
    pub dimension: usize,
}

/// Sequential reader over a decompressed word2vec stream.
///
/// Owns its source, so the underlying handle is released
/// whenever the reader is dropped, error paths included.
pub struct Word2VecReader<R> {
    source:    R,
    header:    Word2VecHeader,
    remaining: usize,
    word_buf:  Vec<u8>,
    vec_buf:   Vec<u8>,
}

impl<R: BufRead> Word2VecReader<R> {
    /// Read and validate the header line.
    pub fn new(mut source: R) -> Result<Self> {
        let header = read_header(&mut source)?;
        let vector_bytes = header
            .dimension
            .checked_mul(F32_BYTES)
            .ok_or_else(|| PrepError::format(format!("dimension {} overflows", header.dimension)))?;

        Ok(Self {
            source,
            header,
            remaining: header.vocab_size,
            word_buf:  Vec::new(),
            vec_buf:   vec![0; vector_bytes],
        })
    }

    pub fn header(&self) -> Word2VecHeader {
        self.header
    }

    /// Entries not yet consumed
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Read the next word, or None once every entry has been read.
    ///
    /// Every `Some` must be followed by exactly one call to
    /// `read_vector` or `skip_vector` before the next word.
    pub fn next_word(&mut self) -> Result<Option<&[u8]>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        self.word_buf.clear();
        self.source.read_until(b' ', &mut self.word_buf)?;

        // read_until only stops short of the delimiter at EOF
        if self.word_buf.pop() != Some(b' ') {
            return Err(PrepError::truncated(format!(
                "word {} of {}",
                self.header.vocab_size - self.remaining + 1,
                self.header.vocab_size
            )));
        }
        self.word_buf.retain(|&b| b != b'\n');

        self.remaining -= 1;
        Ok(Some(self.word_buf.as_slice()))
    }

    /// Decode the vector that follows the last word.
    pub fn read_vector(&mut self) -> Result<Vec<f32>> {
        self.fill_vector()?;
        Ok(self
            .vec_buf
            .chunks_exact(F32_BYTES)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Consume the vector that follows the last word without decoding it.
    pub fn skip_vector(&mut self) -> Result<()> {
        self.fill_vector()
    }

    fn fill_vector(&mut self) -> Result<()> {
        self.source.read_exact(&mut self.vec_buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                PrepError::truncated(format!(
                    "a {}-float vector after word {}",
                    self.header.dimension,
                    self.header.vocab_size - self.remaining
                ))
            } else {
                PrepError::Io(e)
            }
        })
    }
}

/// Parse "<vocab_size> <dimension>\n".
fn read_header<R: BufRead>(source: &mut R) -> Result<Word2VecHeader> {
    let mut line = Vec::new();
    source.by_ref().take(MAX_HEADER_BYTES).read_until(b'\n', &mut line)?;

    if line.last() != Some(&b'\n') {
        return Err(PrepError::format(format!(
            "no header line within the first {MAX_HEADER_BYTES} bytes"
        )));
    }

    let text = std::str::from_utf8(&line)
        .map_err(|_| PrepError::format("header is not ASCII"))?;

    let fields: Vec<&str> = text.split_whitespace().collect();
    let [count, dim] = fields.as_slice() else {
        return Err(PrepError::format(format!(
            "expected 2 integers, found {} fields in {:?}",
            fields.len(),
            text.trim_end()
        )));
    };

    let parse = |field: &str, name: &str| {
        field
            .parse::<usize>()
            .map_err(|_| PrepError::format(format!("{name} {field:?} is not an integer")))
    };

    let header = Word2VecHeader {
        vocab_size: parse(*count, "vocab size")?,
        dimension:  parse(*dim, "dimension")?,
    };

    if header.dimension > MAX_DIMENSION {
        return Err(PrepError::format(format!(
            "dimension {} exceeds the limit of {MAX_DIMENSION}",
            header.dimension
        )));
    }
    Ok(header)
}

/// Encode entries in the binary format. Used to build fixtures.
#[cfg(test)]
pub(crate) fn encode(entries: &[(&str, Vec<f32>)], dimension: usize) -> Vec<u8> {
    let mut out = format!("{} {}\n", entries.len(), dimension).into_bytes();
    for (word, vector) in entries {
        out.extend_from_slice(word.as_bytes());
        out.push(b' ');
        for v in vector {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.push(b'\n');
    }
    out
}
