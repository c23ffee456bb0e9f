// ============================================================
// Layer 4 - Sequence Padding
// ============================================================
// Packs variable-length id sequences into one rectangular
// matrix, every row the same width.
//
// Rows are RIGHT-aligned: padding goes in front, and a sequence
// that is too long loses its FRONT, keeping the most recent
// tokens.
//
// Example with width 4, pad 0:
//   [5, 6]              → [0, 0, 5, 6]
//   [1, 2, 3, 4, 5, 6]  → [3, 4, 5, 6]
//   []                  → [0, 0, 0, 0]

use ndarray::Array2;

/// Shape (num_sequences, width) id matrix.
pub type PaddedMatrix = Array2<u32>;

/// Pad or truncate every sequence to `target_len` tokens.
///
/// With `target_len = None` the width is the longest sequence
/// (zero for an empty input).
pub fn pad_sequences<S: AsRef<[u32]>>(
    sequences:  &[S],
    target_len: Option<usize>,
    pad_value:  u32,
) -> PaddedMatrix {
    let width = target_len.unwrap_or_else(|| {
        sequences.iter().map(|s| s.as_ref().len()).max().unwrap_or(0)
    });

    let mut out = Array2::from_elem((sequences.len(), width), pad_value);

    for (mut row, seq) in out.rows_mut().into_iter().zip(sequences) {
        let seq  = seq.as_ref();
        let tail = &seq[seq.len().saturating_sub(width)..];

        for (slot, &id) in row.iter_mut().skip(width - tail.len()).zip(tail) {
            *slot = id;
        }
    }

    out
}
