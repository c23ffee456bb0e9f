use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::padding::PaddedMatrix;
use crate::data::sequences::LabelColumn;
use crate::error::{PrepError, Result};

/// One padded row and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddedSample {
    pub tokens: Vec<u32>,
    pub label:  i32,
}

impl PaddedSample {
    /// Tokens that are not padding
    pub fn content_len(&self, pad_id: u32) -> usize {
        self.tokens.iter().filter(|&&t| t != pad_id).count()
    }
}

/// Row-wise view of a prepared (matrix, labels) pair.
pub struct PaddedDataset {
    tokens: PaddedMatrix,
    labels: LabelColumn,
}

impl PaddedDataset {
    pub fn new(tokens: PaddedMatrix, labels: LabelColumn) -> Result<Self> {
        if tokens.nrows() != labels.nrows() || labels.ncols() != 1 {
            return Err(PrepError::shape(format!(
                "{} token rows but labels shaped {:?}",
                tokens.nrows(),
                labels.dim()
            )));
        }
        Ok(Self { tokens, labels })
    }

    pub fn sentence_length(&self) -> usize {
        self.tokens.ncols()
    }
}

impl Dataset<PaddedSample> for PaddedDataset {
    fn get(&self, index: usize) -> Option<PaddedSample> {
        if index >= self.tokens.nrows() {
            return None;
        }
        Some(PaddedSample {
            tokens: self.tokens.row(index).to_vec(),
            label:  self.labels[[index, 0]],
        })
    }

    fn len(&self) -> usize {
        self.tokens.nrows()
    }
}
