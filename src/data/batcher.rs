// ============================================================
// Layer 4 - Padded Batcher
// ============================================================
// Implements Burn's Batcher trait so a PaddedDataset can feed a
// DataLoader directly.
//
// How batching works here:
//   Input:  Vec of N PaddedSamples, each `width` tokens long
//   Output: PaddedBatch with
//             tokens [N, width]   (Int)
//             labels [N, 1]       (Int)
//
// Every row already has the same width (SequenceBatcher padded
// them), so stacking is a flatten + reshape.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::PaddedSample;

/// A batch of padded sentences on one device.
#[derive(Debug, Clone)]
pub struct PaddedBatch<B: Backend> {
    /// Token ids - shape: [batch_size, sentence_length]
    pub tokens: Tensor<B, 2, Int>,

    /// Labels - shape: [batch_size, 1]
    pub labels: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug, Default)]
pub struct PaddedBatcher;

impl PaddedBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, PaddedSample, PaddedBatch<B>> for PaddedBatcher {
    fn batch(&self, items: Vec<PaddedSample>, device: &B::Device) -> PaddedBatch<B> {
        let batch_size = items.len();
        let width      = items.first().map_or(0, |s| s.tokens.len());

        // ── Flatten tokens row by row ────────────────────────────────────────
        let flat: Vec<i64> = items
            .iter()
            .flat_map(|s| s.tokens.iter().map(|&t| i64::from(t)))
            .collect();

        let labels: Vec<i64> = items.iter().map(|s| i64::from(s.label)).collect();

        let tokens = Tensor::<B, 2, Int>::from_data(
            TensorData::new(flat, [batch_size, width]),
            device,
        );
        let labels = Tensor::<B, 2, Int>::from_data(
            TensorData::new(labels, [batch_size, 1]),
            device,
        );

        PaddedBatch { tokens, labels }
    }
}
