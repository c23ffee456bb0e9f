// ============================================================
// Layer 5 - Pretrained Embedding Layer
// ============================================================
// Moves an aligned EmbeddingMatrix onto a device as a Burn
// Embedding module.
//
// Layout change:
//   EmbeddingMatrix   [dimension, capacity]   column = one id
//   burn Embedding    [capacity, dimension]   row    = one id
//
// so the matrix is transposed on the way in. Id j in a padded
// batch then looks up exactly column j of the aligned matrix.

use burn::{
    module::Param,
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
    tensor::TensorData,
};

use crate::data::aligner::EmbeddingMatrix;

/// Aligned weights as a [capacity, dimension] float tensor.
pub fn embedding_tensor<B: Backend>(matrix: &EmbeddingMatrix, device: &B::Device) -> Tensor<B, 2> {
    // t() is a view; iter() walks it in logical (row-major) order
    let rows: Vec<f32> = matrix.weights().t().iter().copied().collect();

    Tensor::<B, 2>::from_data(
        TensorData::new(rows, [matrix.capacity(), matrix.dimension()]),
        device,
    )
}

/// Embedding layer initialised with the aligned vectors.
pub fn pretrained_embedding<B: Backend>(matrix: &EmbeddingMatrix, device: &B::Device) -> Embedding<B> {
    let mut layer = EmbeddingConfig::new(matrix.capacity(), matrix.dimension()).init::<B>(device);
    layer.weight  = Param::from_tensor(embedding_tensor(matrix, device));

    tracing::debug!(
        "Embedding layer ready: {} ids x {} dims ({} pretrained)",
        matrix.capacity(),
        matrix.dimension(),
        matrix.matched()
    );
    layer
}
