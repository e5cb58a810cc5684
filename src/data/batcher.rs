// ============================================================
// Layer 4 — NER Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<NerSample>
// into tensors of shape [batch_size, seq_len].
//
// Every sample is already padded to the same fixed length by the
// alignment engine, so stacking is a flatten + reshape:
//   [s1_t1, ..., s1_tS, s2_t1, ..., sN_tS] → [N, S]
//
// The final batch of an epoch may hold fewer than batch_size
// samples; the underlying dataset is never mutated.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::NerSample;

// ─── NerBatch ─────────────────────────────────────────────────────────────────
/// A batch of aligned samples ready for a model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend — generic so the same batcher works on
/// any device an external trainer chooses.
#[derive(Debug, Clone)]
pub struct NerBatch<B: Backend> {
    /// Token ID sequences — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Attention masks — shape: [batch_size, seq_len]
    /// 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// Aligned label ids — shape: [batch_size, seq_len]
    /// IGNORE_INDEX marks positions excluded from the loss
    pub labels: Tensor<B, 2, Int>,
}

// ─── NerBatcher ───────────────────────────────────────────────────────────────
/// Holds the target device so tensors land where the consumer
/// wants them.
#[derive(Clone, Debug)]
pub struct NerBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> NerBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// The DataLoader calls .batch(items) with each mini-batch of
// samples pulled from the dataset.
impl<B: Backend> Batcher<NerSample, NerBatch<B>> for NerBatcher<B> {
    fn batch(&self, items: Vec<NerSample>) -> NerBatch<B> {
        let batch_size = items.len();
        // All sequences share the same fixed length
        let seq_len = items[0].seq_length();

        // Flatten each field across the batch, in sample order
        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.attention_mask.iter().map(|&x| x as i32))
            .collect();

        let label_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.labels.iter().map(|&x| x as i32))
            .collect();

        // 1D tensor from the flat Vec, then reshape to [batch, seq]
        let input_ids = Tensor::<B, 1, Int>::from_ints(input_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        let attention_mask = Tensor::<B, 1, Int>::from_ints(mask_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(label_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        NerBatch {
            input_ids,
            attention_mask,
            labels,
        }
    }
}
