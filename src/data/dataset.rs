// ============================================================
// Layer 4 — NER Dataset
// ============================================================
// In-memory container of aligned samples for one partition.
// Construction is eager: the whole corpus file is parsed and
// aligned up front — corpora are small enough that there is no
// streaming mode. Samples are immutable once built and owned
// exclusively by the dataset.
//
// Partition files are found by convention:
//   dataset/<dataset_version>/train_data.txt
//   dataset/<dataset_version>/val_data.txt
//   dataset/<dataset_version>/test_data.txt

use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokenizers::Tokenizer;

use crate::data::alignment::align_labels;
use crate::data::corpus::read_corpus;
use crate::domain::tags::TagVocabulary;

/// Partition file names consumed by from_corpus_file
pub const TRAIN_FILE: &str = "train_data.txt";
pub const VAL_FILE: &str = "val_data.txt";
pub const TEST_FILE: &str = "test_data.txt";

/// One fully tokenised, padded and label-aligned sentence.
/// All three arrays have the same fixed length; labels use
/// IGNORE_INDEX for positions excluded from the loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub labels:         Vec<i64>,
}

impl NerSample {
    pub fn seq_length(&self) -> usize {
        self.input_ids.len()
    }
}

pub struct NerDataset {
    samples: Vec<NerSample>,
}

impl NerDataset {
    pub fn new(samples: Vec<NerSample>) -> Self {
        Self { samples }
    }

    /// Eagerly parse and align an entire corpus file.
    ///
    /// The tokenizer is shared read-only across all sentences and
    /// must already carry its truncation/padding configuration —
    /// it is never reloaded per sentence.
    pub fn from_corpus_file(
        path: impl AsRef<Path>,
        tokenizer: &Tokenizer,
        vocab: &TagVocabulary,
        label_all_subwords: bool,
    ) -> Result<Self> {
        let path = path.as_ref();
        let records = read_corpus(path)?;

        let mut samples = Vec::with_capacity(records.len());
        let mut unknown_tags = 0usize;

        for record in &records {
            let aligned = align_labels(record, vocab, tokenizer, label_all_subwords)?;
            unknown_tags += aligned.unknown_tags;
            samples.push(aligned.sample);
        }

        if unknown_tags > 0 {
            tracing::debug!(
                "{} token positions in '{}' had tags outside the vocabulary",
                unknown_tags,
                path.display()
            );
        }

        tracing::info!(
            "Built {} aligned samples from '{}'",
            samples.len(),
            path.display()
        );
        Ok(Self::new(samples))
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<NerSample> for NerDataset {
    fn get(&self, index: usize) -> Option<NerSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
