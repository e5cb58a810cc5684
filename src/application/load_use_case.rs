// ============================================================
// Layer 2 — LoadUseCase
// ============================================================
// Builds the in-memory datasets and batch loaders an external
// training loop consumes:
//
//   Step 1: Tag vocabulary                (Layer 3 - domain)
//   Step 2: Load the tokenizer once       (Layer 6 - infra)
//   Step 3: Build the three datasets      (Layer 4 - data)
//   Step 4: Build the batch loaders       (Burn DataLoader)
//
// Partition files are found by convention under
// <dataset_root>/<dataset_version>/{train,val,test}_data.txt.
// The training loader shuffles; the evaluation loaders keep file
// order.

use anyhow::{Context, Result};
use burn::data::dataloader::DataLoaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokenizers::Tokenizer;

use crate::data::batcher::NerBatcher;
use crate::data::dataset::{NerDataset, TEST_FILE, TRAIN_FILE, VAL_FILE};
use crate::domain::tags::TagVocabulary;
use crate::infra::tokenizer_store::TokenizerStore;

// Loader construction needs a concrete backend; the external
// trainer instantiates its own batcher on whatever device it uses.
type LoaderBackend = burn::backend::NdArray;

/// Shuffle seed for the training loader
const SHUFFLE_SEED: u64 = 42;

// ─── Loading Configuration ───────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub tokenizer_dir:    String,
    pub dataset_root:     String,
    pub dataset_version:  String,
    /// JSON array of tags; None uses the stock vocabulary
    pub tags_file:        Option<String>,
    pub max_seq_length:   usize,
    pub label_all_tokens: bool,
    pub train_batch_size: usize,
    pub eval_batch_size:  usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            tokenizer_dir:    "checkpoints".to_string(),
            dataset_root:     "dataset".to_string(),
            dataset_version:  "current".to_string(),
            tags_file:        None,
            max_seq_length:   128,
            label_all_tokens: false,
            train_batch_size: 32,
            eval_batch_size:  32,
        }
    }
}

/// The three partition datasets, ready for loader construction.
pub struct DatasetBundle {
    pub train: NerDataset,
    pub val:   NerDataset,
    pub test:  NerDataset,
}

// ─── LoadUseCase ──────────────────────────────────────────────────────────────
pub struct LoadUseCase {
    config: LoadConfig,
}

impl LoadUseCase {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    /// Parse and align all three partitions eagerly.
    pub fn build_datasets(&self) -> Result<DatasetBundle> {
        let cfg = &self.config;

        // ── Step 1: Tag vocabulary ────────────────────────────────────────────
        let vocab = match &cfg.tags_file {
            Some(path) => TagVocabulary::from_json_file(path)?,
            None => TagVocabulary::default_tags(),
        };
        tracing::info!("Tag vocabulary: {} tags", vocab.len());

        // ── Step 2: Load the tokenizer once ───────────────────────────────────
        // Shared read-only by every alignment call below
        let store = TokenizerStore::new(&cfg.tokenizer_dir);
        let tokenizer = store.load(cfg.max_seq_length)?;

        // ── Step 3: Build the three datasets eagerly ──────────────────────────
        let version_dir = Path::new(&cfg.dataset_root).join(&cfg.dataset_version);
        let train = self.dataset_for(&version_dir, TRAIN_FILE, &tokenizer, &vocab)?;
        let val = self.dataset_for(&version_dir, VAL_FILE, &tokenizer, &vocab)?;
        let test = self.dataset_for(&version_dir, TEST_FILE, &tokenizer, &vocab)?;

        tracing::info!(
            "Datasets ready: {} train, {} validation, {} test sentences",
            train.sample_count(),
            val.sample_count(),
            test.sample_count()
        );

        Ok(DatasetBundle { train, val, test })
    }

    fn dataset_for(
        &self,
        dir: &Path,
        filename: &str,
        tokenizer: &Tokenizer,
        vocab: &TagVocabulary,
    ) -> Result<NerDataset> {
        let path = dir.join(filename);
        NerDataset::from_corpus_file(&path, tokenizer, vocab, self.config.label_all_tokens)
            .with_context(|| format!("Cannot build dataset from '{}'", path.display()))
    }

    /// Build the loaders and walk each once, reporting batch
    /// counts — the same construction an external trainer performs
    /// before its epoch loop.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        let bundle = self.build_datasets()?;

        let device = burn::backend::ndarray::NdArrayDevice::default();

        // ── Step 4: Batch loaders ─────────────────────────────────────────────
        // Training consumption shuffles; evaluation keeps order
        let train_loader =
            DataLoaderBuilder::new(NerBatcher::<LoaderBackend>::new(device.clone()))
                .batch_size(cfg.train_batch_size)
                .shuffle(SHUFFLE_SEED)
                .num_workers(1)
                .build(bundle.train);

        let val_loader =
            DataLoaderBuilder::new(NerBatcher::<LoaderBackend>::new(device.clone()))
                .batch_size(cfg.eval_batch_size)
                .num_workers(1)
                .build(bundle.val);

        let test_loader =
            DataLoaderBuilder::new(NerBatcher::<LoaderBackend>::new(device))
                .batch_size(cfg.eval_batch_size)
                .num_workers(1)
                .build(bundle.test);

        let train_batches = train_loader.iter().count();
        let val_batches = val_loader.iter().count();
        let test_batches = test_loader.iter().count();

        println!(
            "Prepared {} training batches, {} validation batches, {} test batches (max_seq_length={})",
            train_batches, val_batches, test_batches, cfg.max_seq_length,
        );
        Ok(())
    }
}
