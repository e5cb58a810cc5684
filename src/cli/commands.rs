// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `prepare` and `load`, and all
// their configurable flags. clap's derive macros generate the
// help text, missing-argument errors and type conversion.

use clap::{Args, Subcommand};

use crate::application::load_use_case::LoadConfig;
use crate::application::prepare_use_case::PrepareConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a raw annotated table into stratified partition files
    Prepare(PrepareArgs),

    /// Build aligned datasets and batch loaders from partition files
    Load(LoadArgs),
}

/// All arguments for the `prepare` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Path to the raw annotated table (csv file or doccano export)
    #[arg(long)]
    pub dataset_path: String,

    /// Directory the three partition files are written to
    #[arg(long, default_value = "dataset/current")]
    pub output_dir: String,

    /// Input format of the annotated table: "doccano" or "csv"
    #[arg(long, default_value = "csv")]
    pub data_format: String,

    /// Fraction of rows for the validation partition
    #[arg(long, default_value_t = 0.2)]
    pub val_size: f64,

    /// Fraction of rows for the test partition
    #[arg(long, default_value_t = 0.1)]
    pub test_size: f64,

    /// Merge every N consecutive rows into one before splitting
    #[arg(long)]
    pub merge_sentence: Option<usize>,

    /// Seed for the first split stage (train vs rest).
    /// The second stage always uses a fixed seed.
    #[arg(long, default_value_t = 43)]
    pub random_state: u64,
}

/// Convert CLI PrepareArgs into the application-layer config.
/// The application layer never sees clap types.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            dataset_path:   a.dataset_path,
            output_dir:     a.output_dir,
            data_format:    a.data_format,
            val_size:       a.val_size,
            test_size:      a.test_size,
            merge_sentence: a.merge_sentence,
            random_state:   a.random_state,
        }
    }
}

/// All arguments for the `load` command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Directory holding tokenizer.json
    #[arg(long, default_value = "checkpoints")]
    pub tokenizer_dir: String,

    /// Root directory of versioned datasets
    #[arg(long, default_value = "dataset")]
    pub dataset_root: String,

    /// Dataset version — partitions live under
    /// <dataset_root>/<dataset_version>/
    #[arg(long, default_value = "current")]
    pub dataset_version: String,

    /// JSON array of tags overriding the stock vocabulary
    #[arg(long)]
    pub tags_file: Option<String>,

    /// Fixed token length every sentence is padded/truncated to
    #[arg(long, default_value_t = 128)]
    pub max_seq_length: usize,

    /// Label every sub-word of a word instead of only the first
    #[arg(long)]
    pub label_all_tokens: bool,

    /// Samples per batch for training consumption
    #[arg(long, default_value_t = 32)]
    pub train_batch_size: usize,

    /// Samples per batch for validation/test consumption
    #[arg(long, default_value_t = 32)]
    pub eval_batch_size: usize,
}

impl From<LoadArgs> for LoadConfig {
    fn from(a: LoadArgs) -> Self {
        LoadConfig {
            tokenizer_dir:    a.tokenizer_dir,
            dataset_root:     a.dataset_root,
            dataset_version:  a.dataset_version,
            tags_file:        a.tags_file,
            max_seq_length:   a.max_seq_length,
            label_all_tokens: a.label_all_tokens,
            train_batch_size: a.train_batch_size,
            eval_batch_size:  a.eval_batch_size,
        }
    }
}
