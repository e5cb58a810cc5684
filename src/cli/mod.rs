// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `prepare` — splits a raw annotated table into stratified
//                  partition files
//   2. `load`    — builds aligned datasets and batch loaders from
//                  the partition files

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, LoadArgs, PrepareArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "ner-data-prep",
    version = "0.1.0",
    about = "Prepare a tagged NER corpus: split raw annotations, align labels to sub-word tokens, serve mini-batches."
)]
pub struct Cli {
    /// The subcommand to run (prepare or load)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => Self::run_prepare(args),
            Commands::Load(args) => Self::run_load(args),
        }
    }

    /// Handles the `prepare` subcommand.
    fn run_prepare(args: PrepareArgs) -> Result<()> {
        use crate::application::prepare_use_case::PrepareUseCase;

        tracing::info!("Preparing dataset from: {}", args.dataset_path);

        // Convert CLI args → application config
        let use_case = PrepareUseCase::new(args.into());
        use_case.execute()?;

        println!("Dataset preparation complete.");
        Ok(())
    }

    /// Handles the `load` subcommand.
    fn run_load(args: LoadArgs) -> Result<()> {
        use crate::application::load_use_case::LoadUseCase;

        tracing::info!("Loading dataset version: {}", args.dataset_version);

        let use_case = LoadUseCase::new(args.into());
        use_case.execute()?;
        Ok(())
    }
}
