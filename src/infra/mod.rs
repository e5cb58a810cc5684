// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// External-world adapters. Only the tokenizer store lives here:
// model training, checkpointing and metrics logging belong to the
// external training loop that consumes this crate's batches, not
// to the data pipeline itself.

/// Loads and configures the shared sub-word tokenizer
pub mod tokenizer_store;
