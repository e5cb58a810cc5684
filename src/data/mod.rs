// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw annotated table and tensor batches.
//
// The pipeline flows in this order:
//
//   annotated table (csv / doccano export)
//       │
//       ▼
//   sources           → reads rows of (source, tag-sequence)
//       │
//       ▼
//   splitter          → merge, stratified split, partition files
//       │
//       ▼
//   corpus            → partition file → sentence records
//       │
//       ▼
//   alignment         → word tags → sub-word label ids
//       │
//       ▼
//   NerDataset        → implements Burn's Dataset trait
//       │
//       ▼
//   NerBatcher        → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds an external training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.

/// Reads the raw annotated table (csv or doccano export)
pub mod sources;

/// Merge, stratified split and partition persistence
pub mod splitter;

/// Parses the flat tagged-token corpus format
pub mod corpus;

/// Aligns word-level tags to sub-word token positions
pub mod alignment;

/// Implements Burn's Dataset trait for aligned samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
