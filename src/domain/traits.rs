// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seam between the split/merge pipeline and the readers that
// produce the raw annotated table. The pipeline only sees this
// trait, so a new annotation format means a new implementation
// here and nothing else changes.

use crate::domain::record::AnnotatedRow;
use anyhow::Result;

// ─── AnnotationSource ─────────────────────────────────────────────────────────
/// Any component that can load the raw annotated table.
///
/// Implementations:
///   - CsvSource     → tabular file with source + conll_label columns
///   - DoccanoSource → annotation-tool export read as JSONL rows
pub trait AnnotationSource: std::fmt::Debug {
    /// Load every annotated row from this source, in file order.
    fn load_all(&self) -> Result<Vec<AnnotatedRow>>;
}
