// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// The two failure modes that carry a type:
//   - MalformedCorpus: a corpus line that doesn't split into
//     word + tag
//   - Configuration:   invalid split ratios or an unknown
//     data_format selector
//
// Unknown tags are NOT errors — the alignment engine recovers
// locally with the ignore sentinel and counts them (see
// data::alignment). Out-of-range dataset access returns None via
// the Dataset trait. Everything else propagates as anyhow errors
// with context attached at the I/O boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    /// A non-blank corpus line with no word/tag separator.
    #[error("malformed corpus line {line}: '{content}'")]
    MalformedCorpus { line: usize, content: String },

    /// Invalid split ratios or an unsupported format selector.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
