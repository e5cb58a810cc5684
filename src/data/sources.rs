// ============================================================
// Layer 4 — Annotated-Table Sources
// ============================================================
// The two readers that produce the raw annotated table:
//
//   CsvSource     — tabular file with `source` and `conll_label`
//                   columns; `conll_label` holds a JSON-encoded
//                   array of corpus lines
//   DoccanoSource — annotation-tool export, one JSON object per
//                   line with the same two fields
//
// Both implement the AnnotationSource trait, so everything
// downstream of load_all() is format-agnostic. A row that fails
// to parse is an error, not a skip — these are labels, and losing
// one silently would skew the partitions.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::error::DataError;
use crate::domain::record::AnnotatedRow;
use crate::domain::traits::AnnotationSource;

/// Select a reader for the given `data_format` value.
/// Only "doccano" and "csv" are recognised.
pub fn source_for_format(
    data_format: &str,
    dataset_path: impl Into<PathBuf>,
) -> Result<Box<dyn AnnotationSource>> {
    match data_format {
        "csv" => Ok(Box::new(CsvSource::new(dataset_path))),
        "doccano" => Ok(Box::new(DoccanoSource::new(dataset_path))),
        other => Err(DataError::Configuration(format!(
            "unsupported data_format '{}' (expected 'doccano' or 'csv')",
            other
        ))
        .into()),
    }
}

// ─── CsvSource ────────────────────────────────────────────────────────────────
/// One deserialised CSV record. An empty source field becomes None.
#[derive(Debug, Deserialize)]
struct CsvRow {
    source:      Option<String>,
    conll_label: String,
}

/// Reads the annotated table from a CSV file.
#[derive(Debug)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AnnotationSource for CsvSource {
    fn load_all(&self) -> Result<Vec<AnnotatedRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .with_context(|| format!("Cannot read csv file '{}'", self.path.display()))?;

        let mut rows = Vec::new();
        for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
            let record = result.with_context(|| {
                format!("Malformed csv record {} in '{}'", idx + 1, self.path.display())
            })?;

            // The tag-sequence column is a JSON-encoded list of
            // corpus lines
            let conll_label: Vec<String> =
                serde_json::from_str(&record.conll_label).with_context(|| {
                    format!(
                        "Record {}: conll_label is not a JSON list of strings",
                        idx + 1
                    )
                })?;

            rows.push(AnnotatedRow::new(record.source, conll_label));
        }

        tracing::info!(
            "Loaded {} annotated rows from '{}'",
            rows.len(),
            self.path.display()
        );
        Ok(rows)
    }
}

// ─── DoccanoSource ────────────────────────────────────────────────────────────
/// One row of the annotation-tool export. The external reader
/// guarantees these two fields per JSONL line.
#[derive(Debug, Deserialize)]
struct DoccanoRow {
    #[serde(default)]
    source:      Option<String>,
    conll_label: Vec<String>,
}

/// Reads the annotated table from a doccano-style JSONL export.
#[derive(Debug)]
pub struct DoccanoSource {
    path: PathBuf,
}

impl DoccanoSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AnnotationSource for DoccanoSource {
    fn load_all(&self) -> Result<Vec<AnnotatedRow>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read jsonl file '{}'", self.path.display()))?;

        let mut rows = Vec::new();
        for (idx, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let row: DoccanoRow = serde_json::from_str(line).with_context(|| {
                format!(
                    "Malformed jsonl record {} in '{}'",
                    idx + 1,
                    self.path.display()
                )
            })?;

            rows.push(AnnotatedRow::new(row.source, row.conll_label));
        }

        tracing::info!(
            "Loaded {} annotated rows from '{}'",
            rows.len(),
            self.path.display()
        );
        Ok(rows)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_csv_rows_with_json_encoded_labels() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            concat!(
                "source,conll_label\n",
                "wiki,\"[\"\"John B-PERSON\"\", \"\"Smith I-PERSON\"\"]\"\n",
                ",\"[\"\"Jane B-PERSON\"\"]\"\n",
            )
        )
        .unwrap();

        let rows = CsvSource::new(file.path()).load_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source.as_deref(), Some("wiki"));
        assert_eq!(rows[0].conll_label, vec!["John B-PERSON", "Smith I-PERSON"]);
        // Empty source field reads as missing
        assert_eq!(rows[1].source, None);
    }

    #[test]
    fn test_csv_with_invalid_label_list_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "source,conll_label\nwiki,not-a-list\n").unwrap();

        assert!(CsvSource::new(file.path()).load_all().is_err());
    }

    #[test]
    fn test_doccano_jsonl_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"source": "resume", "conll_label": ["John B-PERSON"]}}"#
        )
        .unwrap();
        writeln!(file, r#"{{"conll_label": ["Jane B-PERSON"]}}"#).unwrap();

        let rows = DoccanoSource::new(file.path()).load_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source.as_deref(), Some("resume"));
        assert_eq!(rows[1].source, None);
        assert_eq!(rows[1].conll_label, vec!["Jane B-PERSON"]);
    }

    #[test]
    fn test_unsupported_format_is_a_configuration_error() {
        let err = source_for_format("excel", "whatever.xlsx").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::Configuration(_))
        ));
    }
}
