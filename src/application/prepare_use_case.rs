// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates dataset preparation in order:
//
//   Step 1: Read the annotated table      (Layer 4 - sources)
//   Step 2: Optional sentence merge       (Layer 4 - splitter)
//   Step 3: Fill missing sources          (Layer 4 - splitter)
//   Step 4: Two-stage stratified split    (Layer 4 - splitter)
//   Step 5: Write the partition files     (Layer 4 - splitter)
//
// The output files feed the Corpus Parser on the loading side.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::sources::source_for_format;
use crate::data::splitter::{
    fill_missing_sources, merge_rows, split_partitions, write_partition,
    TEST_PARTITION_FILE, TRAIN_PARTITION_FILE, VAL_PARTITION_FILE,
};

// ─── Preparation Configuration ───────────────────────────────────────────────
// Everything one preparation run needs. Immutable once built and
// serialisable so a run can be reproduced from its config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub dataset_path:   String,
    pub output_dir:     String,
    pub data_format:    String,
    pub val_size:       f64,
    pub test_size:      f64,
    pub merge_sentence: Option<usize>,
    pub random_state:   u64,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            dataset_path:   "origin_dataset/all_data.csv".to_string(),
            output_dir:     "dataset/current".to_string(),
            data_format:    "csv".to_string(),
            val_size:       0.2,
            test_size:      0.1,
            merge_sentence: None,
            random_state:   43,
        }
    }
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Run the full preparation pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Read the annotated table ─────────────────────────────────
        // The format selector picks the reader; anything but
        // "doccano" or "csv" fails here before any file is touched.
        let source = source_for_format(&cfg.data_format, &cfg.dataset_path)?;
        let mut rows = source.load_all()?;

        // ── Step 2: Optional sentence merge ───────────────────────────────────
        if let Some(factor) = cfg.merge_sentence {
            rows = merge_rows(rows, factor)?;
            tracing::info!("Merged into {} rows (factor {})", rows.len(), factor);
        }

        // ── Step 3: Missing sources become "other" ────────────────────────────
        fill_missing_sources(&mut rows);

        // ── Step 4: Two-stage stratified split ────────────────────────────────
        // Stage 1 uses cfg.random_state, stage 2 the fixed seed
        let partitions = split_partitions(rows, cfg.val_size, cfg.test_size, cfg.random_state)?;

        // ── Step 5: Write the three partition files ───────────────────────────
        write_partition(&partitions.train, &cfg.output_dir, TRAIN_PARTITION_FILE)?;
        write_partition(&partitions.val, &cfg.output_dir, VAL_PARTITION_FILE)?;
        write_partition(&partitions.test, &cfg.output_dir, TEST_PARTITION_FILE)?;

        tracing::info!("Partitions written to '{}'", cfg.output_dir);
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::corpus::read_corpus;
    use crate::domain::error::DataError;
    use std::io::Write;

    fn write_csv(dir: &std::path::Path, rows: usize) -> std::path::PathBuf {
        let path = dir.join("annotations.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "source,conll_label").unwrap();
        for i in 0..rows {
            let source = if i % 2 == 0 { "wiki" } else { "resume" };
            writeln!(file, "{},\"[\"\"word{} O\"\"]\"", source, i).unwrap();
        }
        path
    }

    fn config(dir: &std::path::Path, csv_path: &std::path::Path) -> PrepareConfig {
        PrepareConfig {
            dataset_path: csv_path.to_string_lossy().into_owned(),
            output_dir:   dir.join("out").to_string_lossy().into_owned(),
            ..PrepareConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_partitions_cover_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(dir.path(), 40);

        PrepareUseCase::new(config(dir.path(), &csv_path))
            .execute()
            .unwrap();

        let out = dir.path().join("out");
        let train = read_corpus(out.join(TRAIN_PARTITION_FILE)).unwrap();
        let val = read_corpus(out.join(VAL_PARTITION_FILE)).unwrap();
        let test = read_corpus(out.join(TEST_PARTITION_FILE)).unwrap();

        assert_eq!(train.len() + val.len() + test.len(), 40);
        assert_eq!(train.len(), 28);
        assert_eq!(val.len(), 8);
        assert_eq!(test.len(), 4);
    }

    #[test]
    fn test_merge_factor_halves_the_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(dir.path(), 40);

        let mut cfg = config(dir.path(), &csv_path);
        cfg.merge_sentence = Some(2);
        PrepareUseCase::new(cfg).execute().unwrap();

        let out = dir.path().join("out");
        let total = read_corpus(out.join(TRAIN_PARTITION_FILE)).unwrap().len()
            + read_corpus(out.join(VAL_PARTITION_FILE)).unwrap().len()
            + read_corpus(out.join(TEST_PARTITION_FILE)).unwrap().len();
        assert_eq!(total, 20);
    }

    #[test]
    fn test_bad_ratios_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(dir.path(), 10);

        let mut cfg = config(dir.path(), &csv_path);
        cfg.val_size = 0.6;
        cfg.test_size = 0.4;

        let err = PrepareUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(dir.path(), 10);

        let mut cfg = config(dir.path(), &csv_path);
        cfg.data_format = "excel".to_string();

        assert!(PrepareUseCase::new(cfg).execute().is_err());
    }
}
