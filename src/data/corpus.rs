// ============================================================
// Layer 4 — Corpus Parser
// ============================================================
// Reads the flat tagged-token format:
//   - each non-blank line is "<word> <tag>" — the tag is the last
//     whitespace-delimited field, everything before it is the word
//     (internal spaces stay in the word)
//   - sentences are separated by one blank line
//   - the first and last records need no leading/trailing blank
//
// Dataset-specific cleanup applied to every line before parsing,
// reproduced exactly from the annotation toolchain:
//   - tabs become spaces
//   - the non-standard B-MISCELLANEOUS / I-MISCELLANEOUS category
//     is rewritten to the outside tag "O" anywhere in the line
//
// Example:
//   John B-PERSON
//   Smith I-PERSON
//
//   Jane B-PERSON
//
// parses into two records: [John/B-PERSON, Smith/I-PERSON]
// and [Jane/B-PERSON].

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::error::DataError;
use crate::domain::record::{SentenceRecord, TaggedWord};

/// Read a corpus file into sentence records.
pub fn read_corpus(path: impl AsRef<Path>) -> Result<Vec<SentenceRecord>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read corpus file '{}'", path.display()))?;
    parse_corpus(&raw)
}

/// Parse corpus text into sentence records.
///
/// Records are accumulated between blank lines; consecutive blank
/// lines emit nothing, so every returned record is non-empty.
pub fn parse_corpus(text: &str) -> Result<Vec<SentenceRecord>> {
    let mut records = Vec::new();
    let mut current: Vec<TaggedWord> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = clean_line(line);

        if line.trim().is_empty() {
            // Record separator
            if !current.is_empty() {
                records.push(SentenceRecord::new(std::mem::take(&mut current)));
            }
            continue;
        }

        current.push(parse_line(&line, idx + 1)?);
    }

    // The last record may end at end-of-file without a blank line
    if !current.is_empty() {
        records.push(SentenceRecord::new(current));
    }

    tracing::debug!("Parsed {} sentence records", records.len());
    Ok(records)
}

/// Per-line cleanup: tab normalisation and the MISCELLANEOUS
/// rewrite. Applied to the whole line, exactly like the toolchain
/// that produced the corpus.
fn clean_line(line: &str) -> String {
    line.replace('\t', " ")
        .replace("B-MISCELLANEOUS", "O")
        .replace("I-MISCELLANEOUS", "O")
}

/// Split one cleaned line into word and tag at the last space.
fn parse_line(line: &str, line_number: usize) -> Result<TaggedWord> {
    match line.trim_end().rsplit_once(' ') {
        Some((word, tag)) if !word.trim().is_empty() && !tag.is_empty() => {
            Ok(TaggedWord::new(word, tag))
        }
        _ => Err(DataError::MalformedCorpus {
            line:    line_number,
            content: line.to_string(),
        }
        .into()),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_two_records_without_leading_blank_line() {
        let text = "John B-PERSON\nSmith I-PERSON\n\nJane B-PERSON\n";
        let records = parse_corpus(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].words,
            vec![
                TaggedWord::new("John", "B-PERSON"),
                TaggedWord::new("Smith", "I-PERSON"),
            ]
        );
        assert_eq!(records[1].words, vec![TaggedWord::new("Jane", "B-PERSON")]);
    }

    #[test]
    fn test_trailing_blank_line_changes_nothing() {
        let with    = parse_corpus("John B-PERSON\n\nJane B-PERSON\n\n").unwrap();
        let without = parse_corpus("John B-PERSON\n\nJane B-PERSON").unwrap();
        assert_eq!(with, without);
        assert_eq!(with.len(), 2);
    }

    #[test]
    fn test_consecutive_blank_lines_emit_no_empty_records() {
        let records = parse_corpus("John B-PERSON\n\n\n\nJane B-PERSON\n").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.is_empty()));
    }

    #[test]
    fn test_miscellaneous_is_read_back_as_outside() {
        let records = parse_corpus("foo B-MISCELLANEOUS\nbar I-MISCELLANEOUS\n").unwrap();
        assert_eq!(records[0].words[0].tag, "O");
        assert_eq!(records[0].words[1].tag, "O");
    }

    #[test]
    fn test_tab_separated_line_is_accepted() {
        let records = parse_corpus("John\tB-PERSON\n").unwrap();
        assert_eq!(records[0].words[0], TaggedWord::new("John", "B-PERSON"));
    }

    #[test]
    fn test_word_keeps_internal_spaces() {
        // Only the last field is the tag
        let records = parse_corpus("New York B-LOCATION\n").unwrap();
        assert_eq!(
            records[0].words[0],
            TaggedWord::new("New York", "B-LOCATION")
        );
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let err = parse_corpus("John B-PERSON\nJustOneField\n").unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::MalformedCorpus { line, .. }) => assert_eq!(*line, 2),
            other => panic!("expected MalformedCorpus, got {:?}", other),
        }
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let text = "John B-PERSON\nSmith I-PERSON\n\nJane B-PERSON\n";
        assert_eq!(parse_corpus(text).unwrap(), parse_corpus(text).unwrap());
    }

    #[test]
    fn test_read_corpus_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "John B-PERSON\n\nJane B-PERSON\n").unwrap();

        let records = read_corpus(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }
}
