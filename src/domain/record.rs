// ============================================================
// Layer 3 — Record Types
// ============================================================
// Plain data structs with no behaviour beyond construction and
// simple accessors:
//   - TaggedWord / SentenceRecord: one parsed corpus sentence
//   - AnnotatedRow: one row of the raw annotated table before
//     splitting

use serde::{Deserialize, Serialize};

/// One word of a sentence together with its word-level tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedWord {
    pub word: String,
    pub tag:  String,
}

impl TaggedWord {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag:  tag.into(),
        }
    }
}

/// An ordered sequence of tagged words — one sentence of the
/// corpus. The parser never emits an empty record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub words: Vec<TaggedWord>,
}

impl SentenceRecord {
    pub fn new(words: Vec<TaggedWord>) -> Self {
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Reconstruct the sentence text by joining words with single
    /// spaces. The tokenizer re-derives word boundaries from this
    /// whitespace.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The tag of the word at `word_index`, if the index is in range.
    pub fn tag_at(&self, word_index: usize) -> Option<&str> {
        self.words.get(word_index).map(|w| w.tag.as_str())
    }
}

/// One row of the raw annotated table: a source category used for
/// stratification plus the tagged corpus lines for that row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    /// Source category; None when the annotation tool recorded none
    pub source: Option<String>,

    /// Corpus lines ("<word> <tag>") for this row, in order
    pub conll_label: Vec<String>,
}

impl AnnotatedRow {
    pub fn new(source: Option<String>, conll_label: Vec<String>) -> Self {
        Self { source, conll_label }
    }
}
