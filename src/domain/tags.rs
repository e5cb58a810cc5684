// ============================================================
// Layer 3 — Tag Vocabulary
// ============================================================
// The fixed set of NER tags and their integer ids.
//
// Ids are assigned in vocabulary order, starting at 0, and the
// mapping is bijective: every tag has exactly one id and vice
// versa. Duplicates in the input keep their first occurrence.
//
// A tag found in the corpus but absent from this vocabulary is
// never an error — the alignment engine maps that position to
// IGNORE_INDEX instead (see data::alignment).

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Label id for positions excluded from loss/metric computation:
/// special tokens, padding, and (policy-dependent) continuation
/// sub-words.
pub const IGNORE_INDEX: i64 = -100;

/// Ordered, duplicate-free tag set with 0-based integer ids.
#[derive(Debug, Clone)]
pub struct TagVocabulary {
    /// Tags in id order — tags[i] has id i
    tags: Vec<String>,
    /// Reverse lookup: tag → id
    tag2id: HashMap<String, i64>,
}

impl TagVocabulary {
    /// Build a vocabulary from an ordered tag list.
    /// Duplicates keep their first occurrence and its id.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut tag2id = HashMap::new();

        for tag in tags {
            let tag = tag.into();
            if !tag2id.contains_key(&tag) {
                tag2id.insert(tag.clone(), ordered.len() as i64);
                ordered.push(tag);
            }
        }

        Self { tags: ordered, tag2id }
    }

    /// Read a vocabulary from a JSON array of tag strings.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read tags file '{}'", path.display()))?;

        let tags: Vec<String> = serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a JSON array of tags", path.display()))?;

        Ok(Self::new(tags))
    }

    /// The integer id of a tag, or None when the tag is not in the
    /// vocabulary.
    pub fn id_of(&self, tag: &str) -> Option<i64> {
        self.tag2id.get(tag).copied()
    }

    /// Tags in id order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The stock vocabulary this corpus was annotated with:
    /// B-/I- pairs for each entity category plus the outside tag.
    pub fn default_tags() -> Self {
        Self::new([
            "B-ADDRESS", "I-ADDRESS",
            "B-SKILL", "I-SKILL",
            "B-EMAIL", "I-EMAIL",
            "B-PERSON", "I-PERSON",
            "B-PHONENUMBER", "I-PHONENUMBER",
            "B-QUANTITY", "I-QUANTITY",
            "B-PERSONTYPE", "I-PERSONTYPE",
            "B-ORGANIZATION", "I-ORGANIZATION",
            "B-PRODUCT", "I-PRODUCT",
            "B-IP", "I-IP",
            "B-LOCATION", "I-LOCATION",
            "O",
            "B-DATETIME", "I-DATETIME",
            "B-EVENT", "I-EVENT",
            "B-URL", "I-URL",
        ])
    }
}
