// ============================================================
// Layer 4 — Label Alignment
// ============================================================
// Maps word-level tags onto the sub-word tokens the tokenizer
// produces. The tokenizer reports, for every token position, the
// index of the word it came from (or none for special and padding
// tokens) — that attribution drives the labels:
//
//   word id      label id
//   ---------    ---------------------------------------------
//   none         IGNORE_INDEX
//   new word     id of the word's tag
//   same word    id of the word's tag when label_all_subwords,
//                IGNORE_INDEX otherwise
//
// A tag missing from the vocabulary never fails the sentence: the
// position gets IGNORE_INDEX and the unknown_tags count goes up.
//
// The sentence text is rebuilt by joining words with single spaces
// and re-tokenised as raw text, so word boundaries are whatever
// the tokenizer infers from whitespace. Multi-word tokens and
// languages without whitespace-delimited words may misalign —
// an accepted limitation, not corrected here.

use anyhow::Result;
use tokenizers::Tokenizer;

use crate::data::dataset::NerSample;
use crate::domain::record::SentenceRecord;
use crate::domain::tags::{TagVocabulary, IGNORE_INDEX};

/// One aligned sentence plus its diagnostic counter.
#[derive(Debug, Clone)]
pub struct AlignedSentence {
    pub sample: NerSample,

    /// Token positions whose word tag was absent from the
    /// vocabulary (or whose word index fell outside the record).
    /// Informational only — never an error.
    pub unknown_tags: usize,
}

/// Tokenise one sentence record and align its word-level tags to
/// the sub-word positions.
///
/// The tokenizer must already carry its truncation and fixed-length
/// padding configuration (see infra::tokenizer_store), so all three
/// output arrays have exactly that configured length.
pub fn align_labels(
    record: &SentenceRecord,
    vocab: &TagVocabulary,
    tokenizer: &Tokenizer,
    label_all_subwords: bool,
) -> Result<AlignedSentence> {
    let text = record.text();

    let encoding = tokenizer
        .encode(text.as_str(), true)
        .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

    let word_ids = encoding.get_word_ids();
    let mut labels = Vec::with_capacity(word_ids.len());
    let mut unknown_tags = 0usize;
    let mut previous_word: Option<u32> = None;

    for &word_id in word_ids {
        let label = match word_id {
            // Special tokens and padding carry no word
            None => IGNORE_INDEX,

            // First sub-word of a new word gets the word's tag
            Some(w) if previous_word != Some(w) => {
                lookup_tag(record, vocab, w, &mut unknown_tags)
            }

            // Continuation sub-word of the same word
            Some(w) => {
                if label_all_subwords {
                    lookup_tag(record, vocab, w, &mut unknown_tags)
                } else {
                    IGNORE_INDEX
                }
            }
        };

        labels.push(label);
        previous_word = word_id;
    }

    let sample = NerSample {
        input_ids:      encoding.get_ids().to_vec(),
        attention_mask: encoding.get_attention_mask().to_vec(),
        labels,
    };

    Ok(AlignedSentence { sample, unknown_tags })
}

/// Vocabulary id of the tag for word `word_index`, or IGNORE_INDEX
/// (counted) when the tag or the word index is unknown.
fn lookup_tag(
    record: &SentenceRecord,
    vocab: &TagVocabulary,
    word_index: u32,
    unknown_tags: &mut usize,
) -> i64 {
    match record
        .tag_at(word_index as usize)
        .and_then(|tag| vocab.id_of(tag))
    {
        Some(id) => id,
        None => {
            *unknown_tags += 1;
            IGNORE_INDEX
        }
    }
}
