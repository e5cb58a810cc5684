// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the sub-word tokenizer once and configures it for the
// alignment engine: truncation plus fixed-length padding, so every
// encoding comes back with exactly max_seq_length positions.
// Loading is the expensive step — the returned instance is shared
// read-only by all alignment calls and never reloaded per
// sentence.
//
// When no tokenizer.json exists yet, build_and_save constructs a
// word-level vocabulary from corpus text and writes a valid
// tokenizer JSON directly. A word-level model keeps the same
// whitespace word boundaries the alignment contract relies on, so
// word-index attribution works out of the box.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load an existing tokenizer or build a word-level one from
    /// the given texts, then apply the fixed-length configuration.
    pub fn load_or_build(&self, texts: &[String], max_seq_length: usize) -> Result<Tokenizer> {
        let tok_path = self.dir.join("tokenizer.json");
        if tok_path.exists() {
            tracing::info!("Loading existing tokenizer from disk");
        } else {
            tracing::info!("Building new word-level tokenizer");
            self.build_and_save(texts)?;
        }
        self.load(max_seq_length)
    }

    /// Load tokenizer.json and configure it for fixed-length output.
    pub fn load(&self, max_seq_length: usize) -> Result<Tokenizer> {
        let path = self.dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
        })?;

        apply_fixed_length(&mut tokenizer, max_seq_length)?;
        Ok(tokenizer)
    }

    /// Build a word-level vocabulary from corpus text and write a
    /// valid tokenizer JSON directly.
    fn build_and_save(&self, texts: &[String]) -> Result<()> {
        std::fs::create_dir_all(&self.dir).ok();

        // ── Step 1: Word frequencies over the corpus ──────────────────────────
        use std::collections::HashMap;
        let mut freq: HashMap<String, usize> = HashMap::new();

        for text in texts {
            for word in text.split_whitespace() {
                // Lowercase to match the BertNormalizer below
                let w = word.to_lowercase();
                if !w.is_empty() {
                    *freq.entry(w).or_insert(0) += 1;
                }
            }
        }

        // Frequency descending, then alphabetical — deterministic ids
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        // ── Step 2: Build vocab JSON ──────────────────────────────────────────
        // [PAD] takes id 0 so the default padding configuration
        // lines up with the vocabulary
        let mut vocab = serde_json::json!({
            "[PAD]": 0,
            "[UNK]": 1,
        });

        let mut next_id = 2usize;
        for (word, _) in &words {
            if vocab.get(word).is_none() {
                vocab[word] = serde_json::json!(next_id);
                next_id += 1;
            }
        }

        // ── Step 3: Write tokenizer JSON in HuggingFace format ────────────────
        // This is the format Tokenizer::from_file() expects
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0, "content": "[PAD]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1, "content": "[UNK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let tok_path = self.dir.join("tokenizer.json");
        std::fs::write(&tok_path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| "Cannot write tokenizer JSON")?;

        tracing::info!(
            "Tokenizer built with {} words, saved to '{}'",
            next_id,
            tok_path.display()
        );
        Ok(())
    }
}

/// Configure truncation and fixed-length padding so every encoding
/// has exactly `max_seq_length` positions.
pub fn apply_fixed_length(tokenizer: &mut Tokenizer, max_seq_length: usize) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_seq_length,
            ..Default::default()
        }))
        .map_err(|e| anyhow::anyhow!("Cannot configure truncation: {e}"))?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::Fixed(max_seq_length),
        ..Default::default()
    }));

    Ok(())
}
