//! Durable phrase counters
//!
//! Counters live in memory and are rewritten to a JSON file on every change.
//! Storage failures are logged and absorbed; counting continues in memory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A counted phrase. `text` is the unique key and is stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub text: String,
    pub count: u64,
}

/// The phrase set used when no stored data exists
pub fn default_phrases() -> Vec<Phrase> {
    ["subhanallah", "alhamdulillah", "allahu akbar", "la ilaha illallah"]
        .iter()
        .map(|text| Phrase {
            text: text.to_string(),
            count: 0,
        })
        .collect()
}

/// Phrase counter store backed by a JSON file
pub struct PhraseStore {
    path: PathBuf,
    phrases: Vec<Phrase>,
}

impl PhraseStore {
    /// Load the store from `path`.
    ///
    /// Absent or malformed data falls back to the default phrase set with
    /// zero counts; loading never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let phrases = match Self::read_phrases(&path) {
            Ok(Some(phrases)) => {
                info!("Loaded {} phrases from {}", phrases.len(), path.display());
                phrases
            }
            Ok(None) => {
                info!("No stored phrases at {}; using defaults", path.display());
                default_phrases()
            }
            Err(e) => {
                warn!(
                    "Failed to load phrases from {}: {:#}; using defaults",
                    path.display(),
                    e
                );
                default_phrases()
            }
        };

        Self { path, phrases }
    }

    fn read_phrases(path: &Path) -> Result<Option<Vec<Phrase>>> {
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(path).context("Failed to read phrase store")?;
        let phrases = serde_json::from_str(&data).context("Failed to parse phrase store")?;

        Ok(Some(phrases))
    }

    /// Current phrases, in list order
    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    /// Current phrase texts, in list order
    pub fn phrase_texts(&self) -> Vec<String> {
        self.phrases.iter().map(|p| p.text.clone()).collect()
    }

    /// Sum of all counters
    pub fn total_count(&self) -> u64 {
        self.phrases.iter().map(|p| p.count).sum()
    }

    /// Increment the counter for `text`.
    ///
    /// Returns false when the phrase is not in the list (it may have been
    /// deleted between the match and the count).
    pub fn record_match(&mut self, text: &str) -> bool {
        match self.phrases.iter_mut().find(|p| p.text == text) {
            Some(phrase) => {
                phrase.count += 1;
                self.save();
                true
            }
            None => false,
        }
    }

    /// Add a phrase with a zero counter.
    ///
    /// The text is trimmed and lowercased first. Returns false for empty
    /// text or a duplicate.
    pub fn add_phrase(&mut self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        if text.is_empty() || self.phrases.iter().any(|p| p.text == text) {
            return false;
        }

        self.phrases.push(Phrase { text, count: 0 });
        self.save();
        true
    }

    /// Remove a phrase and its counter. Returns false when not present.
    pub fn delete_phrase(&mut self, text: &str) -> bool {
        let before = self.phrases.len();
        self.phrases.retain(|p| p.text != text);

        if self.phrases.len() == before {
            return false;
        }

        self.save();
        true
    }

    /// Reset every counter to zero, keeping the phrase list
    pub fn reset_counts(&mut self) {
        for phrase in &mut self.phrases {
            phrase.count = 0;
        }
        self.save();
    }

    fn save(&self) {
        if let Err(e) = self.write_phrases() {
            warn!(
                "Failed to save phrases to {}: {:#}",
                self.path.display(),
                e
            );
        }
    }

    fn write_phrases(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).context("Failed to create storage directory")?;
            }
        }

        let data = serde_json::to_string_pretty(&self.phrases)?;
        fs::write(&self.path, data).context("Failed to write phrase store")?;

        Ok(())
    }
}
