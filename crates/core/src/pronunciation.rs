//! Pronunciation lookup.
//!
//! The analyser consults pronunciations through the [`PronunciationSource`] trait and
//! never cares where they come from. [`PronouncingDictionary`] is the bundled adapter:
//! an in-memory map loaded from either the CMU Pronouncing Dictionary text format or
//! a JSON object.
//!
//! ## CMUdict format
//!
//! ```text
//! ;;; comment
//! read  R EH1 D
//! read(2)  R IY1 D
//! cat  K AE1 T  # trailing comments are ignored
//! ```
//!
//! Alternates are kept in file order, so the first listed transcription is the one the
//! analyser uses.
//!
//! ## JSON format
//!
//! ```text
//! {"read": [["R", "EH1", "D"], ["R", "IY1", "D"]]}
//! ```

use crate::{PoemError, PoemResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One pronunciation of a word: an ordered sequence of phoneme symbols.
pub type Transcription = Vec<String>;

/// A word → transcriptions lookup.
///
/// `None` means the word is unknown. Implementations should never return an empty
/// slice for a known word.
pub trait PronunciationSource {
    fn lookup(&self, word: &str) -> Option<&[Transcription]>;
}

/// In-memory pronunciation dictionary keyed by lowercase word.
#[derive(Clone, Debug, Default)]
pub struct PronouncingDictionary {
    entries: HashMap<String, Vec<Transcription>>,
}

impl PronouncingDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a dictionary from disk.
    ///
    /// Files with a `.json` extension are parsed as JSON, anything else as CMUdict text.
    ///
    /// # Errors
    ///
    /// Returns `PoemError::DictionaryRead` if the file cannot be read, or a parse error
    /// from the matching format loader.
    pub fn load(path: &Path) -> PoemResult<Self> {
        let contents = fs::read_to_string(path).map_err(PoemError::DictionaryRead)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let dictionary = if is_json {
            Self::from_json(&contents)?
        } else {
            Self::from_cmudict(&contents)?
        };

        tracing::info!(
            "loaded {} pronunciations from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// Parses CMUdict text.
    ///
    /// # Errors
    ///
    /// Returns `PoemError::DictionaryParse` for a non-comment line that has a word but
    /// no phonemes.
    pub fn from_cmudict(text: &str) -> PoemResult<Self> {
        let mut dictionary = Self::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(headword) = fields.next() else {
                continue;
            };
            let phonemes: Transcription = fields.map(str::to_owned).collect();
            if phonemes.is_empty() {
                return Err(PoemError::DictionaryParse {
                    line: index + 1,
                    reason: format!("word '{headword}' has no phonemes"),
                });
            }

            dictionary.insert(strip_variant_suffix(headword), phonemes);
        }

        Ok(dictionary)
    }

    /// Parses a JSON object mapping words to lists of transcriptions.
    ///
    /// Keys are read in document order, so when `"Read"` and `"read"` both appear the
    /// transcriptions of the earlier key come first.
    ///
    /// # Errors
    ///
    /// Returns `PoemError::DictionaryDeserialization` for malformed JSON and
    /// `PoemError::DictionaryParse` for a word with an empty transcription list.
    pub fn from_json(json: &str) -> PoemResult<Self> {
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(PoemError::DictionaryDeserialization)?;

        let mut dictionary = Self::new();
        for (word, value) in raw {
            let transcriptions: Vec<Transcription> =
                serde_json::from_value(value).map_err(PoemError::DictionaryDeserialization)?;
            if transcriptions.is_empty() {
                return Err(PoemError::DictionaryParse {
                    line: 0,
                    reason: format!("word '{word}' has no transcriptions"),
                });
            }
            for transcription in transcriptions {
                dictionary.insert(&word, transcription);
            }
        }

        Ok(dictionary)
    }

    /// Appends a transcription for `word`. Earlier transcriptions keep priority.
    pub fn insert(&mut self, word: &str, transcription: Transcription) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(transcription);
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PronunciationSource for PronouncingDictionary {
    fn lookup(&self, word: &str) -> Option<&[Transcription]> {
        self.entries.get(word).map(Vec::as_slice)
    }
}

/// `read(2)` → `read`
fn strip_variant_suffix(headword: &str) -> &str {
    match headword.find('(') {
        Some(open) if headword.ends_with(')') => &headword[..open],
        _ => headword,
    }
}
