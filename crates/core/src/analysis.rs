//! Phonetic analysis of raw text fragments.
//!
//! Turns a caption-sized piece of text into a [`Line`]: the normalised content, its
//! word tokens and, when every word has a pronunciation, the syllable count and the
//! rhyme key used to group lines that rhyme.
//!
//! ## Rhyme keys
//!
//! Vowel phonemes carry a trailing stress digit (`AW1`, `AH0`). The rhyme key of a
//! line is taken from the transcription of its last word: the last vowel with its
//! stress digit stripped, followed by every phoneme after it, space separated.
//!
//! ```text
//! down   D AW1 N         -> "AW N"
//! brown  B R AW1 N       -> "AW N"
//! hmm    HH M            -> "HHM"    (no vowel: whole transcription, unseparated)
//! ```
//!
//! Homographs always use the first listed transcription.

use crate::constants::VALID_DIAGNOSTIC;
use crate::pronunciation::{PronunciationSource, Transcription};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Why a fragment could not be turned into a valid line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("No words found")]
    NoWords,
    #[error("No pronunciation found for word '{0}'")]
    MissingPronunciation(String),
}

/// Phonetic data of a valid line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phonetics {
    pronunciations: Vec<Transcription>,
    syllable_count: u32,
    rhyme_key: String,
}

/// An analysed text fragment. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    content: String,
    words: Vec<String>,
    analysis: Result<Phonetics, ParseFailure>,
}

impl Line {
    /// Normalised source text.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_valid(&self) -> bool {
        self.analysis.is_ok()
    }

    /// Lowercase word tokens in order of appearance.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The final word token, if any.
    pub fn last_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }

    /// One transcription per word. `None` for invalid lines.
    pub fn pronunciations(&self) -> Option<&[Transcription]> {
        self.analysis
            .as_ref()
            .ok()
            .map(|p| p.pronunciations.as_slice())
    }

    pub fn syllable_count(&self) -> Option<u32> {
        self.analysis.as_ref().ok().map(|p| p.syllable_count)
    }

    pub fn rhyme_key(&self) -> Option<&str> {
        self.analysis.as_ref().ok().map(|p| p.rhyme_key.as_str())
    }

    pub fn failure(&self) -> Option<&ParseFailure> {
        self.analysis.as_ref().err()
    }

    /// Human readable analysis outcome: the failure reason or `"Valid"`.
    pub fn diagnostic(&self) -> String {
        match &self.analysis {
            Ok(_) => VALID_DIAGNOSTIC.to_string(),
            Err(failure) => failure.to_string(),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Analyses `content` against `dictionary`.
pub fn analyze(content: &str, dictionary: &(impl PronunciationSource + ?Sized)) -> Line {
    let content = normalize(content);
    let words = tokenize(&content);

    let analysis = if words.is_empty() {
        Err(ParseFailure::NoWords)
    } else {
        phonetics(&words, dictionary)
    };

    Line {
        content,
        words,
        analysis,
    }
}

/// Trims and collapses embedded line breaks into spaces.
pub fn normalize(content: &str) -> String {
    content
        .trim()
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

/// Extracts lowercase words, allowing a single inner apostrophe (`don't`, `ol'man`).
pub fn tokenize(content: &str) -> Vec<String> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let word = WORD.get_or_init(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("valid word regex"));

    word.find_iter(&content.to_lowercase())
        .map(|m| m.as_str().to_owned())
        .collect()
}

fn phonetics(
    words: &[String],
    dictionary: &(impl PronunciationSource + ?Sized),
) -> Result<Phonetics, ParseFailure> {
    let mut pronunciations = Vec::with_capacity(words.len());
    for word in words {
        let first = dictionary
            .lookup(word)
            .and_then(|transcriptions| transcriptions.first())
            .ok_or_else(|| ParseFailure::MissingPronunciation(word.clone()))?;
        pronunciations.push(first.clone());
    }

    let syllable_count = pronunciations
        .iter()
        .flatten()
        .filter(|phoneme| is_vowel(phoneme))
        .count() as u32;

    // `words` is non-empty, so there is a last transcription.
    let rhyme_key = pronunciations
        .last()
        .map(|last| rhyme_key(last))
        .unwrap_or_default();

    Ok(Phonetics {
        pronunciations,
        syllable_count,
        rhyme_key,
    })
}

/// A vowel phoneme ends in its stress digit (0, 1 or 2).
pub fn is_vowel(phoneme: &str) -> bool {
    phoneme.chars().last().is_some_and(|c| c.is_ascii_digit())
}

/// Rhyme tail of a single transcription.
pub fn rhyme_key(transcription: &[String]) -> String {
    let Some(last_vowel) = transcription.iter().rposition(|p| is_vowel(p)) else {
        return transcription.concat();
    };

    let vowel = &transcription[last_vowel];
    let mut tail = Vec::with_capacity(transcription.len() - last_vowel);
    tail.push(&vowel[..vowel.len() - 1]);
    tail.extend(transcription[last_vowel + 1..].iter().map(String::as_str));
    tail.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pronunciation::PronouncingDictionary;

    fn test_dictionary() -> PronouncingDictionary {
        PronouncingDictionary::from_cmudict(
            "a  AH0\n\
             a(2)  EY1\n\
             cat  K AE1 T\n\
             sat  S AE1 T\n\
             down  D AW1 N\n\
             brown  B R AW1 N\n\
             hmm  HH M\n\
             don't  D OW1 N T\n\
             wonder  W AH1 N D ER0\n\
             thunder  TH AH1 N D ER0\n\
             read  R EH1 D\n\
             read(2)  R IY1 D\n",
        )
        .unwrap()
    }

    fn symbols(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn test_valid_line() {
        let line = analyze("  A cat sat\ndown  ", &test_dictionary());

        assert!(line.is_valid());
        assert_eq!(line.content(), "A cat sat down");
        assert_eq!(line.words(), ["a", "cat", "sat", "down"]);
        assert_eq!(line.syllable_count(), Some(4));
        assert_eq!(line.rhyme_key(), Some("AW N"));
        assert_eq!(line.diagnostic(), "Valid");
        assert_eq!(line.last_word(), Some("down"));
        assert_eq!(line.pronunciations().unwrap().len(), 4);
    }

    #[test]
    fn test_monosyllable_counts_one() {
        let line = analyze("Cat!", &test_dictionary());
        assert_eq!(line.syllable_count(), Some(1));
        assert_eq!(line.rhyme_key(), Some("AE T"));
    }

    #[test]
    fn test_no_words_found() {
        let line = analyze(" 123 -- !! ", &test_dictionary());

        assert!(!line.is_valid());
        assert!(line.words().is_empty());
        assert_eq!(line.failure(), Some(&ParseFailure::NoWords));
        assert_eq!(line.diagnostic(), "No words found");
        assert_eq!(line.syllable_count(), None);
        assert_eq!(line.rhyme_key(), None);
    }

    #[test]
    fn test_missing_pronunciation_names_word() {
        let line = analyze("a cat sat on the mat", &test_dictionary());

        assert!(!line.is_valid());
        assert_eq!(line.words().len(), 6);
        assert_eq!(line.diagnostic(), "No pronunciation found for word 'on'");
        assert!(line.pronunciations().is_none());
    }

    #[test]
    fn test_rhyming_words_share_key() {
        let dictionary = test_dictionary();
        let down = analyze("down", &dictionary);
        let brown = analyze("brown", &dictionary);
        let wonder = analyze("wonder", &dictionary);
        let thunder = analyze("thunder", &dictionary);

        assert_eq!(down.rhyme_key(), brown.rhyme_key());
        assert_eq!(wonder.rhyme_key(), Some("ER"));
        assert_eq!(wonder.rhyme_key(), thunder.rhyme_key());
        assert_ne!(down.rhyme_key(), analyze("cat", &dictionary).rhyme_key());
    }

    #[test]
    fn test_rhyme_key_uses_last_vowel_only() {
        assert_eq!(rhyme_key(&symbols("W AH1 N D ER0")), "ER");
        assert_eq!(rhyme_key(&symbols("D OW1 N T")), "OW N T");
        assert_eq!(rhyme_key(&symbols("K AE2")), "AE");
    }

    #[test]
    fn test_vowelless_word_uses_whole_transcription() {
        let line = analyze("hmm", &test_dictionary());
        assert!(line.is_valid());
        assert_eq!(line.syllable_count(), Some(0));
        assert_eq!(line.rhyme_key(), Some("HHM"));
    }

    #[test]
    fn test_first_listed_pronunciation_wins() {
        let line = analyze("read", &test_dictionary());
        assert_eq!(line.rhyme_key(), Some("EH D"));

        let line = analyze("a", &test_dictionary());
        assert_eq!(line.pronunciations().unwrap()[0], symbols("AH0"));
    }

    #[test]
    fn test_tokenize_apostrophes() {
        assert_eq!(tokenize("Don't STOP, rock'n'roll"), ["don't", "stop", "rock'n", "roll"]);
        assert_eq!(tokenize("'quoted'"), ["quoted"]);
    }

    #[test]
    fn test_normalize_line_breaks() {
        assert_eq!(normalize(" one\r\ntwo\nthree\rfour "), "one two three four");
    }
}
