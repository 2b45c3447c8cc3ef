//! # Poem Core
//!
//! Core logic for composing rhyming poems out of found text fragments.
//!
//! This crate contains the analysis, storage and composition operations:
//! - Phonetic analysis of fragments into syllable-counted, rhyme-keyed [`Line`]s
//! - A SQLite-backed [`LineRepository`] with rhyme-group queries and random sampling
//! - The [`PoemComposer`], which fills a rhyme-scheme pattern such as `"AABBA"`
//! - [`compose_distinct`], which retries composition to avoid self-rhymes
//!
//! All randomness is taken as a `&mut impl rand::Rng` argument so callers can seed it.
//!
//! **No presentation concerns**: argument parsing, file ingestion and printing belong
//! in the `poem-cli` crate.

pub mod analysis;
pub mod composer;
pub mod config;
pub mod constants;
pub mod error;
pub mod pattern;
pub mod poem;
pub mod pronunciation;
pub mod repository;
pub mod retry;

#[cfg(test)]
pub(crate) mod test_support;

pub use analysis::{analyze, Line, ParseFailure};
pub use composer::PoemComposer;
pub use config::CoreConfig;
pub use error::{PoemError, PoemResult};
pub use pattern::{LabelConstraint, PatternSpec};
pub use poem::Poem;
pub use pronunciation::{PronouncingDictionary, PronunciationSource, Transcription};
pub use repository::{LineRepository, RhymeGroup, SharedDictionary};
pub use retry::compose_distinct;

/// Summary line for a bulk insert, e.g. `"3/120 failed to parse"`.
pub fn ingestion_report(failed: usize, total: usize) -> String {
    format!("{failed}/{total} failed to parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_report() {
        assert_eq!(ingestion_report(3, 120), "3/120 failed to parse");
        assert_eq!(ingestion_report(0, 0), "0/0 failed to parse");
    }
}
