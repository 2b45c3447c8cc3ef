//! Constants used throughout the poem core crate.
//!
//! This module contains storage names, environment variable names and composition
//! defaults so that the CLI and the library agree on them.

/// Default database filename when no explicit path is configured.
pub const DEFAULT_DB_FILENAME: &str = "poems.db";

/// Default CMUdict-format pronunciation dictionary filename.
pub const DEFAULT_DICTIONARY_FILENAME: &str = "cmudict.dict";

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "POEM_DB_PATH";

/// Environment variable overriding the pronunciation dictionary path.
pub const DICTIONARY_PATH_ENV: &str = "POEM_DICTIONARY_PATH";

/// Table holding analysed lines.
pub const LINE_TABLE_NAME: &str = "line";

/// Title used when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Author used when the caller does not supply one.
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Number of composition attempts made while looking for distinct end words.
pub const DEFAULT_DISTINCT_ATTEMPTS: usize = 5;

/// Diagnostic attached to lines that analysed successfully.
pub const VALID_DIAGNOSTIC: &str = "Valid";

/// Largest syllable count accepted in a parsed constraint. No caption line comes close.
pub const MAX_SYLLABLE_COUNT: u32 = 1000;
