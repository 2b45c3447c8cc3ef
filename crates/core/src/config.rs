//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! repository and dictionary loaders. Library code never reads environment variables;
//! that is the binary's job.

use crate::constants::{DEFAULT_DB_FILENAME, DEFAULT_DICTIONARY_FILENAME};
use crate::{PoemError, PoemResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    db_path: PathBuf,
    dictionary_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PoemError::InvalidInput` if either path is empty.
    pub fn new(db_path: PathBuf, dictionary_path: PathBuf) -> PoemResult<Self> {
        if db_path.as_os_str().is_empty() {
            return Err(PoemError::InvalidInput("db_path cannot be empty".into()));
        }
        if dictionary_path.as_os_str().is_empty() {
            return Err(PoemError::InvalidInput(
                "dictionary_path cannot be empty".into(),
            ));
        }

        Ok(Self {
            db_path,
            dictionary_path,
        })
    }

    /// Build a config from optional overrides, falling back to the default filenames
    /// relative to the current working directory.
    pub fn from_overrides(
        db_path: Option<PathBuf>,
        dictionary_path: Option<PathBuf>,
    ) -> PoemResult<Self> {
        fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
            path.filter(|p| !p.as_os_str().is_empty())
        }

        Self::new(
            non_empty(db_path).unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILENAME)),
            non_empty(dictionary_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DICTIONARY_FILENAME)),
        )
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn dictionary_path(&self) -> &Path {
        &self.dictionary_path
    }
}
