//! Persistent store of analysed lines.
//!
//! Lines live in a single SQLite table. Only the columns needed for composition are
//! persisted; sampled rows are re-analysed against the same dictionary to rebuild full
//! [`Line`] values.
//!
//! ## Schema
//!
//! ```text
//! line (
//!   id             INTEGER PRIMARY KEY,
//!   raw_text       TEXT NOT NULL,     -- normalised content
//!   syllable_count INTEGER NOT NULL,
//!   rhyme          TEXT NOT NULL      -- rhyme key
//! )
//! ```
//!
//! Syllable filters are bound as a single JSON array parameter and expanded with
//! `json_each`, so a filter of any width costs one SQL variable.
//!
//! The repository is a single-writer handle. The only isolation guarantee is that a
//! bulk insert commits as one transaction.

use crate::analysis::{analyze, Line};
use crate::constants::LINE_TABLE_NAME;
use crate::pronunciation::PronunciationSource;
use crate::{PoemError, PoemResult};
use rand::Rng;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Shared handle to the dictionary used for analysis.
pub type SharedDictionary = Arc<dyn PronunciationSource + Send + Sync>;

/// A rhyme key and the number of stored lines carrying it under some syllable filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RhymeGroup {
    pub rhyme_key: String,
    pub line_count: usize,
}

/// Store of valid lines backed by a SQLite connection.
pub struct LineRepository {
    conn: Connection,
    dictionary: SharedDictionary,
}

impl LineRepository {
    /// Opens (creating if needed) the database at `path`.
    ///
    /// When `fresh` is set the line table is dropped and recreated, discarding any
    /// previously stored lines.
    pub fn open(path: &Path, dictionary: SharedDictionary, fresh: bool) -> PoemResult<Self> {
        let conn = Connection::open(path)?;
        let repository = Self::with_connection(conn, dictionary, fresh)?;
        tracing::debug!("opened line repository at {}", path.display());
        Ok(repository)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(dictionary: SharedDictionary) -> PoemResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, dictionary, true)
    }

    fn with_connection(
        conn: Connection,
        dictionary: SharedDictionary,
        fresh: bool,
    ) -> PoemResult<Self> {
        let repository = Self { conn, dictionary };
        if fresh {
            repository.reset()?;
        } else {
            repository.ensure_schema()?;
        }
        Ok(repository)
    }

    /// Drops every stored line and recreates the schema.
    pub fn reset(&self) -> PoemResult<()> {
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {LINE_TABLE_NAME};"))?;
        self.ensure_schema()
    }

    fn ensure_schema(&self) -> PoemResult<()> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {LINE_TABLE_NAME} (
                 id INTEGER PRIMARY KEY,
                 raw_text TEXT NOT NULL,
                 syllable_count INTEGER NOT NULL,
                 rhyme TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS {LINE_TABLE_NAME}_rhyme_syllables
                 ON {LINE_TABLE_NAME} (rhyme, syllable_count);"
        ))?;
        Ok(())
    }

    /// Analyses every fragment and stores the valid ones in a single transaction.
    ///
    /// # Returns
    ///
    /// The lines that failed analysis, in input order, each carrying its diagnostic.
    ///
    /// # Errors
    ///
    /// Returns `PoemError::Database` if the batch cannot be written; in that case
    /// nothing from the batch is stored.
    pub fn insert_many<I>(&mut self, raw_texts: I) -> PoemResult<Vec<Line>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let (valid, invalid): (Vec<Line>, Vec<Line>) = raw_texts
            .into_iter()
            .map(|raw| analyze(raw.as_ref(), self.dictionary.as_ref()))
            .partition(Line::is_valid);

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {LINE_TABLE_NAME} (raw_text, syllable_count, rhyme) VALUES (?1, ?2, ?3)"
            ))?;
            for line in &valid {
                if let (Some(syllables), Some(rhyme)) = (line.syllable_count(), line.rhyme_key()) {
                    stmt.execute(params![line.content(), syllables, rhyme])?;
                }
            }
        }
        tx.commit()?;

        tracing::info!(
            "stored {} lines, {} failed to parse",
            valid.len(),
            invalid.len()
        );
        Ok(invalid)
    }

    /// Number of stored lines.
    pub fn len(&self) -> PoemResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {LINE_TABLE_NAME}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> PoemResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Every rhyme key with at least `min_count` stored lines whose syllable count is in
    /// `syllable_counts`.
    pub fn qualifying_rhyme_groups(
        &self,
        syllable_counts: &BTreeSet<u32>,
        min_count: usize,
    ) -> PoemResult<BTreeSet<String>> {
        if syllable_counts.is_empty() {
            return Ok(BTreeSet::new());
        }

        let sql = format!(
            "SELECT rhyme FROM {LINE_TABLE_NAME}
             WHERE syllable_count IN (SELECT value FROM json_each(?1))
             GROUP BY rhyme
             HAVING COUNT(id) >= ?2"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let keys = stmt
            .query_map(
                params![syllable_filter(syllable_counts), min_count as i64],
                |row| row.get::<_, String>(0),
            )?
            .collect::<Result<BTreeSet<_>, _>>()?;

        tracing::debug!(
            "{} rhyme groups with >= {} lines at syllables {:?}",
            keys.len(),
            min_count,
            syllable_counts
        );
        Ok(keys)
    }

    /// All rhyme groups under a syllable filter, largest first.
    pub fn rhyme_groups(&self, syllable_counts: &BTreeSet<u32>) -> PoemResult<Vec<RhymeGroup>> {
        if syllable_counts.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT rhyme, COUNT(id) AS line_count FROM {LINE_TABLE_NAME}
             WHERE syllable_count IN (SELECT value FROM json_each(?1))
             GROUP BY rhyme
             ORDER BY line_count DESC, rhyme ASC"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let groups = stmt
            .query_map(params![syllable_filter(syllable_counts)], |row| {
                Ok(RhymeGroup {
                    rhyme_key: row.get(0)?,
                    line_count: row.get::<_, i64>(1)? as usize,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(groups)
    }

    /// Draws `n` distinct lines uniformly at random from those with rhyme key
    /// `rhyme_key` and a syllable count in `syllable_counts`. The result is in random
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `PoemError::InsufficientLines` if fewer than `n` lines match, and
    /// `PoemError::StoredLineInvalid` if a stored row no longer analyses against the
    /// current dictionary to the rhyme key and a syllable count it was selected by.
    pub fn sample_lines(
        &self,
        syllable_counts: &BTreeSet<u32>,
        rhyme_key: &str,
        n: usize,
        rng: &mut impl Rng,
    ) -> PoemResult<Vec<Line>> {
        if syllable_counts.is_empty() || n == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT raw_text FROM {LINE_TABLE_NAME}
             WHERE syllable_count IN (SELECT value FROM json_each(?1)) AND rhyme = ?2
             ORDER BY id"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let candidates = stmt
            .query_map(
                params![syllable_filter(syllable_counts), rhyme_key],
                |row| row.get::<_, String>(0),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        if candidates.len() < n {
            return Err(PoemError::InsufficientLines {
                rhyme_key: rhyme_key.to_owned(),
                requested: n,
                available: candidates.len(),
            });
        }

        rand::seq::index::sample(rng, candidates.len(), n)
            .into_iter()
            .map(|index| self.reanalyze(&candidates[index], syllable_counts, rhyme_key))
            .collect()
    }

    /// Rebuilds a stored line. The fresh analysis must still satisfy the filter the row
    /// was selected by.
    fn reanalyze(
        &self,
        content: &str,
        syllable_counts: &BTreeSet<u32>,
        rhyme_key: &str,
    ) -> PoemResult<Line> {
        let line = analyze(content, self.dictionary.as_ref());
        let stale = |reason: String| {
            tracing::warn!("stored line '{}' is stale: {}", content, reason);
            PoemError::StoredLineInvalid {
                content: content.to_owned(),
                reason,
            }
        };

        let (Some(syllables), Some(key)) = (line.syllable_count(), line.rhyme_key()) else {
            return Err(stale(line.diagnostic()));
        };
        if key != rhyme_key {
            return Err(stale(format!("rhyme is now '{key}', stored as '{rhyme_key}'")));
        }
        if !syllable_counts.contains(&syllables) {
            return Err(stale(format!("{syllables} syllables is outside {syllable_counts:?}")));
        }
        Ok(line)
    }
}

/// JSON array of the allowed counts, e.g. `[7,8]`, for binding to `json_each`.
fn syllable_filter(syllable_counts: &BTreeSet<u32>) -> String {
    serde_json::Value::from(syllable_counts.iter().copied().collect::<Vec<u32>>()).to_string()
}
