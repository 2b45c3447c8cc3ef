#[derive(Debug, thiserror::Error)]
pub enum PoemError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("empty pattern")]
    EmptyPattern,
    #[error("pattern label '{0}' does not exist in syllable constraints")]
    MissingConstraint(char),
    #[error("empty syllable constraint for pattern label '{0}'")]
    EmptyConstraint(char),
    #[error("no rhyme group large enough for pattern label '{0}'")]
    ResourceExhausted(char),

    #[error(
        "requested {requested} lines with rhyme '{rhyme_key}' but only {available} are stored"
    )]
    InsufficientLines {
        rhyme_key: String,
        requested: usize,
        available: usize,
    },
    #[error("stored line no longer analyses as valid ({reason}): {content}")]
    StoredLineInvalid { content: String, reason: String },

    #[error("failed to read pronunciation dictionary: {0}")]
    DictionaryRead(std::io::Error),
    #[error("malformed pronunciation dictionary entry on line {line}: {reason}")]
    DictionaryParse { line: usize, reason: String },
    #[error("failed to deserialize pronunciation dictionary: {0}")]
    DictionaryDeserialization(serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type PoemResult<T> = std::result::Result<T, PoemError>;
