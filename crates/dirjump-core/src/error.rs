#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Invalid path {0}")]
    InvalidPath(std::path::PathBuf),
    #[error("Failed to canonicalize path {0}: {1}")]
    Canonicalize(std::path::PathBuf, #[source] std::io::Error),
    #[error("Failed to create directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("Failed to open history database env: {0}")]
    EnvOpen(#[source] heed::Error),
    #[error("Failed to create history database: {0}")]
    DbCreate(#[source] heed::Error),
    #[error("Failed to clear stale readers for history database: {0}")]
    DbClearStaleReaders(#[source] heed::Error),

    #[error("Failed to start read transaction for history database: {0}")]
    DbStartReadTxn(#[source] heed::Error),
    #[error("Failed to start write transaction for history database: {0}")]
    DbStartWriteTxn(#[source] heed::Error),

    #[error("Failed to read from history database: {0}")]
    DbRead(#[source] heed::Error),
    #[error("Failed to write to history database: {0}")]
    DbWrite(#[source] heed::Error),
    #[error("Failed to commit write transaction to history database: {0}")]
    DbCommit(#[source] heed::Error),

    #[error("A shortcut named '{0}' already exists")]
    DuplicateName(String),
    #[error("Invalid shortcut name '{0}': names must be non-empty and free of path separators")]
    InvalidName(String),
    #[error("No shortcut named '{0}'")]
    NotFound(String),

    #[error("Failed to read config file: {0}")]
    ConfigRead(#[source] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[source] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
