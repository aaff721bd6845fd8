pub mod codec;
pub mod file;

use std::io;
use std::path::PathBuf;

use herald_types::LogRecord;

pub use codec::{ParseError, decode_line, encode_line};
pub use file::FileLogStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be opened, read or written.
    #[error("log store at {} is unavailable: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Nothing has been appended since the store was created or last cleared.
    #[error("log store at {} does not exist", .path.display())]
    NotFound { path: PathBuf },
}

/// Append-only audit trail of dispatched notifications.
pub trait LogStore: Send + Sync {
    /// Appends one record, creating the store if it does not exist yet.
    fn append(&self, record: &LogRecord) -> Result<(), StoreError>;

    /// Every readable record, newest first. Unreadable entries are skipped.
    fn read_all(&self) -> Result<Vec<LogRecord>, StoreError>;

    /// Destroys the whole store.
    fn clear(&self) -> Result<(), StoreError>;
}
