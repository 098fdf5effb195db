//! Storage layer for the mood journal.

pub mod any;
pub mod csv;
pub mod memory;
pub mod traits;

pub use any::AnyConnection;
pub use csv::CsvConnection;
pub use memory::MemoryConnection;
pub use traits::{
    Connection, JournalState, JournalStateStorage, MoodStorage, StorageError,
    DEFAULT_RETENTION_DAYS,
};
