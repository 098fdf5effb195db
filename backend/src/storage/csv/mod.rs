//! CSV file storage backend.
//!
//! Human-readable storage: the mood log is a plain CSV file and the
//! journal state is a small YAML file, both under one data directory.

pub mod connection;
pub mod journal_state_repository;
pub mod mood_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use journal_state_repository::JournalStateRepository;
pub use mood_repository::MoodRepository;
