//! Shared test helpers for CSV storage tests.

use tempfile::TempDir;

use crate::storage::csv::connection::CsvConnection;

/// A CSV connection rooted in a temp directory that is cleaned up when
/// the environment is dropped.
pub struct TestEnvironment {
    pub connection: CsvConnection,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            _temp_dir: temp_dir,
        })
    }
}
