//! Connection sources
//!
//! The store does not decide where its connection comes from. Anything that
//! can hand out a live SQLite connection implements `ConnectionSource`.

use std::path::{Path, PathBuf};
use rusqlite::Connection;
use crate::{Error, Result};

/// Supplies a database connection to an `ErrorStore`
pub trait ConnectionSource {
    fn connect(&self) -> Result<Connection>;
}

/// A SQLite database file, created on first use
#[derive(Debug, Clone)]
pub struct DatabaseFile {
    path: PathBuf,
}

impl DatabaseFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionSource for DatabaseFile {
    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Connection::open(&self.path)
            .map_err(Error::storage(format!("open database {}", self.path.display())))
    }
}

impl<F> ConnectionSource for F
where
    F: Fn() -> rusqlite::Result<Connection>,
{
    fn connect(&self) -> Result<Connection> {
        self().map_err(Error::storage("acquire connection"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let source = DatabaseFile::new(dir.path().join("nested").join("errors.db"));

        let conn = source.connect().unwrap();
        conn.execute("CREATE TABLE probe (x INTEGER)", []).unwrap();
        assert!(source.path().exists());
    }

    #[test]
    fn test_closure_source() {
        let source = || Connection::open_in_memory();
        let conn = source.connect().unwrap();
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0)).unwrap();
        assert_eq!(one, 1);
    }

    #[test]
    fn test_connect_failure_is_storage_error() {
        let source = || Connection::open("/nonexistent-dir/definitely/missing.db");
        assert!(matches!(source.connect(), Err(Error::Storage { .. })));
    }
}
