//! SQLite error store
//!
//! One `ErrorStore` owns one connection and one open transaction for the
//! whole validation session. Errors are staged in memory and sent to the
//! database each time the error count reaches a multiple of `batch_size`;
//! nothing is durable until `finish` commits.

use rusqlite::{Connection, params};
use crate::{Error, Result};
use crate::record::ErrorRecord;
use crate::sequence::ErrorSequence;
use super::schema::TableNames;
use super::source::ConnectionSource;

/// Error count interval at which staged rows are flushed
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Whether a store creates its namespace tables or reattaches to existing ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    /// Create the three tables; ids start at 0
    Create,
    /// Use tables from an earlier session; ids continue after the stored maximum
    Attach,
}

/// Tuning knobs for an `ErrorStore`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    batch_size: usize,
}

impl StoreOptions {
    pub fn with_batch_size(batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::Config("batch_size must be greater than zero".to_string()));
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { batch_size: DEFAULT_BATCH_SIZE }
    }
}

/// Append-only store for validation errors in one table namespace.
///
/// A store holds its connection exclusively and is not meant to be shared
/// between threads; writes take `&mut self`. Only one store may write to a
/// given namespace at a time, which callers must guarantee.
pub struct ErrorStore {
    conn: Connection,
    tables: TableNames,
    sequence: ErrorSequence,
    batch_size: usize,
    /// Errors staged since the last flush, with their assigned ids
    pending: Vec<(i64, ErrorRecord)>,
}

impl ErrorStore {
    /// Acquire a connection from `source` and set up the namespace
    pub fn open(source: &impl ConnectionSource, prefix: &str, mode: TableMode) -> Result<Self> {
        Self::open_with_options(source, prefix, mode, StoreOptions::default())
    }

    pub fn open_with_options(
        source: &impl ConnectionSource,
        prefix: &str,
        mode: TableMode,
        options: StoreOptions,
    ) -> Result<Self> {
        let conn = source.connect()?;
        Self::with_connection_options(conn, prefix, mode, options)
    }

    /// Set up the namespace on an existing connection.
    ///
    /// The connection must be in autocommit mode; the store opens its own
    /// session transaction.
    pub fn with_connection(conn: Connection, prefix: &str, mode: TableMode) -> Result<Self> {
        Self::with_connection_options(conn, prefix, mode, StoreOptions::default())
    }

    pub fn with_connection_options(
        conn: Connection,
        prefix: &str,
        mode: TableMode,
        options: StoreOptions,
    ) -> Result<Self> {
        let tables = TableNames::new(prefix);
        let sequence = match mode {
            TableMode::Create => {
                create_tables(&conn, &tables)?;
                ErrorSequence::fresh()
            }
            TableMode::Attach => reconnect_tables(&conn, &tables)?,
        };

        let store = Self {
            conn,
            tables,
            sequence,
            batch_size: options.batch_size(),
            pending: Vec::new(),
        };
        store.prepare_statements()?;
        store.begin_transaction()?;
        Ok(store)
    }

    /// Assign the next id to `record` and stage it for insertion.
    ///
    /// The id is taken before any I/O, so `error_count` advances even when
    /// the flush this call triggers fails. Staged rows are sent whenever the
    /// running error count reaches a multiple of the batch size.
    pub fn store_error(&mut self, record: ErrorRecord) -> Result<i64> {
        let id = self.sequence.allocate();
        self.pending.push((id, record));
        if self.sequence.peek() % self.batch_size as i64 == 0 {
            self.flush()?;
        }
        Ok(id)
    }

    /// The next id to be assigned, i.e. how many ids the namespace has used
    pub fn error_count(&self) -> i64 {
        self.sequence.peek()
    }

    /// Errors staged but not yet sent to the database
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// The underlying connection. Rows flushed so far are visible through it
    /// even before `finish` commits.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Flush whatever is still staged and commit the session.
    ///
    /// Hands the connection back; releasing it is up to the caller.
    pub fn finish(mut self) -> Result<Connection> {
        self.flush()?;
        self.conn
            .execute("COMMIT", [])
            .map_err(Error::storage("commit error tables"))?;
        tracing::info!(
            "Committed errors to {}, next error id is {}",
            self.tables.errors,
            self.sequence.peek()
        );
        Ok(self.conn)
    }

    // ========== Internals ==========

    /// Prepare the insert statements up front so a bad prefix or missing
    /// table fails at construction, not at the first flush.
    fn prepare_statements(&self) -> Result<()> {
        for sql in [
            self.tables.insert_error(),
            self.tables.insert_ref(),
            self.tables.insert_info(),
        ] {
            self.conn
                .prepare_cached(&sql)
                .map_err(Error::storage(format!("prepare `{}`", sql)))?;
        }
        Ok(())
    }

    fn begin_transaction(&self) -> Result<()> {
        self.conn
            .execute("BEGIN TRANSACTION", [])
            .map_err(Error::storage("begin session transaction"))?;
        Ok(())
    }

    /// Send staged rows to the database without committing.
    ///
    /// Error rows go first, then references, then info, so no child row is
    /// ever written ahead of its parent.
    fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.pending);

        let mut insert_error = self
            .conn
            .prepare_cached(&self.tables.insert_error())
            .map_err(Error::storage("prepare error insert"))?;
        for (id, record) in &batch {
            insert_error
                .execute(params![id, record.kind, record.detail])
                .map_err(|source| insert_failed(&self.tables.errors, source))?;
        }

        let mut ref_rows = 0;
        let mut insert_ref = self
            .conn
            .prepare_cached(&self.tables.insert_ref())
            .map_err(Error::storage("prepare reference insert"))?;
        for (id, record) in &batch {
            for reference in &record.references {
                insert_ref
                    .execute(params![
                        id,
                        reference.entity_type,
                        reference.line_number,
                        reference.entity_id,
                        reference.sequence_number,
                    ])
                    .map_err(|source| insert_failed(&self.tables.error_refs, source))?;
                ref_rows += 1;
            }
        }

        let mut info_rows = 0;
        let mut insert_info = self
            .conn
            .prepare_cached(&self.tables.insert_info())
            .map_err(Error::storage("prepare info insert"))?;
        for (id, record) in &batch {
            for entry in &record.info {
                insert_info
                    .execute(params![id, entry.key, entry.value])
                    .map_err(|source| insert_failed(&self.tables.error_info, source))?;
                info_rows += 1;
            }
        }

        tracing::debug!(
            "Flushed {} errors, {} references, {} info rows to {}",
            batch.len(),
            ref_rows,
            info_rows,
            self.tables.errors
        );
        Ok(())
    }
}

fn insert_failed(table: &str, source: rusqlite::Error) -> Error {
    Error::Storage {
        context: format!("insert into {}", table),
        source,
    }
}

fn create_tables(conn: &Connection, tables: &TableNames) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", [])
        .map_err(Error::storage("begin schema transaction"))?;
    for stmt in tables.all_schema_statements() {
        conn.execute(&stmt, [])
            .map_err(Error::storage(format!("create error tables for {}", tables.errors)))?;
    }
    // Commit now so the tables are visible to the rest of the session.
    conn.execute("COMMIT", [])
        .map_err(Error::storage("commit error tables schema"))?;
    tracing::info!("Created error tables {}, {}, {}", tables.errors, tables.error_refs, tables.error_info);
    Ok(())
}

fn reconnect_tables(conn: &Connection, tables: &TableNames) -> Result<ErrorSequence> {
    let max: Option<i64> = conn
        .query_row(&tables.select_max_error_id(), [], |row| row.get(0))
        .map_err(Error::storage(format!("could not connect to errors table {}", tables.errors)))?;
    match max {
        Some(max) => tracing::info!("Reconnected to {}, max error id is {}", tables.errors, max),
        None => tracing::info!("Reconnected to {}, table is empty", tables.errors),
    }
    ErrorSequence::resume_after(max).ok_or_else(|| Error::Storage {
        context: format!("error ids exhausted in {}", tables.errors),
        source: rusqlite::Error::IntegralValueOutOfRange(0, i64::MAX),
    })
}
