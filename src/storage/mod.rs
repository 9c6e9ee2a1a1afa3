//! Storage Layer - SQLite-backed persistence
//!
//! Each namespace (table prefix) owns three tables:
//! - <prefix>errors(error_id, type, problems)
//! - <prefix>error_refs(error_id, entity_type, line_number, entity_id, sequence_number)
//! - <prefix>error_info(error_id, key, value)

pub mod schema;
pub mod source;
pub mod error_store;

pub use error_store::{ErrorStore, StoreOptions, TableMode, DEFAULT_BATCH_SIZE};
pub use schema::TableNames;
pub use source::{ConnectionSource, DatabaseFile};
