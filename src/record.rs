//! Error records - what a validator hands to the store
//!
//! An error is a category name, a free-form detail string and the list of
//! entities that triggered it:
//! - `ErrorRecord`: one validation failure
//! - `EntityReference`: pointer to the offending entity and its input line
//! - `InfoEntry`: optional key/value annotation

use serde::{Deserialize, Serialize};

/// One validation failure.
///
/// Records carry no id; the store assigns one when the record is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Error category, e.g. `MissingId` (the set is owned by the validators)
    pub kind: String,
    /// Offending value(s); empty when there is nothing to show
    #[serde(default)]
    pub detail: String,
    /// Entities this error points at, in the order they were reported
    #[serde(default)]
    pub references: Vec<EntityReference>,
    /// Extra annotations, written to the `error_info` table
    #[serde(default)]
    pub info: Vec<InfoEntry>,
}

impl ErrorRecord {
    /// Create a record with no references or annotations
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: detail.into(),
            references: Vec::new(),
            info: Vec::new(),
        }
    }

    /// Append an entity reference
    pub fn with_reference(mut self, reference: EntityReference) -> Self {
        self.references.push(reference);
        self
    }

    /// Append an info annotation
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.push(InfoEntry {
            key: key.into(),
            value: value.into(),
        });
        self
    }
}

/// A pointer from an error to the domain entity that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityReference {
    /// Category of the referenced entity, e.g. `Stop`
    pub entity_type: String,
    /// Physical input line, or `UNKNOWN_LINE`
    #[serde(default = "EntityReference::unknown_line")]
    pub line_number: i64,
    /// Natural identifier of the entity; empty if it has none
    #[serde(default)]
    pub entity_id: String,
    /// Position within a sequence (e.g. stop order). Stored as NULL when absent.
    #[serde(default)]
    pub sequence_number: Option<u32>,
}

impl EntityReference {
    /// Line number used when the entity's input line is unknown.
    pub const UNKNOWN_LINE: i64 = -1;

    pub fn new(entity_type: impl Into<String>, line_number: i64, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            line_number,
            entity_id: entity_id.into(),
            sequence_number: None,
        }
    }

    /// Set the sequence position
    pub fn with_sequence(mut self, sequence_number: u32) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    /// Whether the input line of this entity is known
    pub fn has_line(&self) -> bool {
        self.line_number >= 0
    }

    fn unknown_line() -> i64 {
        Self::UNKNOWN_LINE
    }
}

/// Key/value annotation attached to an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoEntry {
    pub key: String,
    pub value: String,
}
