//! Database schema definitions
//!
//! Every table name is prefixed with the namespace of the validation run.
//! The prefix is generated by the caller and is not sanitized here.

/// Names of the three error tables for one namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub errors: String,
    pub error_refs: String,
    pub error_info: String,
}

impl TableNames {
    pub fn new(prefix: &str) -> Self {
        Self {
            errors: format!("{prefix}errors"),
            error_refs: format!("{prefix}error_refs"),
            error_info: format!("{prefix}error_info"),
        }
    }

    /// SQL to create the errors table
    pub fn create_errors_table(&self) -> String {
        format!(
            "CREATE TABLE {} (error_id INTEGER PRIMARY KEY, type VARCHAR, problems VARCHAR)",
            self.errors
        )
    }

    /// SQL to create the error_refs table.
    /// `sequence_number` is nullable; `line_number` uses -1 for unknown.
    pub fn create_error_refs_table(&self) -> String {
        format!(
            "CREATE TABLE {} (error_id INTEGER, entity_type VARCHAR, line_number INTEGER, \
             entity_id VARCHAR, sequence_number INTEGER)",
            self.error_refs
        )
    }

    /// SQL to create the error_info table
    pub fn create_error_info_table(&self) -> String {
        format!(
            "CREATE TABLE {} (error_id INTEGER, key VARCHAR, value VARCHAR)",
            self.error_info
        )
    }

    /// All schema creation statements, errors table first
    pub fn all_schema_statements(&self) -> Vec<String> {
        vec![
            self.create_errors_table(),
            self.create_error_refs_table(),
            self.create_error_info_table(),
        ]
    }

    pub fn insert_error(&self) -> String {
        format!(
            "INSERT INTO {} (error_id, type, problems) VALUES (?1, ?2, ?3)",
            self.errors
        )
    }

    pub fn insert_ref(&self) -> String {
        format!(
            "INSERT INTO {} (error_id, entity_type, line_number, entity_id, sequence_number) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            self.error_refs
        )
    }

    pub fn insert_info(&self) -> String {
        format!(
            "INSERT INTO {} (error_id, key, value) VALUES (?1, ?2, ?3)",
            self.error_info
        )
    }

    /// Largest persisted error id; NULL when the table is empty
    pub fn select_max_error_id(&self) -> String {
        format!("SELECT MAX(error_id) FROM {}", self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_names() {
        let names = TableNames::new("feed_a.");
        assert_eq!(names.errors, "feed_a.errors");
        assert_eq!(names.error_refs, "feed_a.error_refs");
        assert_eq!(names.error_info, "feed_a.error_info");
    }

    #[test]
    fn test_empty_prefix() {
        let names = TableNames::new("");
        assert_eq!(names.errors, "errors");
        assert!(names.insert_error().starts_with("INSERT INTO errors "));
    }

    #[test]
    fn test_errors_table_created_first() {
        let stmts = TableNames::new("t_").all_schema_statements();
        assert_eq!(stmts.len(), 3);
        assert!(stmts[0].starts_with("CREATE TABLE t_errors "));
    }
}
