//! Quiet mode for human-readable output.
//!
//! Decided once per process, from the `--quiet` flag or `ERRSTORE_QUIET`.

use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Fix quiet mode for the rest of the process. The first call wins.
pub fn init_quiet(flag: bool) -> bool {
    *QUIET.get_or_init(|| flag || quiet_from_env())
}

pub fn is_quiet() -> bool {
    *QUIET.get_or_init(quiet_from_env)
}

fn quiet_from_env() -> bool {
    std::env::var("ERRSTORE_QUIET")
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "On"] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["", "0", "false", "no", "quiet"] {
            assert!(!is_truthy(value), "{value}");
        }
    }
}
