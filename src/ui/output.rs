//! Human-readable CLI output. Everything but errors and warnings is
//! suppressed in quiet mode.

use crate::output::is_quiet;
use crate::ui::{stderr_theme, theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::ROCKET, text.style(theme().heading));
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(theme().ok));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(stderr_theme().failure));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(stderr_theme().caution));
}

pub fn info(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().accent),
        label.style(theme().label),
        value
    );
}

pub fn summary_row(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("  {} {}", label.style(theme().label), value);
}
