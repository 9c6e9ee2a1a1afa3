use owo_colors::Style;
use std::sync::OnceLock;

static STDOUT_THEME: OnceLock<Theme> = OnceLock::new();
static STDERR_THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for each kind of CLI message
#[derive(Debug, Clone)]
pub struct Theme {
    pub heading: Style,
    pub ok: Style,
    pub failure: Style,
    pub caution: Style,
    pub accent: Style,
    pub label: Style,
}

impl Theme {
    /// Colored when the stream supports it and `NO_COLOR` is not set
    pub fn detect(colors_enabled: bool) -> Self {
        if colors_enabled && !no_color_requested() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            heading: Style::new().cyan().bold(),
            ok: Style::new().green().bold(),
            failure: Style::new().red().bold(),
            caution: Style::new().yellow().bold(),
            accent: Style::new().magenta(),
            label: Style::new().white().dimmed(),
        }
    }

    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            ok: Style::new(),
            failure: Style::new(),
            caution: Style::new(),
            accent: Style::new(),
            label: Style::new(),
        }
    }
}

fn no_color_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

/// Theme for messages printed to stdout
pub fn theme() -> &'static Theme {
    STDOUT_THEME.get_or_init(|| Theme::detect(console::colors_enabled()))
}

/// Theme for errors and warnings, which go to stderr
pub fn stderr_theme() -> &'static Theme {
    STDERR_THEME.get_or_init(|| Theme::detect(console::colors_enabled_stderr()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_adds_no_escapes() {
        let theme = Theme::detect(false);
        assert_eq!("ready".style(theme.ok).to_string(), "ready");
    }

    #[test]
    fn test_colored_adds_escapes() {
        let theme = Theme::colored();
        assert!("failed".style(theme.failure).to_string().contains("\x1b["));
    }
}
