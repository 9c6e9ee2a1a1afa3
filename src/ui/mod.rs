pub mod icons;
pub mod output;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, success, summary_row, warn};
pub use theme::{stderr_theme, theme, Theme};
