//! Colour palette for terminal output.

use owo_colors::Style;

/// One style per kind of line the CLI prints. Plain by default.
#[derive(Default, Clone, Copy)]
pub struct Styles {
    pub step: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    /// Keys of key/value lines.
    pub label: Style,
    pub title: Style,
}

impl Styles {
    /// The coloured palette used on a TTY.
    #[must_use]
    pub fn coloured() -> Self {
        Self {
            step: Style::new().cyan(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            label: Style::new().dimmed(),
            title: Style::new().bold().cyan(),
        }
    }
}
