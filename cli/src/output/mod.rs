//! Terminal and JSON output.
//!
//! Commands print summaries through [`OutputContext`]; services report
//! progress through [`TerminalReporter`]. Both go quiet under `--quiet` and
//! `--json`, except for errors.

pub mod json;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

const STEP: &str = "→";
const SUCCESS: &str = "✓";
const WARNING: &str = "!";
const ERROR: &str = "✗";

pub struct OutputContext {
    pub styles: Styles,
    pub quiet: bool,
}

impl OutputContext {
    /// Colours are used only on a TTY, and never with `no_color` or `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let colour =
            !no_color && std::env::var_os("NO_COLOR").is_none() && Term::stdout().is_term();
        Self {
            styles: if colour {
                Styles::coloured()
            } else {
                Styles::default()
            },
            quiet,
        }
    }

    fn marked(&self, marker: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", marker.style(style));
        }
    }

    pub fn step(&self, msg: &str) {
        self.marked(STEP, self.styles.step, msg);
    }

    pub fn success(&self, msg: &str) {
        self.marked(SUCCESS, self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.marked(WARNING, self.styles.warning, msg);
    }

    /// Goes to stderr and ignores `quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", ERROR.style(self.styles.error));
    }

    pub fn title(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.title));
        }
    }

    /// `  <key>  <value>`, key in the label style.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.label));
        }
    }
}
