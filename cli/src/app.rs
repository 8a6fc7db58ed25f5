//! Application context: unified state passed to every command handler.
//!
//! Holds the output context, the rendering mode and the loaded settings.
//! Cloud adapters are built per command because the OCI config file and
//! profile are command arguments.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::ProxyboxConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::oci::OciCli;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Settings from `~/.proxybox/config.yaml`.
    pub settings: ProxyboxConfig,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// JSON mode implies quiet so that stdout carries only the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but is unreadable or invalid.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        Self::with_store(flags, &YamlConfigStore)
    }

    /// Like [`AppContext::new`] with an explicit settings source.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to load.
    pub fn with_store(flags: &AppFlags, store: &impl ConfigStore) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            settings: store.load()?,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Progress reporter writing to this context's terminal.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// An `oci` adapter authenticated with `profile` from `config_file`.
    #[must_use]
    pub fn cloud(&self, config_file: &Path, profile: &str) -> OciCli<TokioCommandRunner> {
        let runner =
            TokioCommandRunner::new(Duration::from_secs(self.settings.oci.command_timeout_secs));
        OciCli::new(
            runner,
            self.settings.oci.binary.clone(),
            config_file.display().to_string(),
            profile,
        )
    }
}
