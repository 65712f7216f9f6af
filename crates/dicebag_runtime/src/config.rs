//! Session configuration.

use std::path::PathBuf;

/// Default directory for saved files, relative to the working directory.
pub const DEFAULT_STORE_DIR: &str = "UserPresets";

/// Default extension for saved files.
pub const DEFAULT_EXTENSION: &str = "msgpack";

/// Settings for a [`Session`](crate::Session) and its REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding saved files.
    pub store_dir: PathBuf,
    /// Extension of saved files, without the dot.
    pub extension: String,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Save the loaded file on `exit` (unless `exit nosave`).
    pub autosave: bool,
    /// Print the banner when the REPL starts.
    pub show_banner: bool,
    /// Use ANSI colors in output.
    pub color: bool,
    /// File to load (or start) before the first prompt.
    pub initial_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            seed: None,
            autosave: true,
            show_banner: true,
            color: true,
            initial_file: None,
        }
    }
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store directory.
    #[must_use]
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// Sets the saved file extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Fixes the RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables saving on exit.
    #[must_use]
    pub const fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Enables or disables the startup banner.
    #[must_use]
    pub const fn with_banner(mut self, show: bool) -> Self {
        self.show_banner = show;
        self
    }

    /// Enables or disables colored output.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Sets the file to open at startup.
    #[must_use]
    pub fn with_initial_file(mut self, name: Option<String>) -> Self {
        self.initial_file = name;
        self
    }
}
