//! Configuration loading and parsing.
//!
//! Reads `turing-console.toml` (or an override path from the binary). A
//! missing file yields defaults. A file that does not parse is logged and
//! also yields defaults. Unknown fields are ignored.
//!
//! ```toml
//! backend = "auto"        # auto | direct | buffered
//!
//! [theme]
//! tape_cursor = "cyan_bg"
//! comment = "light_black_fg"
//!
//! [logging]
//! filter = "debug"
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

use turing_console_term::BackendKind;
use turing_console_types::{ColorAttribute, Theme};

pub const FILE_NAME: &str = "turing-console.toml";

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    #[default]
    Auto,
    Direct,
    Buffered,
}

impl BackendChoice {
    /// Concrete backend, running the probe for `Auto`.
    pub fn resolve(self) -> BackendKind {
        match self {
            BackendChoice::Auto => BackendKind::probe(),
            BackendChoice::Direct => BackendKind::Direct,
            BackendChoice::Buffered => BackendKind::Buffered,
        }
    }
}

/// Attribute names per visual role; unset roles keep the default theme.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ThemeConfig {
    pub tape_cursor: Option<String>,
    pub current_line: Option<String>,
    pub comment: Option<String>,
    pub scroller_enabled: Option<String>,
    pub scroller_disabled: Option<String>,
    pub scroller_glyph: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_filter")]
    pub filter: String,
    #[serde(default = "LoggingConfig::default_file")]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
            file: Self::default_file(),
        }
    }
}

impl LoggingConfig {
    fn default_filter() -> String {
        "info".to_string()
    }
    fn default_file() -> String {
        "turing-console.log".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub backend: BackendChoice,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub path: Option<PathBuf>,
    pub file: ConfigFile,
}

/// Config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("turing-console").join(FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Theme with every valid override applied.
    pub fn theme(&self) -> Theme {
        let t = &self.file.theme;
        let mut theme = Theme::default();
        apply_override(&mut theme.tape_cursor, "tape_cursor", t.tape_cursor.as_deref());
        apply_override(&mut theme.current_line, "current_line", t.current_line.as_deref());
        apply_override(&mut theme.comment, "comment", t.comment.as_deref());
        apply_override(
            &mut theme.scroller_enabled,
            "scroller_enabled",
            t.scroller_enabled.as_deref(),
        );
        apply_override(
            &mut theme.scroller_disabled,
            "scroller_disabled",
            t.scroller_disabled.as_deref(),
        );
        apply_override(
            &mut theme.scroller_glyph,
            "scroller_glyph",
            t.scroller_glyph.as_deref(),
        );
        theme
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.file.backend.resolve()
    }
}

fn apply_override(slot: &mut ColorAttribute, role: &'static str, name: Option<&str>) {
    let Some(name) = name else {
        return;
    };
    match ColorAttribute::from_str(name) {
        Some(attr) => *slot = attr,
        None => warn!(target: "config", role, name, "unknown_color_attribute"),
    }
}
