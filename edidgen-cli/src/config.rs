//! CLI configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the generator CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Artifact output settings.
    pub output: OutputConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Artifact output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the `.bin` artifact is written into when no explicit
    /// output path is given.
    pub dir: String,
    /// Overwrite an existing artifact of the same name.
    pub overwrite: bool,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: String,
    /// Optional log file; empty logs to stderr.
    pub file: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".into(),
            overwrite: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: String::new(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl CliConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Write default config to a file.
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        let cfg = Self::default();
        let text = toml::to_string_pretty(&cfg).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = CliConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("dir"));
        assert!(text.contains("level"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = CliConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.output.dir, ".");
        assert!(parsed.output.overwrite);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: CliConfig = toml::from_str("[output]\ndir = \"/tmp/edid\"\n").unwrap();
        assert_eq!(parsed.output.dir, "/tmp/edid");
        assert!(parsed.output.overwrite);
        assert_eq!(parsed.logging.level, "info");
    }
}
