//! Runtime configuration loading.
//!
//! Every setting has a default that reproduces the classic interactive
//! behaviour, so the configuration file is optional.  The expected YAML
//! structure is:
//! ```yaml
//! poll_interval_secs: 1   # worker re-check interval while the store is empty
//! prompt: "alarm> "       # "" disables the prompt
//! ```
//!
//! Command-line flags are applied on top with [`AlarmConfig::with_overrides`].

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// Default worker re-check interval while the store is empty.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Default interactive prompt written before each input line.
pub const DEFAULT_PROMPT: &str = "alarm> ";

// ── Private YAML deserialization types ────────────────────────────────────────

/// Fields as they appear in the YAML file.  All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AlarmConfigFile {
    poll_interval_secs: Option<u64>,
    prompt: Option<String>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Resolved configuration for one scheduler instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmConfig {
    /// How long the worker sleeps when it finds the store empty.
    pub poll_interval: Duration,

    /// Prompt printed before each read.  `None` disables it.
    pub prompt: Option<String>,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            prompt: Some(DEFAULT_PROMPT.to_string()),
        }
    }
}

impl AlarmConfig {
    /// Parses `path` and merges it over the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is invalid or
    /// contains unknown keys, or `poll_interval_secs` is zero.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading alarm configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        // An empty document deserialises to `()` rather than a map.
        let file: AlarmConfigFile = if content.trim().is_empty() {
            AlarmConfigFile::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?
        };

        let config = Self::default().with_overrides(file.poll_interval_secs, file.prompt)?;
        debug!(?config, "configuration resolved");
        Ok(config)
    }

    /// Apply optional overrides (file values or CLI flags) on top of `self`.
    ///
    /// An empty `prompt` string disables the prompt.
    pub fn with_overrides(
        mut self,
        poll_interval_secs: Option<u64>,
        prompt: Option<String>,
    ) -> Result<Self> {
        if let Some(secs) = poll_interval_secs {
            ensure!(secs > 0, "poll_interval_secs must be at least 1 (got {secs})");
            self.poll_interval = Duration::from_secs(secs);
        }
        if let Some(p) = prompt {
            self.prompt = if p.is_empty() { None } else { Some(p) };
        }
        Ok(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_match_interactive_behaviour() {
        let cfg = AlarmConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
        assert_eq!(cfg.prompt.as_deref(), Some("alarm> "));
    }

    #[test]
    fn load_full_yaml() {
        let f = yaml_tempfile("poll_interval_secs: 3\nprompt: \"> \"\n");
        let cfg = AlarmConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_secs(3));
        assert_eq!(cfg.prompt.as_deref(), Some("> "));
    }

    #[test]
    fn absent_fields_keep_defaults() {
        let f = yaml_tempfile("poll_interval_secs: 2\n");
        let cfg = AlarmConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_secs(2));
        assert_eq!(cfg.prompt.as_deref(), Some(DEFAULT_PROMPT));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let f = yaml_tempfile("");
        let cfg = AlarmConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg, AlarmConfig::default());
    }

    #[test]
    fn empty_prompt_disables_prompt() {
        let f = yaml_tempfile("prompt: \"\"\n");
        let cfg = AlarmConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg.prompt, None);
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let f = yaml_tempfile("poll_interval_secs: 0\n");
        assert!(AlarmConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let f = yaml_tempfile("poll_interval: 1\n");
        assert!(AlarmConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = AlarmConfig::load_from_file(Path::new("/nonexistent/path/alarmd.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn cli_overrides_win_over_file_values() {
        let f = yaml_tempfile("poll_interval_secs: 5\nprompt: \"file> \"\n");
        let cfg = AlarmConfig::load_from_file(f.path())
            .unwrap()
            .with_overrides(Some(2), Some(String::new()))
            .unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_secs(2));
        assert_eq!(cfg.prompt, None);
    }
}
