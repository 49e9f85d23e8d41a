//! Engine configuration file parsing.

use std::fs;
use std::path::Path;

use thiserror::Error;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 1 << 24;
pub const DEFAULT_REPL_PROMPT: &str = "JS>>> ";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: String, message: String },
    #[error("line {line}: expected `key = value`")]
    Malformed { line: usize },
    #[error("line {line}: unknown key `{key}`")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: invalid value `{value}` for `{key}`")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
}

/// Limits and REPL behaviour of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Nested calls allowed before a `RangeError`.
    pub max_call_depth: usize,
    /// Largest array a cell assignment may grow.
    pub max_array_length: usize,
    pub repl_prompt: String,
    /// Whether the REPL echoes statements that evaluate to `undefined`.
    pub echo_undefined: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            repl_prompt: DEFAULT_REPL_PROMPT.to_string(),
            echo_undefined: false,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parses `key = value` lines on top of the defaults.
    ///
    /// ```text
    /// # limits
    /// max_call_depth = 500
    /// repl_prompt = "> "
    /// echo_undefined = true
    /// ```
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = EngineConfig::default();

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.splitn(2, '=');
            let (key, value) = match (parts.next(), parts.next()) {
                (Some(k), Some(v)) if !k.trim().is_empty() => (k.trim(), v.trim()),
                _ => return Err(ConfigError::Malformed { line: line_no }),
            };
            let invalid = || ConfigError::InvalidValue {
                line: line_no,
                key: key.to_string(),
                value: value.to_string(),
            };

            match key {
                "max_call_depth" => {
                    config.max_call_depth = value.parse().map_err(|_| invalid())?;
                }
                "max_array_length" => {
                    config.max_array_length = value.parse().map_err(|_| invalid())?;
                }
                "repl_prompt" => {
                    config.repl_prompt = parse_quoted(value).ok_or_else(invalid)?;
                }
                "echo_undefined" => {
                    config.echo_undefined = match value {
                        "true" => true,
                        "false" => false,
                        _ => return Err(invalid()),
                    };
                }
                _ => {
                    return Err(ConfigError::UnknownKey {
                        line: line_no,
                        key: key.to_string(),
                    })
                }
            }
        }

        Ok(config)
    }
}

fn parse_quoted(value: &str) -> Option<String> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Some(value[1..value.len() - 1].to_string())
    } else {
        None
    }
}
