use crate::size::parse_size;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Settings shared by both tools, optionally loaded from a TOML file.
///
/// ```toml
/// buffer_size = "4M"
/// chunk_size = 104857600
/// log_level = "info"
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SpoolConfig {
    #[serde(default = "defaults::buffer_size", deserialize_with = "byte_size")]
    pub buffer_size: usize,
    #[serde(default = "defaults::chunk_size", deserialize_with = "byte_size")]
    pub chunk_size: usize,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("badly formed size for {option}: {value}")]
    BadSize {
        option: String,
        value: String,
        #[source]
        source: crate::size::SizeError,
    },

    #[error("unrecognized option '{0}'")]
    UnknownOption(String),

    #[error("option '{0}' requires an argument")]
    MissingValue(String),

    #[error("option '{0}' doesn't allow an argument")]
    UnexpectedValue(String),

    #[error("no output file given")]
    MissingPath,
}

mod defaults {
    pub fn buffer_size() -> usize {
        1024 * 1024
    }

    pub fn chunk_size() -> usize {
        1024 * 1024
    }

    pub fn log_level() -> String {
        "warn".into()
    }
}

impl Default for SpoolConfig {
    fn default() -> Self {
        Self {
            buffer_size: defaults::buffer_size(),
            chunk_size: defaults::chunk_size(),
            log_level: defaults::log_level(),
        }
    }
}

/// Accepts either an integer byte count or a size string such as `"64k"`.
fn byte_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bytes(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bytes(0) => Err(D::Error::custom("size must be non-zero")),
        Raw::Bytes(n) => usize::try_from(n).map_err(D::Error::custom),
        Raw::Text(text) => parse_size(&text).map_err(D::Error::custom),
    }
}

impl SpoolConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&toml_to_str)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let spool_config: SpoolConfig = toml::from_str(text)?;
        Ok(spool_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(SpoolConfig::from_toml("").unwrap(), SpoolConfig::default());
    }

    #[test]
    fn sizes_accept_numbers_and_strings() {
        let cfg = SpoolConfig::from_toml("buffer_size = \"64k\"\nchunk_size = 100\n").unwrap();
        assert_eq!(cfg.buffer_size, 64 * 1024);
        assert_eq!(cfg.chunk_size, 100);
        assert_eq!(cfg.log_level, "warn");
    }

    #[test]
    fn bad_values_are_parse_errors() {
        for text in ["buffer_size = 0", "chunk_size = \"lots\"", "colour = true"] {
            assert!(matches!(
                SpoolConfig::from_toml(text),
                Err(ConfigError::Parse(_))
            ));
        }
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = SpoolConfig::load("/nonexistent/spool.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
