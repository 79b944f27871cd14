//! TOML config loading shared by the game crates.

use std::fmt;

use serde::de::DeserializeOwned;

/// Failure to read or parse a config file.
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config read error: {e}"),
            Self::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML document. With `#[serde(default)]` structs, missing keys
/// take their defaults.
pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Read and parse a TOML file.
pub fn read_toml<T: DeserializeOwned>(path: &str) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    parse_toml(&content)
}

/// Load config from the file named by `env_var`, else `default_path`.
/// Falls back to defaults if the file is missing or unparseable.
pub fn load_or_default<T: DeserializeOwned + Default>(env_var: &str, default_path: &str) -> T {
    let path = std::env::var(env_var).unwrap_or_else(|_| default_path.to_string());
    match read_toml(&path) {
        Ok(cfg) => cfg,
        Err(ConfigError::Parse(e)) => {
            tracing::warn!("Failed to parse {path}: {e}, using defaults");
            T::default()
        },
        Err(ConfigError::Io(_)) => T::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        rate: f32,
        name: String,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                rate: 2.0,
                name: "sample".to_string(),
            }
        }
    }

    #[test]
    fn parse_fills_missing_keys() {
        let s: Sample = parse_toml("rate = 4.5").unwrap();
        assert_eq!(s.rate, 4.5);
        assert_eq!(s.name, "sample");
    }

    #[test]
    fn parse_error_kind() {
        let err = parse_toml::<Sample>("rate = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("config parse error"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let s: Sample = load_or_default(
            "ARDJUMP_TEST_CONFIG_THAT_IS_NEVER_SET",
            "/nonexistent/ardjump/sample.toml",
        );
        assert_eq!(s, Sample::default());
        assert!(matches!(
            read_toml::<Sample>("/nonexistent/ardjump/sample.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
