//! Load — catalog config loading from file or the built-in default.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::model::ScanConfig;

/// The catalog shipped with the binary: Android logcat crash signatures.
pub const BUILTIN_CATALOG: &str = include_str!("builtin.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ScanConfig {
    /// Load and validate the catalog config.
    ///
    /// With no path, the built-in Android catalog is used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading signature catalog");
                Self::from_file(path)?
            }
            None => {
                tracing::debug!("using built-in signature catalog");
                Self::builtin()?
            }
        };

        config.validate().map_err(ConfigError::Invalid)?;

        for sig in &config.signature {
            if let Some(key) = &sig.key {
                if key != &sig.begin {
                    tracing::debug!(
                        signature = %sig.name,
                        "key tag differs from begin tag; begin is authoritative"
                    );
                }
            }
        }

        Ok(config)
    }

    /// Parse the embedded default catalog.
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(toml::from_str(BUILTIN_CATALOG)?)
    }

    /// Parse a catalog config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_parses_and_validates() {
        let config = ScanConfig::builtin().unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.logline.is_empty());
        let names: Vec<&str> = config.signature.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"java_crash"));
        assert!(names.contains(&"native_crash"));
        assert!(names.contains(&"anr"));
    }

    #[test]
    fn test_load_default_is_builtin() {
        let config = ScanConfig::load(None).unwrap();
        assert_eq!(config.signature.len(), ScanConfig::builtin().unwrap().signature.len());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ScanConfig::load(Some(Path::new("/no/such/catalog.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[[signature]\nname = ").unwrap();
        let err = ScanConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_structurally_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // Parses fine but has no signatures.
        file.write_all(b"[[logline]]\nformat = \"x\"\nprefix = \"^x\"\ntimestamp = \"^x\"\n")
            .unwrap();
        let err = ScanConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
