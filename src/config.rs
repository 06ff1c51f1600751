use crate::common::error::{ImportError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Company-name matching behavior during import.
///
/// `Normalized` falls back to the canonicalized-key lookup when an exact
/// display-name match fails; `Exact` matches display names only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingStrictness {
    Normalized,
    Exact,
}

/// Which event-type alias table to apply. The two historical frontends
/// disagree on what a bare "show" is, so the mapping is a policy choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeAliasProfile {
    /// "show" and "performance" both mean a play.
    Server,
    /// "show" is a generic performance; "Performance" is a valid type of its own.
    Client,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub admin_password: String,
    pub data_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3001".to_string(),
            admin_password: "Test123".to_string(),
            data_file: PathBuf::from("data.json"),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ImportPolicy {
    pub matching: MatchingStrictness,
    pub type_profile: TypeAliasProfile,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            matching: MatchingStrictness::Normalized,
            type_profile: TypeAliasProfile::Server,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub import: ImportPolicy,
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImportError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ImportError::Config(format!("Invalid config file: {e}")))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_when_no_config_file_exists() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:3001");
        assert_eq!(config.import.matching, MatchingStrictness::Normalized);
        assert_eq!(config.import.type_profile, TypeAliasProfile::Server);
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[import]\nmatching = \"exact\"\ntype_profile = \"client\"\n"
        )
        .unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.import.matching, MatchingStrictness::Exact);
        assert_eq!(config.import.type_profile, TypeAliasProfile::Client);
        assert_eq!(config.server.admin_password, "Test123");
    }
}
