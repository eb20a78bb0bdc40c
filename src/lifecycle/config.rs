//! # Configuration
//!
//! Startup settings read from a TOML file:
//!
//! ```toml
//! backend = "headless"
//! title = "Movies"
//! timeout_secs = 10
//!
//! [connection]
//! scheme = "https"
//! host = "api.example.org"
//! port = 443
//!
//! [authentication]
//! kind = "bearer"
//! token = "${MOVIES_TOKEN}"
//! ```
//!
//! Every field is optional. `${VAR}` references in string values are replaced
//! with the environment variable (empty if unset), so tokens stay out of the file.

use crate::app::{Authentication, Connection};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "FUSION_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Name of the runtime to start.
    pub backend: String,
    /// Overrides the application title when set.
    pub title: Option<String>,
    /// Replaces the application's connection when set.
    pub connection: Option<Connection>,
    /// Replaces the application's authentication when set.
    pub authentication: Option<Authentication>,
    /// Per-request timeout of the shared HTTP client.
    pub timeout_secs: Option<u64>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            backend: "headless".to_string(),
            title: None,
            connection: None,
            authentication: None,
            timeout_secs: None,
        }
    }
}

impl FusionConfig {
    /// Parses `content` and expands `${VAR}` references.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let config: FusionConfig = toml::from_str(content)?;
        Ok(config.expanded())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    /// Loads the file named by `FUSION_CONFIG`, or the defaults if it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The shared HTTP client, honouring the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    fn expanded(mut self) -> Self {
        self.title = self.title.map(|title| expand_env_vars(&title));
        if let Some(connection) = &mut self.connection {
            connection.host = expand_env_vars(&connection.host);
        }
        if let Some(Authentication::Bearer { token }) = &mut self.authentication {
            *token = expand_env_vars(token);
        }
        self
    }
}

/// Replaces every `${VAR}` with the value of `VAR`, or nothing if it is unset.
///
/// An unclosed `${` and an empty `${}` are kept verbatim.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(0) => {
                out.push_str("${}");
                rest = &after[1..];
            }
            Some(end) => {
                out.push_str(&env::var(&after[..end]).unwrap_or_default());
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn parse_empty_config() {
        let config = FusionConfig::from_toml_str("").unwrap();
        assert_eq!(config, FusionConfig::default());
        assert_eq!(config.backend, "headless");
    }

    #[test]
    fn parse_full_config() {
        let config = FusionConfig::from_toml_str(
            r#"
            backend = "headless"
            title = "Movies"
            timeout_secs = 5

            [connection]
            scheme = "https"
            host = "api.example.org"
            port = 443

            [authentication]
            kind = "bearer"
            token = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.title.as_deref(), Some("Movies"));
        assert_eq!(config.connection.as_ref().unwrap().origin(), "https://api.example.org:443");
        assert_eq!(config.authentication, Some(Authentication::bearer("abc")));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn partial_connection_keeps_defaults() {
        let config = FusionConfig::from_toml_str("[connection]\nport = 9000").unwrap();
        assert_eq!(config.connection.unwrap().origin(), "http://localhost:9000");
    }

    #[test]
    fn bearer_token_is_expanded() {
        env::set_var("FUSION_TEST_TOKEN", "from-env");
        let config = FusionConfig::from_toml_str("[authentication]\nkind = \"bearer\"\ntoken = \"${FUSION_TEST_TOKEN}\"").unwrap();
        assert_eq!(config.authentication, Some(Authentication::bearer("from-env")));
    }

    #[test]
    fn expand_env_vars_edge_cases() {
        env::set_var("FUSION_TEST_A", "a");
        env::set_var("FUSION_TEST_B", "b");
        assert_eq!(expand_env_vars("no vars"), "no vars");
        assert_eq!(expand_env_vars("${FUSION_TEST_A}-${FUSION_TEST_B}"), "a-b");
        assert_eq!(expand_env_vars("x ${FUSION_TEST_MISSING} y"), "x  y");
        assert_eq!(expand_env_vars("test ${UNCLOSED"), "test ${UNCLOSED");
        assert_eq!(expand_env_vars("test ${} more"), "test ${} more");
    }

    #[test]
    fn load_reports_path_on_errors() {
        let missing = env::temp_dir().join("fusion-recipe-does-not-exist.toml");
        let err = FusionConfig::load(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.path(), missing.as_path());

        let broken = env::temp_dir().join(format!("fusion-recipe-broken-{}.toml", std::process::id()));
        std::fs::File::create(&broken)
            .unwrap()
            .write_all(b"backend = [")
            .unwrap();
        let err = FusionConfig::load(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        std::fs::remove_file(&broken).unwrap();
    }
}
