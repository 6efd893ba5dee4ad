//! Configuration loading from a Java-style properties file.
//!
//! The loader never fails: a missing or unreadable file, or a missing
//! key, falls back to the documented defaults so the demo can run
//! against a stock local PostgreSQL.

use crate::error::{HarnessError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Default database URL (JDBC-style, as in the original properties file).
pub const DEFAULT_URL: &str = "jdbc:postgresql://localhost:5432/order_management";

/// Default username.
pub const DEFAULT_USERNAME: &str = "postgres";

/// Default password.
pub const DEFAULT_PASSWORD: &str = "password";

/// Database connection settings, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// JDBC-style URL pointing at a PostgreSQL-compatible server.
    pub url: String,

    /// Username.
    pub username: String,

    /// Password.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl DbConfig {
    /// Load configuration from a properties file.
    ///
    /// Recognized keys: `db.url`, `db.username`, `db.password`.
    /// Any read error is logged and treated as "file absent".
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::from_properties(&content),
            Err(e) => {
                warn!(
                    "Could not read {:?}, using default settings: {}",
                    path.as_ref(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Parse configuration from properties text.
    pub fn from_properties(text: &str) -> Self {
        let props = parse_properties(text);
        let defaults = Self::default();

        Self {
            url: props
                .get("db.url")
                .cloned()
                .unwrap_or(defaults.url),
            username: props
                .get("db.username")
                .cloned()
                .unwrap_or(defaults.username),
            password: props
                .get("db.password")
                .cloned()
                .unwrap_or(defaults.password),
        }
    }

    /// Build a `tokio_postgres::Config` from the JDBC-style URL.
    ///
    /// Accepts `jdbc:postgresql://host[:port]/dbname` with the `jdbc:`
    /// prefix optional. Host defaults to `localhost`, port to 5432.
    pub fn pg_config(&self) -> Result<tokio_postgres::Config> {
        let (host, port, dbname) = parse_jdbc_url(&self.url)?;

        let mut config = tokio_postgres::Config::new();
        config
            .host(&host)
            .port(port)
            .dbname(&dbname)
            .user(&self.username)
            .password(&self.password);
        Ok(config)
    }
}

/// Parse `key=value` lines; `#` and `!` start comments, blanks are skipped.
fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            props.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    props
}

/// Split a JDBC-style PostgreSQL URL into (host, port, dbname).
fn parse_jdbc_url(url: &str) -> Result<(String, u16, String)> {
    let rest = url.strip_prefix("jdbc:").unwrap_or(url);
    let rest = rest
        .strip_prefix("postgresql://")
        .or_else(|| rest.strip_prefix("postgres://"))
        .ok_or_else(|| {
            HarnessError::Config(format!("unsupported database URL: {}", url))
        })?;

    let (authority, dbname) = rest
        .split_once('/')
        .ok_or_else(|| HarnessError::Config(format!("database name missing in URL: {}", url)))?;
    // Parameters after '?' are not supported by this demo; drop them.
    let dbname = dbname.split('?').next().unwrap_or(dbname);

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|_| {
                HarnessError::Config(format!("invalid port in URL: {}", url))
            })?;
            (host, port)
        }
        None => (authority, 5432),
    };

    let host = if host.is_empty() { "localhost" } else { host };
    if dbname.is_empty() {
        return Err(HarnessError::Config(format!(
            "database name missing in URL: {}",
            url
        )));
    }

    Ok((host.to_string(), port, dbname.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = DbConfig::from_properties("db.url=jdbc:postgresql://db:5433/shop\n");
        assert_eq!(config.url, "jdbc:postgresql://db:5433/shop");
        assert_eq!(config.username, DEFAULT_USERNAME);
        assert_eq!(config.password, DEFAULT_PASSWORD);
    }

    #[test]
    fn comments_and_blanks_are_ignored() {
        let text = "\n# comment\n! another\ndb.username = admin\n\ndb.password=secret\n";
        let config = DbConfig::from_properties(text);
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "secret");
        assert_eq!(config.url, DEFAULT_URL);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = DbConfig::load("/nonexistent/application.properties");
        assert_eq!(config, DbConfig::default());
    }

    #[test]
    fn jdbc_url_parses_host_port_dbname() {
        let (host, port, dbname) =
            parse_jdbc_url("jdbc:postgresql://localhost:5432/order_management").unwrap();
        assert_eq!(host, "localhost");
        assert_eq!(port, 5432);
        assert_eq!(dbname, "order_management");
    }

    #[test]
    fn jdbc_prefix_is_optional_and_port_defaults() {
        let (host, port, dbname) = parse_jdbc_url("postgresql://db.internal/orders").unwrap();
        assert_eq!(host, "db.internal");
        assert_eq!(port, 5432);
        assert_eq!(dbname, "orders");
    }

    #[test]
    fn malformed_url_is_a_config_error() {
        assert!(parse_jdbc_url("mysql://localhost/orders").is_err());
        assert!(parse_jdbc_url("jdbc:postgresql://localhost:what/orders").is_err());
        assert!(parse_jdbc_url("jdbc:postgresql://localhost:5432/").is_err());
    }
}
