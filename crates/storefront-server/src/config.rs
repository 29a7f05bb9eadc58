//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("{0} is set without {1}")]
    Incomplete(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Bootstrap administrator account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Directory of the file-backed store; in-memory when unset.
    pub data_dir: Option<PathBuf>,
    pub token_ttl_hours: i64,
    /// Seed the demo catalog into an empty product collection.
    pub seed_demo: bool,
    pub admin: Option<AdminBootstrap>,
}

impl ServerConfig {
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_hours.saturating_mul(3600)
    }
}

/// Load `.env` and read the configuration from the process environment.
pub fn load_server_config() -> Result<ServerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_server_config(|key| std::env::var(key))
}

/// Parse the configuration from a variable lookup, so tests can feed a map.
pub fn build_server_config<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());
    let or_default = |var: &str, default: &str| optional(var).unwrap_or_else(|| default.to_string());
    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = Environment::parse(&or_default("STOREFRONT_ENV", "development"));

    let bind_addr = or_default("STOREFRONT_BIND_ADDR", "0.0.0.0:5000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("STOREFRONT_BIND_ADDR", e.to_string()))?;

    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");
    let data_dir = optional("STOREFRONT_DATA_DIR").map(PathBuf::from);

    let token_ttl_hours = or_default("STOREFRONT_TOKEN_TTL_HOURS", "168")
        .parse::<i64>()
        .map_err(|e| invalid("STOREFRONT_TOKEN_TTL_HOURS", e.to_string()))?;
    if token_ttl_hours <= 0 {
        return Err(invalid("STOREFRONT_TOKEN_TTL_HOURS", "must be positive".into()));
    }

    let seed_demo = match optional("STOREFRONT_SEED_DEMO") {
        None => env != Environment::Production,
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => return Err(invalid("STOREFRONT_SEED_DEMO", format!("not a boolean: {other}"))),
        },
    };

    let admin = match (optional("STOREFRONT_ADMIN_EMAIL"), optional("STOREFRONT_ADMIN_PASSWORD")) {
        (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ConfigError::Incomplete(
                "STOREFRONT_ADMIN_EMAIL".into(),
                "STOREFRONT_ADMIN_PASSWORD".into(),
            ))
        }
        (None, Some(_)) => {
            return Err(ConfigError::Incomplete(
                "STOREFRONT_ADMIN_PASSWORD".into(),
                "STOREFRONT_ADMIN_EMAIL".into(),
            ))
        }
    };

    Ok(ServerConfig {
        env,
        bind_addr,
        log_level,
        data_dir,
        token_ttl_hours,
        seed_demo,
        admin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn test_defaults() {
        let map = HashMap::new();
        let config = build_server_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.data_dir, None);
        assert_eq!(config.token_ttl_hours, 168);
        assert_eq!(config.token_ttl_secs(), 7 * 24 * 3600);
        assert!(config.seed_demo);
        assert_eq!(config.admin, None);
    }

    #[test]
    fn test_production_does_not_seed_by_default() {
        let map = HashMap::from([("STOREFRONT_ENV", "production")]);
        let config = build_server_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.env, Environment::Production);
        assert!(!config.seed_demo);

        let map = HashMap::from([("STOREFRONT_ENV", "production"), ("STOREFRONT_SEED_DEMO", "yes")]);
        assert!(build_server_config(lookup_from_map(&map)).unwrap().seed_demo);
    }

    #[test]
    fn test_overrides() {
        let map = HashMap::from([
            ("STOREFRONT_BIND_ADDR", "127.0.0.1:8080"),
            ("STOREFRONT_DATA_DIR", "/var/lib/storefront"),
            ("STOREFRONT_TOKEN_TTL_HOURS", "2"),
            ("STOREFRONT_ADMIN_EMAIL", "root@example.com"),
            ("STOREFRONT_ADMIN_PASSWORD", "Sup3rSecret"),
        ]);
        let config = build_server_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/storefront")));
        assert_eq!(config.token_ttl_secs(), 7200);
        assert_eq!(config.admin.unwrap().email, "root@example.com");
    }

    #[test]
    fn test_invalid_values() {
        let map = HashMap::from([("STOREFRONT_BIND_ADDR", "nowhere")]);
        assert!(matches!(
            build_server_config(lookup_from_map(&map)),
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREFRONT_BIND_ADDR"
        ));

        let map = HashMap::from([("STOREFRONT_TOKEN_TTL_HOURS", "0")]);
        assert!(build_server_config(lookup_from_map(&map)).is_err());

        let map = HashMap::from([("STOREFRONT_SEED_DEMO", "maybe")]);
        assert!(build_server_config(lookup_from_map(&map)).is_err());
    }

    #[test]
    fn test_admin_needs_both_halves() {
        let map = HashMap::from([("STOREFRONT_ADMIN_EMAIL", "root@example.com")]);
        assert_eq!(
            build_server_config(lookup_from_map(&map)),
            Err(ConfigError::Incomplete(
                "STOREFRONT_ADMIN_EMAIL".into(),
                "STOREFRONT_ADMIN_PASSWORD".into()
            ))
        );
    }
}
