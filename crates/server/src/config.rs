use assistant::gemini::DEFAULT_MODEL;
use std::{env, net::SocketAddr};
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub oidc_audience: Option<String>,
    pub bind_addr: SocketAddr,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub run_migrations: bool,
}

impl Config {
    /// Reads the configuration from the process environment, loading a
    /// `.env` file first when one exists
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let run_migrations = match get("RUN_MIGRATIONS") {
            None => true,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "RUN_MIGRATIONS",
                        value,
                    });
                }
            },
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            oidc_audience: get("OIDC_AUDIENCE"),
            bind_addr,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            run_migrations,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/timetable"),
            ("OIDC_ISSUER_URL", "https://auth.example.edu"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.oidc_audience, None);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_missing_and_invalid() {
        assert_eq!(
            Config::from_lookup(lookup(&[("OIDC_ISSUER_URL", "https://auth.example.edu")])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/timetable"),
            ("OIDC_ISSUER_URL", "https://auth.example.edu"),
            ("RUN_MIGRATIONS", "sometimes"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "RUN_MIGRATIONS has an invalid value: sometimes");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/timetable"),
            ("OIDC_ISSUER_URL", "https://auth.example.edu"),
            ("OIDC_AUDIENCE", "timetable-api"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("GEMINI_API_KEY", "secret"),
            ("RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.oidc_audience.as_deref(), Some("timetable-api"));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert!(!config.run_migrations);
    }
}
