use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Which store implementation backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    /// Volatile store, seeded with the given usernames.
    Memory { seed_users: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr: SocketAddr = parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?;

        let backend = lookup("NOTES_STORE").unwrap_or_else(|| "postgres".to_string());
        let store = match backend.to_ascii_lowercase().as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    Some(DEFAULT_MAX_CONNECTIONS),
                )?,
            },
            "memory" => StoreBackend::Memory {
                seed_users: lookup("NOTES_SEED_USERS")
                    .map(|v| {
                        v.split(',')
                            .map(str::trim)
                            .filter(|name| !name.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            _ => {
                return Err(ConfigError::Invalid {
                    key: "NOTES_STORE",
                    value: backend,
                });
            }
        };

        Ok(Self { bind_addr, store })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => default.ok_or(ConfigError::Missing(key)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn postgres_is_default_and_needs_database_url() {
        assert!(matches!(
            config(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));

        let cfg = config(&[("DATABASE_URL", "postgres://localhost/notes")]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(
            cfg.store,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/notes".to_string(),
                max_connections: 10,
            }
        );
    }

    #[test]
    fn memory_store_needs_nothing_else() {
        let cfg = config(&[("NOTES_STORE", "memory"), ("BIND_ADDR", "127.0.0.1:8080")]).unwrap();
        assert_eq!(cfg.store, StoreBackend::Memory { seed_users: vec![] });
        assert_eq!(cfg.bind_addr.port(), 8080);
    }

    #[test]
    fn memory_store_seed_users_are_trimmed() {
        let cfg = config(&[("NOTES_STORE", "memory"), ("NOTES_SEED_USERS", " alice, ,bob ")]).unwrap();
        assert_eq!(
            cfg.store,
            StoreBackend::Memory {
                seed_users: vec!["alice".to_string(), "bob".to_string()]
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("NOTES_STORE", "mongo")]),
            Err(ConfigError::Invalid { key: "NOTES_STORE", .. })
        ));
        assert!(matches!(
            config(&[("NOTES_STORE", "memory"), ("BIND_ADDR", "nowhere")]),
            Err(ConfigError::Invalid { key: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            config(&[("DATABASE_URL", "postgres://x"), ("DATABASE_MAX_CONNECTIONS", "-1")]),
            Err(ConfigError::Invalid { key: "DATABASE_MAX_CONNECTIONS", .. })
        ));
    }
}
