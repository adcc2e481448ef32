use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub redis: RedisConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    // Empty means any origin is allowed
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Accounts created at startup when missing.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    pub admin_login: String,
    pub admin_password: String,
    pub intern_login: String,
    pub intern_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_login: "admin".into(),
            admin_password: "admin123".into(),
            intern_login: "intern1".into(),
            intern_password: "intern123".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Settings for running without external services, used by tests.
    pub fn in_memory() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
            },
            redis: RedisConfig {
                url: String::new(),
            },
            cors: CorsConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}
