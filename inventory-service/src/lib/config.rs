use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent means the service runs on in-memory stores.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_duration_hours")]
    pub duration_hours: i64,
    #[serde(default = "default_stale_grace_hours")]
    pub stale_grace_hours: i64,
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_hours: default_duration_hours(),
            stale_grace_hours: default_stale_grace_hours(),
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvisioningConfig {
    /// Management node the provisioning commands talk to.
    #[serde(default)]
    pub xcat_server: Option<String>,
    #[serde(default = "default_copycds_command")]
    pub copycds_command: String,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            xcat_server: None,
            copycds_command: default_copycds_command(),
        }
    }
}

/// Account seeded into the credential store at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub username: String,
    pub password: String,
}

/// Upper bound for the session lifetime and the stale grace window.
pub const MAX_SESSION_HOURS: i64 = 24 * 366;

fn default_max_connections() -> u32 {
    5
}

fn default_duration_hours() -> i64 {
    24
}

fn default_stale_grace_hours() -> i64 {
    24
}

fn default_purge_interval_secs() -> u64 {
    300
}

fn default_copycds_command() -> String {
    "copycds".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SERVER__HTTP_PORT, PROVISIONING__XCAT_SERVER, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Sanity checks that cannot be expressed with serde alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let session = &self.session;

        if !(1..=MAX_SESSION_HOURS).contains(&session.duration_hours) {
            return Err(ConfigError::Message(format!(
                "session.duration_hours must be between 1 and {}, got {}",
                MAX_SESSION_HOURS, session.duration_hours
            )));
        }
        if !(0..=MAX_SESSION_HOURS).contains(&session.stale_grace_hours) {
            return Err(ConfigError::Message(format!(
                "session.stale_grace_hours must be between 0 and {}, got {}",
                MAX_SESSION_HOURS, session.stale_grace_hours
            )));
        }
        if session.purge_interval_secs == 0 {
            return Err(ConfigError::Message(
                "session.purge_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.database.as_ref().is_some_and(|db| db.max_connections == 0) {
            return Err(ConfigError::Message(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
