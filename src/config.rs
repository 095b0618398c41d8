use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default env_logger filter, `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3002,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("config")
    }

    pub fn load_from(file_name: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(file_name).required(false))
            // RELATIONS_SERVER_PORT=8080
            .add_source(
                config::Environment::with_prefix("RELATIONS")
                    .separator("_")
                    .prefix_separator("_"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_from("does-not-exist").unwrap();

        assert_eq!(config.server.port, 3002);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.server_address(), "127.0.0.1:3002");
    }
}
