use std::env;
use std::fmt;

use auth::AuthError;
use auth::SigningSecret;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(skip)]
    pub run_mode: RunMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// No URL means the service runs on in-memory stores.
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 10 * 525_600;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub expiration_minutes: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

/// Deployment mode selected by the `RUN_MODE` environment variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

impl RunMode {
    /// `development` and `test` are lenient; any other value is treated as
    /// production.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "development" | "test" => RunMode::Development,
            _ => RunMode::Production,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Development => f.write_str("development"),
            RunMode::Production => f.write_str("production"),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode_name = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 8080)?
            .set_default("jwt.expiration_minutes", auth::DEFAULT_TOKEN_TTL_MINUTES)?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode_name)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let mut config: Config = configuration.try_deserialize()?;
        config.run_mode = RunMode::parse(&run_mode_name);
        config.validate()?;

        Ok(config)
    }

    /// # Errors
    /// * `Message` - `jwt.expiration_minutes` is outside `1..=MAX_TOKEN_TTL_MINUTES`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.jwt.expiration_minutes) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_minutes must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_MINUTES, self.jwt.expiration_minutes
            )));
        }
        Ok(())
    }

    /// Resolve the token signing secret for the current run mode.
    ///
    /// # Errors
    /// * `MissingSecret` - No secret configured while running in production
    pub fn signing_secret(&self) -> Result<SigningSecret, AuthError> {
        SigningSecret::resolve(
            self.jwt.secret.as_deref(),
            self.run_mode != RunMode::Production,
        )
    }

    /// Token lifetime, clamped to the accepted range for configs built
    /// without [`Config::load`].
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(
            self.jwt
                .expiration_minutes
                .clamp(1, MAX_TOKEN_TTL_MINUTES),
        )
    }
}
