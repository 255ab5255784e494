use crate::error::ConfigError;

/// Platform name that unlocks destructive admin operations
pub const DEV_PLATFORM: &str = "dev";

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    pub polka: PolkaSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Deployment platform; only `dev` allows `/admin/reset`
    pub platform: String,
    /// Directory served under `/app/`
    pub static_dir: String,
}

impl ApplicationSettings {
    pub fn allows_destructive_admin(&self) -> bool {
        self.platform == DEV_PLATFORM
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// JWT authentication settings
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,   // seconds (3600 = 1 hour)
    pub refresh_token_expiry: i64,  // seconds (5184000 = 60 days)
}

/// Payment provider webhook settings
#[derive(serde::Deserialize, Clone)]
pub struct PolkaSettings {
    pub api_key: String,
}

impl Settings {
    /// Reject settings the server cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt.secret".to_string()));
        }
        if self.polka.api_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("polka.api_key".to_string()));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt.access_token_expiry must be positive".to_string(),
            ));
        }
        if self.jwt.refresh_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt.refresh_token_expiry must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load settings from `configuration.*` (optional) overlaid by `APP_*`
/// environment variables, e.g. `APP_JWT__SECRET`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 8080)?
        .set_default("application.platform", "production")?
        .set_default("application.static_dir", "./public")?
        .set_default("jwt.access_token_expiry", 3600)?
        .set_default("jwt.refresh_token_expiry", 60 * 24 * 60 * 60)?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
