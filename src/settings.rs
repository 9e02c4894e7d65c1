use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Postgres connection string. When unset the in-memory store is used.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_true")]
    pub seed_mock_data: bool,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default)]
    pub chat_api_url: Option<String>,

    #[serde(default)]
    pub chat_api_key: Option<String>,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_chat_timeout")]
    pub chat_timeout_secs: u64,

    #[serde(default = "default_chat_max_tokens")]
    pub chat_max_tokens: u32,

    #[serde(default = "default_chat_rate_limit")]
    pub chat_rate_limit_per_minute: u32,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_upload_max_bytes")]
    pub upload_max_bytes: usize,

    #[serde(default)]
    pub public_base_url: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Site".to_string()
}
fn default_owner_name() -> String {
    "Portfolio Owner".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_true() -> bool {
    true
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_chat_timeout() -> u64 {
    20
}
fn default_chat_max_tokens() -> u32 {
    500
}
fn default_chat_rate_limit() -> u32 {
    20
}
fn default_upload_dir() -> String {
    "uploads".to_string()
}
fn default_upload_max_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            owner_name: default_owner_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            database_url: None,
            seed_mock_data: true,
            cors_allowed_origins: default_cors_origins(),
            trust_x_forwarded_for: false,
            jwt_secret: String::new(),
            chat_api_url: None,
            chat_api_key: None,
            chat_model: default_chat_model(),
            chat_timeout_secs: default_chat_timeout(),
            chat_max_tokens: default_chat_max_tokens(),
            chat_rate_limit_per_minute: default_chat_rate_limit(),
            upload_dir: default_upload_dir(),
            upload_max_bytes: default_upload_max_bytes(),
            public_base_url: String::new(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.jwt_secret = fill_or_env(config.jwt_secret, "APP_JWT_SECRET")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.jwt_secret.len() < 32 {
            errors.push("JWT_SECRET must be at least 32 characters");
        }
        if self.database_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            errors.push("DATABASE_URL cannot be blank when set");
        }
        if self.chat_timeout_secs == 0 {
            errors.push("CHAT_TIMEOUT_SECS must be greater than zero");
        }
        if self.upload_max_bytes == 0 {
            errors.push("UPLOAD_MAX_BYTES must be greater than zero");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < 32 {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("owner_name", &self.owner_name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("seed_mock_data", &self.seed_mock_data)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("jwt_secret", &self.jwt_secret.redact())
            .field("chat_api_url", &self.chat_api_url)
            .field("chat_api_key", &self.chat_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("chat_model", &self.chat_model)
            .field("chat_timeout_secs", &self.chat_timeout_secs)
            .field("chat_max_tokens", &self.chat_max_tokens)
            .field("chat_rate_limit_per_minute", &self.chat_rate_limit_per_minute)
            .field("upload_dir", &self.upload_dir)
            .field("upload_max_bytes", &self.upload_max_bytes)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let jwt_secret = Zeroizing::new(config.jwt_secret.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}
