use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

use crate::constants::{DEFAULT_MAX_VIDEO_BYTES, DEFAULT_UPSTREAM_TIMEOUT_SECS, MAX_VIDEO_FIELD_BYTES};

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

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub media: MediaConfig,
}

/// Remote asset store credentials and the upload policy applied to it.
#[derive(Deserialize, Clone)]
#[serde(default, rename_all = "snake_case")]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base_url: String,
    pub delivery_base_url: String,
    pub image_folder: String,
    pub video_folder: String,
    pub image_tags: Vec<String>,
    pub enforce_image_types: bool,
    pub allowed_image_types: Vec<String>,
    pub max_video_bytes: u64,
    pub upstream_timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        MediaConfig {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            api_base_url: "https://api.cloudinary.com/v1_1".to_string(),
            delivery_base_url: "https://res.cloudinary.com".to_string(),
            image_folder: "next-cloudinary-uploads".to_string(),
            video_folder: "uploads".to_string(),
            image_tags: vec!["auto-delete-10min".to_string()],
            enforce_image_types: true,
            allowed_image_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
            ],
            max_video_bytes: DEFAULT_MAX_VIDEO_BYTES,
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Media-Ingest".to_string()
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
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
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
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .with_list_parse_key("media.image_tags")
                    .with_list_parse_key("media.allowed_image_types")
                    .try_parsing(true)
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Fall back to the variable names the hosted dashboards hand out
        config.database_url = fill_or_env(config.database_url, &["APP_DATABASE_URL", "DATABASE_URL"])?;
        config.media.cloud_name = fill_or_env(config.media.cloud_name, &["CLOUDINARY_CLOUD_NAME"])?;
        config.media.api_key = fill_or_env(config.media.api_key, &["CLOUDINARY_API_KEY"])?;
        config.media.api_secret = fill_or_env(config.media.api_secret, &["CLOUDINARY_API_SECRET"])?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.media.cloud_name.trim().is_empty() {
            errors.push("media cloud name cannot be empty");
        }
        if self.media.api_key.trim().is_empty() || self.media.api_secret.trim().is_empty() {
            errors.push("media API credentials are missing");
        }
        if self.media.max_video_bytes == 0 {
            errors.push("max_video_bytes must be positive");
        }
        if self.media.max_video_bytes > MAX_VIDEO_FIELD_BYTES {
            errors.push("max_video_bytes exceeds the 100 MiB multipart file limit");
        }
        if self.media.upstream_timeout_secs == 0 {
            errors.push("upstream_timeout_secs must be positive");
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
        split_list(&self.cors_allowed_origins)
    }
}

impl MediaConfig {
    pub fn allowed_image_types(&self) -> Vec<String> {
        split_list(&self.allowed_image_types)
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect()
    }

    pub fn image_tags(&self) -> Vec<String> {
        split_list(&self.image_tags)
    }
}

// Env sources deliver lists as a single comma-joined string
fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn fill_or_env(current: String, env_keys: &[&str]) -> Result<String, ConfigError> {
    if !current.trim().is_empty() {
        return Ok(current);
    }
    env_keys
        .iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| ConfigError::Message(format!("{} must be set", env_keys.join(" or "))))
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
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("media", &self.media)
            .finish()
    }
}

impl fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key.redact())
            .field("api_secret", &self.api_secret.redact())
            .field("api_base_url", &self.api_base_url)
            .field("delivery_base_url", &self.delivery_base_url)
            .field("image_folder", &self.image_folder)
            .field("video_folder", &self.video_folder)
            .field("image_tags", &self.image_tags)
            .field("enforce_image_types", &self.enforce_image_types)
            .field("allowed_image_types", &self.allowed_image_types)
            .field("max_video_bytes", &self.max_video_bytes)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Media-Ingest Test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/media_test".into(),
            cors_allowed_origins: vec!["*".into()],
            media: MediaConfig {
                cloud_name: "demo".into(),
                api_key: "1234".into(),
                api_secret: "very-secret".into(),
                ..MediaConfig::default()
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn missing_credentials_fail_validation() {
        let mut cfg = config();
        cfg.media.api_secret.clear();
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("credentials"));
    }

    #[test]
    fn production_rejects_wildcard_cors() {
        let mut cfg = config();
        cfg.env = AppEnvironment::Production;
        assert!(cfg.validate().is_err());

        cfg.cors_allowed_origins = vec!["https://app.example.com".into()];
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn video_cap_cannot_exceed_form_limit() {
        let mut cfg = config();
        cfg.media.max_video_bytes = MAX_VIDEO_FIELD_BYTES;
        assert!(cfg.validate().is_ok());

        cfg.media.max_video_bytes = MAX_VIDEO_FIELD_BYTES + 1;
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("multipart file limit"));
    }

    #[test]
    fn comma_joined_lists_are_split() {
        let mut media = MediaConfig::default();
        media.allowed_image_types = vec!["image/JPEG, image/webp".into()];
        assert_eq!(media.allowed_image_types(), vec!["image/jpeg", "image/webp"]);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("postgres://"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
