use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

use crate::constants::BYTES_PER_GIB;

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
    #[serde(skip, default = "default_env")]
    pub env: AppEnvironment,

    /// Root of stored assets; relative paths resolve against the working directory.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Upload ceiling in GiB.
    #[serde(default = "default_file_size_limit")]
    pub file_size_limit: u64,

    #[serde(default)]
    pub api_key: String,

    /// Public base URL used to build returned locators.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_listen_host")]
    pub listen_host: String,

    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Bytes of a text asset rendered inline before truncation.
    #[serde(default = "default_text_preview_limit")]
    pub text_preview_limit: usize,

    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_file_size_limit() -> u64 {
    16
}
fn default_host() -> String {
    "http://localhost:3000".to_string()
}
fn default_site_name() -> String {
    "mediashare".to_string()
}
fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}
fn default_listen_port() -> u16 {
    3000
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_database_path() -> PathBuf {
    PathBuf::from("data/mediashare.db")
}
fn default_probe_timeout() -> u64 {
    10
}
fn default_text_preview_limit() -> usize {
    1024 * 1024
}
fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}
fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
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
            .add_source(Environment::default().try_parsing(true).ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.host = config.host.trim_end_matches('/').to_string();

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.api_key.trim().is_empty() {
            errors.push("API_KEY must be set");
        }
        match url::Url::parse(&self.host) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push("HOST must be an absolute http(s) URL"),
        }
        if self.file_size_limit == 0 {
            errors.push("FILE_SIZE_LIMIT must be at least 1 GiB");
        }
        if self.probe_timeout_secs == 0 {
            errors.push("PROBE_TIMEOUT_SECS must be greater than zero");
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

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.file_size_limit.saturating_mul(BYTES_PER_GIB)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            upload_dir: default_upload_dir(),
            file_size_limit: default_file_size_limit(),
            api_key: String::new(),
            host: default_host(),
            site_name: default_site_name(),
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
            worker_count: default_worker_count(),
            database_path: default_database_path(),
            probe_timeout_secs: default_probe_timeout(),
            text_preview_limit: default_text_preview_limit(),
            ffprobe_path: default_ffprobe_path(),
            ffmpeg_path: default_ffmpeg_path(),
        }
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
        } else {
            "[REDACTED]"
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("upload_dir", &self.upload_dir)
            .field("file_size_limit", &self.file_size_limit)
            .field("api_key", &self.api_key.as_str().redact())
            .field("host", &self.host)
            .field("site_name", &self.site_name)
            .field("listen_host", &self.listen_host)
            .field("listen_port", &self.listen_port)
            .field("worker_count", &self.worker_count)
            .field("database_path", &self.database_path)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .field("text_preview_limit", &self.text_preview_limit)
            .field("ffprobe_path", &self.ffprobe_path)
            .field("ffmpeg_path", &self.ffmpeg_path)
            .finish()
    }
}
