use chrono_tz::Tz;
use serde::Deserialize;
use std::{env, fs, path::Path};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Used in the export filename.
    pub app_name: String,
    pub listen_port: Option<u16>,
    pub dev_cors_origin: Option<String>,
    /// Enables bearer-token admin sessions when set.
    pub jwt_secret: Option<String>,
    /// IANA zone for dates and times in the export.
    pub report_timezone: String,
    /// Upserted into the database on startup.
    pub admins: Vec<AdminConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub password_hash: String, // bcrypt hash
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "giftdrive".into(),
            listen_port: None,
            dev_cors_origin: None,
            jwt_secret: None,
            report_timezone: "UTC".into(),
            admins: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Reads `CONFIG_PATH` (default `config.yaml`). Without an explicit
    /// `CONFIG_PATH`, a missing default file yields the built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var("CONFIG_PATH") {
            Ok(path) => Self::load_from_path(path),
            Err(_) if !Path::new(DEFAULT_CONFIG_PATH).exists() => {
                tracing::info!("no config.yaml found, using defaults");
                Ok(Self::default())
            }
            Err(_) => Self::load_from_path(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(&path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.report_timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::Invalid(format!("report_timezone: {e}")))?;
        if let Some(secret) = &self.jwt_secret
            && secret.len() < 16
        {
            return Err(ConfigError::Invalid(
                "jwt_secret must be at least 16 characters".into(),
            ));
        }
        for admin in &self.admins {
            if admin.email.trim().is_empty() {
                return Err(ConfigError::Invalid("admin email is empty".into()));
            }
        }
        Ok(())
    }

    pub fn report_tz(&self) -> Tz {
        self.report_timezone.parse().unwrap_or(Tz::UTC)
    }
}
