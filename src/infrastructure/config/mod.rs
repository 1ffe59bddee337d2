use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

const CONFIG_BASENAME: &str = ".feedloopconfig.json";

/// Persistent CLI state, stored as JSON in the user's home directory.
/// `DATABASE_URL` in the environment (or a `.env` file) overrides the
/// stored database URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub db_url: String,
    pub current_user_name: Option<String>,
    #[serde(skip)]
    path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load the config file, falling back to environment-only settings
    /// when the file does not exist yet.
    pub fn load() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let path = Self::config_file_path()?;
        let mut config = if path.exists() {
            Self::read_file(&path)?
        } else {
            Config {
                db_url: String::new(),
                current_user_name: None,
                path: path.clone(),
            }
        };
        config.path = path;

        if let Ok(db_url) = env::var("DATABASE_URL") {
            config.db_url = db_url;
        }

        if config.db_url.is_empty() {
            return Err(AppError::Config(
                "No database URL configured; set DATABASE_URL or edit the config file".to_string(),
            ));
        }

        Ok(config)
    }

    /// Set the current user and persist the change.
    pub fn set_user(&mut self, username: &str) -> AppResult<()> {
        self.current_user_name = Some(username.to_string());
        self.write_file()
    }

    pub fn log_format() -> LogFormat {
        match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    fn config_file_path() -> AppResult<PathBuf> {
        let home = env::var_os("HOME")
            .ok_or_else(|| AppError::Config("HOME is not set".to_string()))?;
        Ok(PathBuf::from(home).join(CONFIG_BASENAME))
    }

    fn read_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    fn write_file(&self) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&self.path, contents).map_err(|e| {
            AppError::Config(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
