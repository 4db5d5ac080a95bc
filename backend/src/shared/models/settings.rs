use std::{env, net::SocketAddr, path::PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

const SETTINGS_FILENAME: &str = "settings.json";
const SETTINGS_PATH_VAR: &str = "TASKS_SETTINGS";
const ENV_PREFIX: &str = "TASKS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Redb,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub tcp_socket_binding: String,
    pub tcp_socket_port: u16,
    pub storage: StorageKind,
    pub database_path: PathBuf,
    pub table_name: String,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub log_filter: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid bind address {0}")]
    Address(String),
    #[error("default_page_size must be between 1 and max_page_size ({max})")]
    PageSize { max: usize },
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tcp_socket_binding: "0.0.0.0".to_string(),
            tcp_socket_port: 3001,
            storage: StorageKind::Redb,
            database_path: PathBuf::from("tasks.redb"),
            table_name: "tasks".to_string(),
            default_page_size: 100,
            max_page_size: 1000,
            log_filter: "info,tower_http=debug".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then `settings.json` (or `$TASKS_SETTINGS`) if present, then `TASKS_*` env vars.
    pub fn load() -> Result<Settings, SettingsError> {
        let path = env::var(SETTINGS_PATH_VAR).unwrap_or_else(|_| SETTINGS_FILENAME.to_string());
        Settings::load_from(File::new(&path, FileFormat::Json).required(false))
    }

    pub fn load_from(
        file: File<config::FileSourceFile, FileFormat>,
    ) -> Result<Settings, SettingsError> {
        let defaults = Settings::default();
        let settings: Settings = Config::builder()
            .set_default("tcp_socket_binding", defaults.tcp_socket_binding)?
            .set_default("tcp_socket_port", i64::from(defaults.tcp_socket_port))?
            .set_default("storage", "redb")?
            .set_default("database_path", defaults.database_path.to_string_lossy().into_owned())?
            .set_default("table_name", defaults.table_name)?
            .set_default("default_page_size", defaults.default_page_size as i64)?
            .set_default("max_page_size", defaults.max_page_size as i64)?
            .set_default("log_filter", defaults.log_filter)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<(), SettingsError> {
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(SettingsError::PageSize { max: self.max_page_size });
        }
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = format!("{}:{}", self.tcp_socket_binding, self.tcp_socket_port);
        raw.parse().map_err(|_| SettingsError::Address(raw))
    }
}
