//! Layered configuration for taskdesk.
//!
//! Each option is addressed by a dotted key (`db.url`, `app.title`, ...) and
//! resolved from four layers, first hit wins:
//!
//! 1. environment variable: the key uppercased with dots replaced by
//!    underscores (`db.pool_size` -> `DB_POOL_SIZE`);
//! 2. process-level override, given on the command line as `--set key=value`;
//! 3. the defaults file `config.json` in the data directory, a flat JSON
//!    object of dotted keys;
//! 4. the hardcoded default.
//!
//! Empty values in the first two layers are treated as unset.
//!
//! ```rust,no_run
//! use taskdesk::libs::config::{Config, PropertySources};
//! use taskdesk::libs::data_storage::DataStorage;
//!
//! let storage = DataStorage::new();
//! let sources = PropertySources::new()
//!     .with_process_env()
//!     .with_overrides(vec![("db.pool_size".into(), "4".into())])
//!     .with_defaults_file(&storage.get_path("config.json")?)?;
//! let config = Config::resolve(&sources, &storage)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::{anyhow, Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "taskdesk.db";

pub mod keys {
    pub const DB_URL: &str = "db.url";
    pub const DB_USERNAME: &str = "db.username";
    pub const DB_PASSWORD: &str = "db.password";
    pub const DB_DRIVER: &str = "db.driver";
    pub const DB_SCHEMA: &str = "db.schema";
    pub const DB_SHOW_SQL: &str = "db.show_sql";
    pub const DB_FORMAT_SQL: &str = "db.format_sql";
    pub const DB_POOL_SIZE: &str = "db.pool_size";
    pub const APP_TITLE: &str = "app.title";
    pub const APP_VERSION: &str = "app.version";
}

const DEFAULT_DRIVER: &str = "sqlite";
const DEFAULT_POOL_SIZE: u32 = 10;

/// What happens to the schema when the database is opened.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// Leave the schema alone.
    None,
    /// Apply pending migrations.
    #[default]
    Update,
    /// Drop the application tables and build them from scratch.
    Create,
}

impl fmt::Display for SchemaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaMode::None => "none",
            SchemaMode::Update => "update",
            SchemaMode::Create => "create",
        })
    }
}

impl FromStr for SchemaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(SchemaMode::None),
            "update" => Ok(SchemaMode::Update),
            "create" => Ok(SchemaMode::Create),
            other => Err(format!("unknown schema mode '{}', expected none, update or create", other)),
        }
    }
}

/// Environment variable name for a dotted key.
pub fn env_key(key: &str) -> String {
    key.to_uppercase().replace('.', "_")
}

/// Parses a `key=value` pair as accepted by `--set`.
pub fn parse_override(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

/// The raw property layers, before any typing.
#[derive(Debug, Clone, Default)]
pub struct PropertySources {
    env: HashMap<String, String>,
    overrides: HashMap<String, String>,
    file: HashMap<String, String>,
}

impl PropertySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env.extend(vars);
        self
    }

    pub fn with_process_env(self) -> Self {
        self.with_env(std::env::vars())
    }

    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.overrides.extend(overrides);
        self
    }

    pub fn with_file_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.file.extend(values);
        self
    }

    /// Adds the defaults file layer. A missing file is not an error.
    pub fn with_defaults_file(self, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(self);
        }

        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let values: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))?;
        let values = values.into_iter().filter_map(|(key, value)| {
            let value = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            Some((key, value))
        });

        Ok(self.with_file_values(values))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.env.get(&env_key(key)).filter(|v| !v.is_empty()) {
            tracing::trace!(key, source = "env", "config value resolved");
            return Some(value);
        }
        if let Some(value) = self.overrides.get(key).filter(|v| !v.is_empty()) {
            tracing::trace!(key, source = "override", "config value resolved");
            return Some(value);
        }
        self.file.get(key).map(String::as_str)
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw.trim().parse().map_err(|e| anyhow!("Invalid value '{}' for {}: {}", raw, key, e)),
            None => Ok(default),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DbConfig {
    pub url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub driver: String,
    pub schema: SchemaMode,
    pub show_sql: bool,
    pub format_sql: bool,
    pub pool_size: u32,
}

impl DbConfig {
    /// A private in-memory database with a freshly migrated schema.
    pub fn in_memory() -> Self {
        DbConfig {
            url: "sqlite::memory:".to_string(),
            ..DbConfig::for_url("")
        }
    }

    /// Defaults for a database at `url`.
    pub fn for_url(url: &str) -> Self {
        DbConfig {
            url: url.to_string(),
            username: String::new(),
            password: String::new(),
            driver: DEFAULT_DRIVER.to_string(),
            schema: SchemaMode::Update,
            show_sql: true,
            format_sql: true,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            title: APP_METADATA_TITLE.to_string(),
            version: APP_METADATA_VERSION.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub db: DbConfig,
    pub app: AppConfig,
}

impl Config {
    /// Resolves every option from `sources`, falling back to defaults that
    /// place the database inside `storage`.
    pub fn resolve(sources: &PropertySources, storage: &DataStorage) -> Result<Config> {
        let default_url = match sources.get(keys::DB_URL) {
            Some(_) => String::new(),
            None => format!("sqlite://{}", storage.get_path(DB_FILE_NAME)?.display()),
        };
        let app_defaults = AppConfig::default();

        let db = DbConfig {
            url: sources.string(keys::DB_URL, &default_url),
            username: sources.string(keys::DB_USERNAME, ""),
            password: sources.string(keys::DB_PASSWORD, ""),
            driver: sources.string(keys::DB_DRIVER, DEFAULT_DRIVER),
            schema: sources.parsed(keys::DB_SCHEMA, SchemaMode::Update)?,
            show_sql: sources.parsed(keys::DB_SHOW_SQL, true)?,
            format_sql: sources.parsed(keys::DB_FORMAT_SQL, true)?,
            pool_size: sources.parsed(keys::DB_POOL_SIZE, DEFAULT_POOL_SIZE)?,
        };
        if db.pool_size == 0 {
            return Err(anyhow!("Invalid value '0' for {}: pool size must be at least 1", keys::DB_POOL_SIZE));
        }

        let app = AppConfig {
            title: sources.string(keys::APP_TITLE, &app_defaults.title),
            version: sources.string(keys::APP_VERSION, &app_defaults.version),
        };

        Ok(Config { db, app })
    }

    /// Resolves the configuration the binary runs with: process environment,
    /// command-line overrides and the defaults file in the data directory.
    pub fn load(overrides: Vec<(String, String)>) -> Result<Config> {
        let storage = DataStorage::new();
        let sources = PropertySources::new()
            .with_process_env()
            .with_overrides(overrides)
            .with_defaults_file(&storage.get_path(CONFIG_FILE_NAME)?)?;
        Config::resolve(&sources, &storage)
    }

    /// Flat dotted-key view, the shape of the defaults file.
    pub fn to_properties(&self) -> BTreeMap<&'static str, serde_json::Value> {
        let mut properties = BTreeMap::new();
        properties.insert(keys::DB_URL, self.db.url.clone().into());
        properties.insert(keys::DB_USERNAME, self.db.username.clone().into());
        if !self.db.password.is_empty() {
            properties.insert(keys::DB_PASSWORD, self.db.password.clone().into());
        }
        properties.insert(keys::DB_DRIVER, self.db.driver.clone().into());
        properties.insert(keys::DB_SCHEMA, self.db.schema.to_string().into());
        properties.insert(keys::DB_SHOW_SQL, self.db.show_sql.into());
        properties.insert(keys::DB_FORMAT_SQL, self.db.format_sql.into());
        properties.insert(keys::DB_POOL_SIZE, self.db.pool_size.into());
        properties.insert(keys::APP_TITLE, self.app.title.clone().into());
        properties.insert(keys::APP_VERSION, self.app.version.clone().into());
        properties
    }

    /// Writes the defaults file and returns its path.
    pub fn save(&self, storage: &DataStorage) -> Result<PathBuf> {
        let path = storage.get_path(CONFIG_FILE_NAME)?;
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(&file, &self.to_properties())?;
        Ok(path)
    }

    /// Rows for the configuration status view. The password is never shown.
    pub fn status(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Database URL", self.db.url.clone()),
            ("Database Username", self.db.username.clone()),
            ("Database Driver", self.db.driver.clone()),
            ("Schema Auto-Update", self.db.schema.to_string()),
            ("Show SQL", self.db.show_sql.to_string()),
            ("Format SQL", self.db.format_sql.to_string()),
            ("Connection Pool Size", self.db.pool_size.to_string()),
            ("App Title", self.app.title.clone()),
            ("App Version", self.app.version.clone()),
        ]
    }

    /// Interactive wizard seeded with `current`. The caller saves the result.
    pub fn init(current: &Config) -> Result<Config> {
        let theme = ColorfulTheme::default();
        let mut config = current.clone();

        msg_print!(Message::ConfigModuleDatabase, true);
        config.db.url = Input::with_theme(&theme)
            .with_prompt(Message::PromptDbUrl.to_string())
            .default(config.db.url)
            .interact_text()?;
        config.db.driver = Input::with_theme(&theme)
            .with_prompt(Message::PromptDbDriver.to_string())
            .default(config.db.driver)
            .interact_text()?;
        config.db.schema = Input::<String>::with_theme(&theme)
            .with_prompt(Message::PromptDbSchema.to_string())
            .default(config.db.schema.to_string())
            .validate_with(|input: &String| input.parse::<SchemaMode>().map(|_| ()))
            .interact_text()?
            .parse()
            .map_err(|e: String| anyhow!(e))?;
        config.db.pool_size = Input::with_theme(&theme)
            .with_prompt(Message::PromptDbPoolSize.to_string())
            .default(config.db.pool_size)
            .validate_with(|size: &u32| if *size > 0 { Ok(()) } else { Err("pool size must be at least 1") })
            .interact_text()?;
        config.db.show_sql = Confirm::with_theme(&theme)
            .with_prompt(Message::PromptShowSql.to_string())
            .default(config.db.show_sql)
            .interact()?;
        config.db.format_sql = Confirm::with_theme(&theme)
            .with_prompt(Message::PromptFormatSql.to_string())
            .default(config.db.format_sql)
            .interact()?;

        msg_print!(Message::ConfigModuleApplication, true);
        config.app.title = Input::with_theme(&theme)
            .with_prompt(Message::PromptAppTitle.to_string())
            .default(config.app.title)
            .interact_text()?;

        Ok(config)
    }
}
