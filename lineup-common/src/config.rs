//! Configuration loading and root folder resolution
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line arguments and environment variables are handled by each
//! binary's clap parser (`#[arg(env = ...)]`); this module supplies tiers 3 and 4.

use crate::notify::NotificationRule;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "LINEUP_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "lineup.db";

/// Default server the notifier talks to
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Default polling period for the notifier (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Contents of `config.toml`
///
/// Every field is optional; a missing or unreadable file is never fatal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding lineup.db
    pub root_folder: Option<PathBuf>,
    /// Base URL of the lineup server (notifier only)
    pub server_url: Option<String>,
    /// Polling period in seconds (notifier only)
    pub poll_interval_secs: Option<u64>,
    /// Restrict alerts to one exhibitor (notifier only)
    pub exhibitor_id: Option<String>,
    /// Breed calls the notifier watches for
    #[serde(default)]
    pub notifications: Vec<NotificationRule>,
}

impl TomlConfig {
    /// Parse a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the config file from `explicit` if given, otherwise from the
    /// platform location. Missing or invalid files yield defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let Some(path) = path else {
            debug!("No config file found, using defaults");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config file {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }
}

/// Locate the config file for the platform
///
/// Linux checks `~/.config/lineup/config.toml` then `/etc/lineup/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("lineup").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/lineup/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("lineup"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/lineup"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("lineup"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/lineup"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("lineup"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\lineup"))
    } else {
        PathBuf::from("./lineup_data")
    }
}

/// Resolves the root folder for a module
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml: TomlConfig,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml: TomlConfig::default(),
        }
    }

    /// Command-line override (tier 1)
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Parsed config file (tier 3)
    pub fn with_toml(mut self, toml: TomlConfig) -> Self {
        self.toml = toml;
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!("{}: root folder from command line", self.module_name);
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                debug!("{}: root folder from {}", self.module_name, ROOT_FOLDER_ENV);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml.root_folder {
            debug!("{}: root folder from config file", self.module_name);
            return path.clone();
        }

        default_root_folder()
    }
}

/// Creates the root folder and hands out paths inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}
