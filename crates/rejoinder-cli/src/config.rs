//! Configuration Vault – reads/writes `~/.rejoinder/config.toml`.
//!
//! ```toml
//! user_name = "user"
//!
//! [bot]
//! adapter = "sqlite"
//! database = "/home/me/.rejoinder/statements.db"
//! comparator = "levenshtein"
//! ```

use rejoinder_runtime::{AdapterKind, ChatConfig, ComparatorKind, Language, TieBreak};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Persisted user configuration stored in `~/.rejoinder/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Speaker name recorded for lines typed into the REPL.
    #[serde(default = "default_user_name")]
    pub user_name: String,

    /// Settings handed to the chat bot.
    #[serde(default)]
    pub bot: ChatConfig,
}

fn default_user_name() -> String {
    "user".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_name: default_user_name(),
            bot: ChatConfig::default(),
        }
    }
}

/// Return the path to `~/.rejoinder/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(&home_dir())
}

/// Default SQLite database location, next to the config file.
pub fn default_database_path() -> PathBuf {
    PathBuf::from(home_dir()).join(".rejoinder").join("statements.db")
}

fn home_dir() -> String {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string())
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".rejoinder").join("config.toml")
}

/// Load the config from disk with environment overrides applied.  Returns
/// `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    let mut cfg = load_from(&config_path())?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

/// Load the config from a specific path, without environment overrides.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Apply `REJOINDER_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `REJOINDER_ADAPTER` | `bot.adapter` |
/// | `REJOINDER_DATABASE` | `bot.database` |
/// | `REJOINDER_LANGUAGE` | `bot.language` |
/// | `REJOINDER_COMPARATOR` | `bot.comparator` |
/// | `REJOINDER_TIE_BREAK` | `bot.tie_break` |
/// | `REJOINDER_LOGGING` | `bot.logging` |
/// | `REJOINDER_USER` | `user_name` |
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Some(adapter) = env_parsed::<AdapterKind>("REJOINDER_ADAPTER") {
        cfg.bot.adapter = adapter;
    }
    if let Ok(v) = std::env::var("REJOINDER_DATABASE")
        && !v.is_empty()
    {
        cfg.bot.database = PathBuf::from(v);
    }
    if let Some(language) = env_parsed::<Language>("REJOINDER_LANGUAGE") {
        cfg.bot.language = language;
    }
    if let Some(comparator) = env_parsed::<ComparatorKind>("REJOINDER_COMPARATOR") {
        cfg.bot.comparator = comparator;
    }
    if let Some(tie_break) = env_parsed::<TieBreak>("REJOINDER_TIE_BREAK") {
        cfg.bot.tie_break = tie_break;
    }
    if let Ok(v) = std::env::var("REJOINDER_LOGGING") {
        match parse_flag(&v) {
            Some(flag) => cfg.bot.logging = flag,
            None => warn!(value = %v, "Ignoring invalid REJOINDER_LOGGING"),
        }
    }
    if let Ok(v) = std::env::var("REJOINDER_USER")
        && !v.trim().is_empty()
    {
        cfg.user_name = v.trim().to_string();
    }
}

fn env_parsed<T>(name: &str) -> Option<T>
where
    T: FromStr<Err = String>,
{
    let raw = std::env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(variable = name, error = %e, "Ignoring invalid environment override");
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Save the config to disk, creating `~/.rejoinder/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Owner-only directory (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    // Owner-only file (rw-------) on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
