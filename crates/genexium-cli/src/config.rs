//! Configuration file management for genexium.
//!
//! Provides a TOML-based config file at `~/.config/genexium/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use genexium_core::api::ClientConfig;

pub const DEFAULT_USERNAME: &str = "admin";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerSection {
    pub url: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: ClientConfig::DEFAULT_URL.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AuthSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExportSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Leave an HTML comment where a block could not be exported.
    #[serde(default)]
    pub mark_unsupported: bool,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the genexium config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/genexium` or `~/.config/genexium`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("genexium");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("genexium")
}

/// Return the path to the genexium config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Log file used while the dashboard owns the terminal.
pub fn log_path() -> PathBuf {
    config_dir().join("genexium.log")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix, since it may hold a password.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct GenexiumConfig {
    pub client: ClientConfig,
    pub export_dir: PathBuf,
    pub mark_unsupported: bool,
}

impl GenexiumConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Server URL: `cli_server_url` > `GENEXIUM_SERVER_URL` > `server.url` > `ClientConfig::DEFAULT_URL`
    /// - Username: `GENEXIUM_USERNAME` > `auth.username` > `admin`
    /// - Password: `GENEXIUM_PASSWORD` > `auth.password` > none (requests go out unauthenticated)
    /// - Export dir: `cli_export_dir` > `GENEXIUM_EXPORT_DIR` > `export.dir` > `.`
    pub fn resolve(cli_server_url: Option<&str>, cli_export_dir: Option<&Path>) -> Result<Self> {
        let file_config = load_config().ok();

        let base_url = if let Some(url) = cli_server_url {
            url.to_string()
        } else if let Ok(url) = std::env::var("GENEXIUM_SERVER_URL") {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.server.url.clone()
        } else {
            ClientConfig::DEFAULT_URL.to_string()
        };

        let username = std::env::var("GENEXIUM_USERNAME")
            .ok()
            .or_else(|| file_config.as_ref().and_then(|c| c.auth.username.clone()))
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let password = std::env::var("GENEXIUM_PASSWORD")
            .ok()
            .or_else(|| file_config.as_ref().and_then(|c| c.auth.password.clone()));

        let mut client = ClientConfig::new(base_url);
        if let Some(password) = password {
            client = client.with_credentials(username, password);
        }

        let export_dir = if let Some(dir) = cli_export_dir {
            dir.to_path_buf()
        } else if let Ok(dir) = std::env::var("GENEXIUM_EXPORT_DIR") {
            PathBuf::from(dir)
        } else if let Some(dir) = file_config.as_ref().and_then(|c| c.export.dir.clone()) {
            dir
        } else {
            PathBuf::from(".")
        };

        let mark_unsupported = file_config.as_ref().is_some_and(|c| c.export.mark_unsupported);

        Ok(Self {
            client,
            export_dir,
            mark_unsupported,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
