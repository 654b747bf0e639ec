use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::{CredentialScope, Credentials};

/// Environment variable that overrides `[auth] password`.
pub const PASSWORD_ENV: &str = "SHEETDL_AUTH_PASSWORD";

/// HTTP Basic credentials (optional section in config.toml).
///
/// Credentials are only attached to requests whose host is listed in `hosts`,
/// unless `allow_any_host` is set.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    /// May be left out and supplied through `SHEETDL_AUTH_PASSWORD` instead.
    #[serde(default)]
    pub password: Option<String>,
    /// Hosts that receive the credentials (e.g. `reports.example.com`).
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Send the credentials to every host in the spreadsheet.
    #[serde(default)]
    pub allow_any_host: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("hosts", &self.hosts)
            .field("allow_any_host", &self.allow_any_host)
            .finish()
    }
}

impl AuthConfig {
    /// Build request credentials. `env_password` takes precedence over the file value.
    pub fn credentials(&self, env_password: Option<String>) -> Result<Credentials> {
        let password = env_password
            .or_else(|| self.password.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "auth username is set but no password was given (config or {})",
                    PASSWORD_ENV
                )
            })?;
        let scope = if self.allow_any_host {
            CredentialScope::AnyHost
        } else {
            if self.hosts.is_empty() {
                tracing::warn!(
                    "auth configured without hosts; credentials will not be sent to any host"
                );
            }
            CredentialScope::Hosts(self.hosts.clone())
        };
        Ok(Credentials::new(&self.username, &password, scope))
    }
}

/// Global configuration loaded from `~/.config/sheetdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetdlConfig {
    /// Header of the column holding the URLs.
    pub url_column: String,
    /// Header of the column holding custom filenames (optional).
    #[serde(default)]
    pub filename_column: Option<String>,
    /// Sheet index ("0" = first sheet) or sheet name.
    pub sheet: String,
    /// Pause between consecutive rows, in seconds.
    pub delay_secs: f64,
    /// Connect timeout and read-stall timeout for each request, in seconds.
    pub timeout_secs: u64,
    /// Keep only alphanumerics, `.`, `_`, `-` and space in saved filenames.
    pub strict_filenames: bool,
    /// Default target directory for `sheetdl run`.
    pub download_dir: PathBuf,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

impl Default for SheetdlConfig {
    fn default() -> Self {
        Self {
            url_column: "URL".to_string(),
            filename_column: None,
            sheet: "0".to_string(),
            delay_secs: 1.0,
            timeout_secs: 30,
            strict_filenames: true,
            download_dir: PathBuf::from("./downloads"),
            auth: None,
        }
    }
}

impl SheetdlConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url_column.trim().is_empty() {
            anyhow::bail!("url_column must not be empty");
        }
        if !self.delay_secs.is_finite() || self.delay_secs < 0.0 {
            anyhow::bail!("delay_secs must be a non-negative number, got {}", self.delay_secs);
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Filename column with blank values treated as absent.
    pub fn filename_column(&self) -> Option<&str> {
        self.filename_column
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sheetdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SheetdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SheetdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SheetdlConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}
