use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// HTTP client parameters (`[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum redirects followed per request.
    pub max_redirections: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 60,
            max_redirections: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/dbx/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DbxConfig {
    pub http: HttpConfig,
    /// Netscape cookies.txt loaded before every extraction (overridden by --cookies).
    pub cookies_file: Option<PathBuf>,
    /// Pretty-print JSON output of `dbx extract`.
    pub pretty_json: bool,
}

impl Default for DbxConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            cookies_file: None,
            pretty_json: true,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dbx")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DbxConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DbxConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DbxConfig = toml::from_str(&data)?;
    Ok(cfg)
}
