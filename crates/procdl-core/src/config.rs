use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Process types accepted by the processing service.
pub const DEFAULT_PROCESS_TYPES: [&str; 4] = ["adaos", "sgr", "minus", "extract"];

/// Global configuration loaded from `~/.config/procdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcdlConfig {
    /// Base URL of the processing service (scheme, host, port).
    pub server_url: String,
    /// Path the upload form is POSTed to, relative to `server_url`.
    pub endpoint: String,
    /// Mutually exclusive process types offered for selection.
    pub process_types: Vec<String>,
    /// Process type checked when none is given on the command line.
    #[serde(default)]
    pub default_process_type: Option<String>,
    /// Where downloads are saved (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Delay between triggering a download and releasing its staged blob.
    pub cleanup_delay_ms: u64,
    /// Connect timeout for the upload request.
    pub connect_timeout_secs: u64,
    /// Overall request timeout (None = wait on the transport indefinitely).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProcdlConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            endpoint: "/process".to_string(),
            process_types: DEFAULT_PROCESS_TYPES.iter().map(|s| s.to_string()).collect(),
            default_process_type: None,
            download_dir: None,
            cleanup_delay_ms: 100,
            connect_timeout_secs: 15,
            request_timeout_secs: None,
        }
    }
}

impl ProcdlConfig {
    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.cleanup_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("procdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ProcdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ProcdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ProcdlConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
