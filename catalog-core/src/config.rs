use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CmsError, Result};

const CONFIG_ENV: &str = "CATALOG_CONFIG";
const CONFIG_FILE: &str = "catalog.json";

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_fs_access() -> bool {
    true
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CmsConfig {
    /// Where the published catalog is fetched from (e.g. `http://localhost:8080/data/projectsData.json`).
    #[serde(default)]
    pub data_url: Option<String>,

    /// Legacy-shaped JSON embedded by the hosting site, used when the fetch fails.
    #[serde(default, alias = "fallback_data")]
    pub embedded_data: Option<PathBuf>,

    /// Project root opened on startup, as if picked by the user.
    #[serde(default)]
    pub project_root: Option<PathBuf>,

    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// When false, directory selection reports the capability as unavailable.
    #[serde(default = "default_fs_access")]
    pub fs_access: bool,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            data_url: None,
            embedded_data: None,
            project_root: None,
            download_dir: default_download_dir(),
            fs_access: default_fs_access(),
            http_timeout_secs: default_http_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl CmsConfig {
    /// `CATALOG_CONFIG` if set, otherwise `catalog.json` in the working directory.
    pub fn default_path() -> PathBuf {
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            if !p.trim().is_empty() {
                return PathBuf::from(p);
            }
        }
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(CONFIG_FILE)
    }

    /// Missing file yields the defaults; a present but invalid file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)?;
        let cfg: CmsConfig = serde_json::from_str(&data)
            .map_err(|e| CmsError::Config(format!("{}: {e}", path.display())))?;

        if cfg.http_timeout_secs == 0 {
            return Err(CmsError::Config("http_timeout_secs must be > 0".into()));
        }

        Ok(cfg)
    }

    /// Reads the embedded legacy document, if one is configured and readable.
    pub fn load_embedded(&self) -> Option<serde_json::Value> {
        let path = self.embedded_data.as_ref()?;

        let data = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("failed to read embedded data {}: {e}", path.display());
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("failed to parse embedded data {}: {e}", path.display());
                None
            }
        }
    }
}
