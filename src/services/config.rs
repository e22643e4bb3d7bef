use crate::domain::constants::DEFAULT_CONFIG_FILE;
use crate::domain::models::CheckConfig;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// An explicit `--config` must exist; otherwise `./apicompat.toml` is used when
/// present and built-in defaults when not.
pub fn load_config(explicit: Option<&Path>) -> Result<CheckConfig, ConfigError> {
    let path = match explicit {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound {
                path: p.to_path_buf(),
            })
        }
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                tracing::debug!("no config file, using defaults");
                return Ok(CheckConfig::default());
            }
            p
        }
    };
    let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.clone(),
        source: e,
    })?;
    let config = parse_config(&path, &raw)?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn parse_config(path: &Path, raw: &str) -> Result<CheckConfig, ConfigError> {
    toml::from_str(raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
