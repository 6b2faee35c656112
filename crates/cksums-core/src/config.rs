use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::digest::DEFAULT_BUF_SIZE;
use crate::runner::DEFAULT_JOBS;

/// Global configuration loaded from `~/.config/cksums/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CksumsConfig {
    /// Algorithm used when neither `--algorithm` nor the program name selects one.
    #[serde(default = "default_algorithm")]
    pub default_algorithm: String,
    /// Maximum files digested concurrently (and so open at once).
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Read chunk size in bytes.
    #[serde(default = "default_buffer_bytes")]
    pub buffer_bytes: usize,
}

fn default_algorithm() -> String {
    "md5".to_string()
}

fn default_jobs() -> usize {
    DEFAULT_JOBS
}

fn default_buffer_bytes() -> usize {
    DEFAULT_BUF_SIZE
}

impl Default for CksumsConfig {
    fn default() -> Self {
        Self {
            default_algorithm: default_algorithm(),
            jobs: default_jobs(),
            buffer_bytes: default_buffer_bytes(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cksums")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CksumsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CksumsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file. Missing keys take their defaults.
pub fn load_from(path: &Path) -> Result<CksumsConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: CksumsConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = CksumsConfig::default();
        assert_eq!(cfg.default_algorithm, "md5");
        assert_eq!(cfg.jobs, 4);
        assert_eq!(cfg.buffer_bytes, 64 * 1024);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = CksumsConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CksumsConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            default_algorithm = "sha256"
            jobs = 16
            buffer_bytes = 1_048_576
        "#;
        let cfg: CksumsConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.default_algorithm, "sha256");
        assert_eq!(cfg.jobs, 16);
        assert_eq!(cfg.buffer_bytes, 1_048_576);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let cfg: CksumsConfig = toml::from_str("jobs = 2").unwrap();
        assert_eq!(cfg.jobs, 2);
        assert_eq!(cfg.default_algorithm, "md5");
        assert_eq!(cfg.buffer_bytes, DEFAULT_BUF_SIZE);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_algorithm = \"sha1\"\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.default_algorithm, "sha1");
        assert_eq!(cfg.jobs, DEFAULT_JOBS);
    }

    #[test]
    fn load_from_rejects_bad_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "jobs = \"many\"\n").unwrap();
        assert!(load_from(&path).is_err());
    }
}
