use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::recommend::{DEFAULT_TOP_K, RecommendConfig};

pub const CATALOG_ENV: &str = "JOBMATCH_CATALOG";
pub const TOP_K_ENV: &str = "JOBMATCH_TOP_K";

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub top_k: usize,
}

impl Config {
    /// Flags win over environment variables, which win over defaults.
    pub fn resolve(catalog: Option<PathBuf>, top_k: Option<usize>) -> Result<Self> {
        let catalog_path = match catalog {
            Some(path) => path,
            None => match std::env::var_os(CATALOG_ENV) {
                Some(path) => PathBuf::from(path),
                None => default_catalog_path(),
            },
        };

        let top_k = match top_k {
            Some(k) => k,
            None => match std::env::var(TOP_K_ENV) {
                Ok(raw) => parse_top_k(&raw)?,
                Err(_) => DEFAULT_TOP_K,
            },
        };

        Ok(Self { catalog_path, top_k })
    }

    pub fn recommend_config(&self) -> RecommendConfig {
        RecommendConfig {
            top_k: self.top_k,
            ..Default::default()
        }
    }
}

fn parse_top_k(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .with_context(|| format!("{} must be a non-negative integer, got '{}'", TOP_K_ENV, raw))
}

fn default_catalog_path() -> PathBuf {
    // XDG data directory, or the current directory
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobmatch") {
        proj_dirs.data_dir().join("jobs.csv")
    } else {
        PathBuf::from("jobs.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_take_precedence() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/x.csv")), Some(5)).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/x.csv"));
        assert_eq!(config.top_k, 5);
        assert_eq!(config.recommend_config().top_k, 5);
    }

    #[test]
    fn test_parse_top_k() {
        assert_eq!(parse_top_k(" 4 ").unwrap(), 4);
        assert!(parse_top_k("three").is_err());
    }

    #[test]
    fn test_default_catalog_file_name() {
        assert!(default_catalog_path().ends_with("jobs.csv"));
    }
}
