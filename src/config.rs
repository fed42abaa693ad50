//! Server configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use layout::catalog::{CatalogError, PanelCatalog};
use layout::consts::PANEL_GAP_PX;
use layout::doc::LayoutSettings;
use layout::planner;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CATALOG_PATH: &str = "data/panels.json";
pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("failed to read panel catalog {}: {source}", path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid panel catalog {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub catalog_path: PathBuf,
    pub layout: LayoutSettings,
    pub max_sessions: usize,
    pub session_idle: Duration,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `PANEL_CATALOG_PATH`: default `data/panels.json`
    /// - `LAYOUT_GAP_PX`: gap between planned panels, default 10
    /// - `HISTORY_LIMIT`: snapshots kept per session, unbounded when unset
    /// - `MAX_SESSIONS`: default 1000
    /// - `SESSION_IDLE_SECS`: idle seconds before an unheld session is
    ///   evicted, default 1800
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a value that does not parse or is
    /// out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let catalog_path = lookup("PANEL_CATALOG_PATH").map_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH), PathBuf::from);

        let gap_px = parse_or("LAYOUT_GAP_PX", lookup("LAYOUT_GAP_PX"), PANEL_GAP_PX)?;
        if !planner::is_valid_gap(gap_px) {
            return Err(invalid("LAYOUT_GAP_PX", lookup("LAYOUT_GAP_PX")));
        }

        let history_limit = match lookup("HISTORY_LIMIT") {
            None => None,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => Some(limit),
                _ => return Err(ConfigError::Invalid { var: "HISTORY_LIMIT", value: raw }),
            },
        };

        let max_sessions = parse_or("MAX_SESSIONS", lookup("MAX_SESSIONS"), DEFAULT_MAX_SESSIONS)?;
        if max_sessions == 0 {
            return Err(invalid("MAX_SESSIONS", lookup("MAX_SESSIONS")));
        }

        let idle_secs = parse_or("SESSION_IDLE_SECS", lookup("SESSION_IDLE_SECS"), DEFAULT_SESSION_IDLE_SECS)?;
        if idle_secs == 0 {
            return Err(invalid("SESSION_IDLE_SECS", lookup("SESSION_IDLE_SECS")));
        }

        Ok(Self {
            port,
            catalog_path,
            layout: LayoutSettings { gap_px, history_limit },
            max_sessions,
            session_idle: Duration::from_secs(idle_secs),
        })
    }

    /// Read and validate the panel catalog named by `catalog_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CatalogRead`] when the file cannot be read and
    /// [`ConfigError::Catalog`] when its contents are invalid.
    pub async fn load_catalog(&self) -> Result<PanelCatalog, ConfigError> {
        let text = tokio::fs::read_to_string(&self.catalog_path)
            .await
            .map_err(|source| ConfigError::CatalogRead { path: self.catalog_path.clone(), source })?;
        PanelCatalog::from_json(&text).map_err(|source| ConfigError::Catalog { path: self.catalog_path.clone(), source })
    }
}

fn invalid(var: &'static str, raw: Option<String>) -> ConfigError {
    ConfigError::Invalid { var, value: raw.unwrap_or_default() }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
