//! Server configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `reelwright.toml` in the working directory, or the file given with `--config`
//! 3. `REELWRIGHT__*` environment variables, `__` separating nested keys
//!    (`REELWRIGHT__PUBLISH__GRAPH_API_VERSION=v20.0`)

use config::{Config, Environment, File};
use reelwright_core::{AdminSettings, ProviderFallbacks};
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use reelwright_pipeline::{MediaConfig, StaticCatalog};
use reelwright_social::PublishConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default file name looked up in the working directory.
pub const CONFIG_FILE: &str = "reelwright";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "REELWRIGHT";

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind_addr: String,
    /// Directory holding generated artifacts.
    pub media_root: PathBuf,
    /// URL prefix serving `media_root`, if it is publicly reachable.
    pub public_media_base: Option<String>,
    /// Emit JSON log lines instead of text.
    pub json_logs: bool,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// System fallback provider per capability.
    pub providers: ProviderFallbacks,
    /// Platform publishing.
    pub publish: PublishConfig,
    /// How long admin settings are cached.
    pub settings_ttl_secs: u64,
    /// Niches, art styles and voices.
    pub catalog: StaticCatalog,
    /// Initial admin settings.
    pub admin: AdminSettings,
    /// Shared secret the authenticating gateway sends in `x-gateway-token`.
    pub gateway_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            media_root: PathBuf::from("media"),
            public_media_base: None,
            json_logs: false,
            log_level: "info".to_string(),
            providers: ProviderFallbacks::default(),
            publish: PublishConfig::default(),
            settings_ttl_secs: 60,
            catalog: StaticCatalog::default(),
            admin: AdminSettings::default(),
            gateway_token: None,
        }
    }
}

fn config_error(context: &str, e: config::ConfigError) -> ReelError {
    ReelError::new(ReelErrorKind::Config(format!("{context}: {e}")))
}

impl ServerConfig {
    /// Load with precedence: environment > file > defaults.
    ///
    /// With `path` the file is required; without it `reelwright.toml` is
    /// optional.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be read or the merged
    /// result does not deserialize.
    #[instrument]
    pub fn load(path: Option<&Path>) -> ReelResult<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(CONFIG_FILE).required(false),
        };
        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("publish.permalink_delays_ms")
                    .with_list_parse_key("publish.container_poll_delays_ms")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?;
        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))?;
        debug!(bind_addr = %loaded.bind_addr, media_root = %loaded.media_root.display(), "Configuration loaded");
        Ok(loaded)
    }

    /// Artifact locations.
    pub fn media(&self) -> MediaConfig {
        MediaConfig {
            media_root: self.media_root.clone(),
            public_media_base: self.public_media_base.clone(),
        }
    }

    /// Admin settings cache lifetime.
    pub fn settings_ttl(&self) -> Duration {
        Duration::from_secs(self.settings_ttl_secs)
    }
}
