// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client configuration and its storage port.

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use vantage_scene::DEFAULT_DEPTH_TOLERANCE;

mod fs;
mod memory;

pub use fs::{FsConfigStore, CONFIG_DIR_ENV};
pub use memory::InMemoryConfigStore;

/// Key under which [`ClientConfig`] is stored.
pub const CLIENT_CONFIG_KEY: &str = "client";

/// Where session settings live between runs.
pub trait ConfigStore {
    /// Raw document stored under `key`; [`ConfigError::NotFound`] if absent.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replaces the document stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Failures reading, writing or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("not found")]
    NotFound,
    /// Store I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The stored document is not valid JSON for the requested type.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// No per-user configuration directory on this platform.
    #[error("no config directory for this user")]
    NoConfigDir,
    /// A setting is out of range.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// JSON documents on top of a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Service reading and writing through `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Document under `key`; `Ok(None)` when absent or empty.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stores `value` under `key` as pretty JSON.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

/// Session tunables.
///
/// Fields missing from a stored document take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Window for camera renders, hit tests and stencil fetches.
    pub request_timeout_ms: u64,
    /// Window for scene alterations.
    pub scene_alteration_timeout_ms: u64,
    /// Animation length used when a render asks for animation without one.
    pub fly_to_animation_ms: u64,
    /// Search radius for stencil snapping, in frame pixels.
    pub snap_radius_px: f64,
    /// Occlusion/detachment tolerance as a fraction of point distance.
    pub depth_tolerance: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            scene_alteration_timeout_ms: 30_000,
            fly_to_animation_ms: 500,
            snap_radius_px: 10.0,
            depth_tolerance: DEFAULT_DEPTH_TOLERANCE,
        }
    }
}

impl ClientConfig {
    /// Loads [`CLIENT_CONFIG_KEY`], falling back to defaults (with a warning)
    /// when the entry is missing or unreadable.
    pub fn load_or_default<S: ConfigStore>(service: &ConfigService<S>) -> Self {
        let loaded = service
            .load::<Self>(CLIENT_CONFIG_KEY)
            .and_then(|config| config.map(Self::validated).transpose());
        match loaded {
            Ok(Some(config)) => {
                debug!(?config, "client config loaded");
                config
            }
            Ok(None) => Self::default(),
            Err(err) => {
                warn!(%err, "client config unusable; using defaults");
                Self::default()
            }
        }
    }

    /// Passes `self` through if every setting is usable.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] for zero timeouts, a snap radius that is not
    /// a positive finite number, or a depth tolerance outside `[0, 1)`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if self.request_timeout_ms == 0 {
            return invalid("request_timeout_ms", "must be positive");
        }
        if self.scene_alteration_timeout_ms == 0 {
            return invalid("scene_alteration_timeout_ms", "must be positive");
        }
        if !(self.snap_radius_px.is_finite() && self.snap_radius_px > 0.0) {
            return invalid("snap_radius_px", "must be a positive finite number");
        }
        if !(0.0..1.0).contains(&self.depth_tolerance) {
            return invalid("depth_tolerance", "must lie in [0, 1)");
        }
        Ok(self)
    }

    /// Window for renders, picks and stencil fetches.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Window for [`crate::SceneSession::execute`].
    pub fn scene_alteration_timeout(&self) -> Duration {
        Duration::from_millis(self.scene_alteration_timeout_ms)
    }

    /// Duration of animated renders.
    pub fn fly_to_animation(&self) -> Duration {
        Duration::from_millis(self.fly_to_animation_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_other_defaults() {
        let store = InMemoryConfigStore::new();
        store
            .save_raw(CLIENT_CONFIG_KEY, br#"{"request_timeout_ms": 250}"#)
            .unwrap();
        let config = ClientConfig::load_or_default(&ConfigService::new(store));
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
        assert_eq!(config.scene_alteration_timeout(), Duration::from_secs(30));
        assert_eq!(config.depth_tolerance, 0.02);
    }

    #[test]
    fn unreadable_store_falls_back() {
        let store = InMemoryConfigStore::new();
        store.set_fail_on_load(true);
        let config = ClientConfig::load_or_default(&ConfigService::new(store));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn garbage_falls_back() {
        let store = InMemoryConfigStore::new();
        store.save_raw(CLIENT_CONFIG_KEY, b"not json").unwrap();
        let config = ClientConfig::load_or_default(&ConfigService::new(store));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn out_of_range_settings_fall_back() {
        let store = InMemoryConfigStore::new();
        store
            .save_raw(CLIENT_CONFIG_KEY, br#"{"snap_radius_px": -3.0, "request_timeout_ms": 5}"#)
            .unwrap();
        let config = ClientConfig::load_or_default(&ConfigService::new(store));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn validation_names_the_field() {
        let err = ClientConfig {
            depth_tolerance: -0.1,
            ..ClientConfig::default()
        }
        .validated()
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "depth_tolerance",
                ..
            }
        ));
        assert!(ClientConfig {
            scene_alteration_timeout_ms: 0,
            ..ClientConfig::default()
        }
        .validated()
        .is_err());
        assert!(ClientConfig::default().validated().is_ok());
    }

    #[test]
    fn save_then_load() {
        let store = InMemoryConfigStore::new();
        let service = ConfigService::new(store.clone());
        let custom = ClientConfig {
            snap_radius_px: 4.0,
            ..ClientConfig::default()
        };
        service.save(CLIENT_CONFIG_KEY, &custom).unwrap();
        assert_eq!(ClientConfig::load_or_default(&service), custom);
        assert_eq!(store.save_count(), 1);
    }
}
