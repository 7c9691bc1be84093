// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed [`ConfigStore`] under the platform config directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use super::{ConfigError, ConfigStore};

/// Overrides the directory [`FsConfigStore::from_env`] uses.
pub const CONFIG_DIR_ENV: &str = "VANTAGE_CONFIG_DIR";

/// One `<key>.json` document per key in a single directory.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    dir: PathBuf,
}

impl FsConfigStore {
    /// Store in the per-user config directory (`~/.config/vantage` on Linux).
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("dev", "flyingrobots", "Vantage")
            .ok_or(ConfigError::NoConfigDir)?;
        Self::at(dirs.config_dir())
    }

    /// Store in `$VANTAGE_CONFIG_DIR` when set, otherwise [`FsConfigStore::new`].
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => Self::at(dir),
            None => Self::new(),
        }
    }

    /// Store in `dir`, created if missing.
    pub fn at(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "config store opened");
        Ok(Self { dir })
    }

    /// Directory holding the documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        fs::read(self.path_for(key)).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::Io(err),
        })
    }

    /// Replaces the document atomically through a sibling temp file.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, ConfigService, CLIENT_CONFIG_KEY};

    #[test]
    fn documents_round_trip_through_the_directory() {
        let dir = std::env::temp_dir().join(format!("vantage-config-{}", std::process::id()));
        let store = FsConfigStore::at(&dir).unwrap();
        assert!(matches!(store.load_raw("absent"), Err(ConfigError::NotFound)));

        let service = ConfigService::new(store);
        let custom = ClientConfig {
            request_timeout_ms: 1_500,
            ..ClientConfig::default()
        };
        service.save(CLIENT_CONFIG_KEY, &custom).unwrap();
        assert!(dir.join("client.json").is_file());
        assert!(!dir.join("client.json.tmp").exists());
        assert_eq!(ClientConfig::load_or_default(&service), custom);
        let _ = fs::remove_dir_all(dir);
    }
}
