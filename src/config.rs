use crate::app_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// last name played under
    pub player_name: Option<String>,
    /// JSON catalog to play with instead of the built-in one
    pub catalog_path: Option<PathBuf>,
    pub scores_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

/// Stores `player` as the remembered name. Returns whether the config was rewritten.
pub fn remember_player<S: ConfigStore + ?Sized>(
    store: &S,
    cfg: &mut Config,
    player: &str,
) -> std::io::Result<bool> {
    let player = player.trim();
    if player.is_empty() || cfg.player_name.as_deref() == Some(player) {
        return Ok(false);
    }
    cfg.player_name = Some(player.to_string());
    store.save(cfg)?;
    Ok(true)
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring unreadable config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            player_name: Some("Ana".into()),
            catalog_path: Some(PathBuf::from("/tmp/villains.json")),
            scores_path: Some(PathBuf::from("/tmp/scores.txt")),
            log_path: None,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"player_name":"Beto"}"#).unwrap();
        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.player_name.as_deref(), Some("Beto"));
        assert_eq!(loaded.scores_path, None);
    }

    #[test]
    fn name_typed_in_game_is_remembered() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("quien").join("config.json"));
        let mut cfg = store.load();
        assert_eq!(cfg.player_name, None);

        assert!(remember_player(&store, &mut cfg, " Zed ").unwrap());
        assert_eq!(store.load().player_name.as_deref(), Some("Zed"));

        // same name again does not rewrite
        assert!(!remember_player(&store, &mut cfg, "Zed").unwrap());
        assert!(remember_player(&store, &mut cfg, "Ana").unwrap());
        assert_eq!(store.load().player_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn blank_player_is_not_remembered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let mut cfg = Config::default();

        assert!(!remember_player(&store, &mut cfg, "  ").unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_config_loads_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{{{").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }
}
