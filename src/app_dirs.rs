use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "quien";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/quien`, or the platform's local data dir when HOME is unset
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn scores_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("Scores").join("scores.txt"))
            .unwrap_or_else(|| PathBuf::from("Scores").join("scores.txt"))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("quien.log"))
            .unwrap_or_else(|| PathBuf::from("quien.log"))
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("quien_config.json"))
    }
}
