use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Root the cores are installed into. Defaults to the working directory.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    #[serde(default)]
    pub cores_file: Option<PathBuf>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_api_base_url() -> String {
    coreup_github::DEFAULT_API_BASE_URL.to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_dir: None,
            cores_file: None,
            api_base_url: default_api_base_url(),
            http_timeout_secs: default_http_timeout(),
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl AppSettings {
    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or cannot be parsed.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|error| {
                eprintln!(
                    "Ignoring malformed settings file {}: {error}",
                    path.display()
                );
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppSettings;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let settings = AppSettings::load_from_path(&temp.path().join("settings.json"));
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.api_base_url, "https://api.github.com");
        assert_eq!(settings.http_timeout_secs, 30);
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{"base_dir": "/media/pocket", "debug_logging": true}"#)
            .expect("settings should be written");

        let settings = AppSettings::load_from_path(&path);
        assert_eq!(
            settings.base_dir.as_deref(),
            Some(std::path::Path::new("/media/pocket"))
        );
        assert!(settings.debug_logging);
        assert_eq!(settings.max_log_size_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "{not-json").expect("settings should be written");

        assert_eq!(AppSettings::load_from_path(&path), AppSettings::default());
    }
}
