use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "coreup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppPathsError {
    #[error("Could not determine home directory")]
    HomeDirUnavailable,
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,
    #[error("Could not determine cache directory")]
    CacheDirUnavailable,
    #[error("Could not determine data directory")]
    DataDirUnavailable,
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Build application paths for the current platform.
    ///
    /// # Errors
    /// Returns an error when a required base directory (for example the user
    /// home/config/cache/data directory) cannot be determined.
    pub fn new() -> Result<Self, AppPathsError> {
        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().ok_or(AppPathsError::HomeDirUnavailable)?;
            Ok(Self {
                config_dir: home.join("Library/Application Support").join(APP_DIR),
                cache_dir: home.join("Library/Caches").join(APP_DIR),
                data_dir: home.join("Library/Application Support").join(APP_DIR),
            })
        }

        #[cfg(not(target_os = "macos"))]
        {
            Ok(Self {
                config_dir: dirs::config_dir()
                    .ok_or(AppPathsError::ConfigDirUnavailable)?
                    .join(APP_DIR),
                cache_dir: dirs::cache_dir()
                    .ok_or(AppPathsError::CacheDirUnavailable)?
                    .join(APP_DIR),
                data_dir: dirs::data_dir()
                    .ok_or(AppPathsError::DataDirUnavailable)?
                    .join(APP_DIR),
            })
        }
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Default location of the list of tracked cores.
    #[must_use]
    pub fn cores_file(&self) -> PathBuf {
        self.config_dir.join("cores.json")
    }

    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("coreup.log")
    }

    #[must_use]
    pub fn lock_file(&self) -> PathBuf {
        self.data_dir.join("coreup.lock")
    }

    /// Ensure all application directories exist on disk.
    ///
    /// # Errors
    /// Returns an error if any directory cannot be created.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Paths rooted under a single directory, for tests and portable installs.
    #[must_use]
    pub fn rooted_at(root: &std::path::Path) -> Self {
        Self {
            config_dir: root.join("config"),
            cache_dir: root.join("cache"),
            data_dir: root.join("data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::AppPaths;

    #[test]
    fn file_paths_use_expected_filenames() {
        let paths = AppPaths::rooted_at(Path::new("/portable"));

        assert!(paths.settings_file().ends_with(Path::new("config").join("settings.json")));
        assert!(paths.cores_file().ends_with(Path::new("config").join("cores.json")));
        assert!(paths.log_file().ends_with(Path::new("data").join("coreup.log")));
        assert!(paths.lock_file().ends_with(Path::new("data").join("coreup.lock")));
    }

    #[test]
    fn ensure_dirs_creates_all_directories() {
        let temp = tempfile_root();
        let paths = AppPaths::rooted_at(&temp);

        paths
            .ensure_dirs()
            .expect("ensure_dirs should create application directories");

        assert!(paths.config_dir.is_dir());
        assert!(paths.cache_dir.is_dir());
        assert!(paths.data_dir.is_dir());

        let _ = std::fs::remove_dir_all(temp);
    }

    #[test]
    fn platform_paths_end_in_app_directory() {
        if let Ok(paths) = AppPaths::new() {
            assert!(paths.config_dir.ends_with("coreup"));
            assert!(paths.data_dir.ends_with("coreup"));
        }
    }

    fn tempfile_root() -> std::path::PathBuf {
        use std::time::{SystemTime, UNIX_EPOCH};

        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "coreup-platform-paths-test-{}-{}",
            std::process::id(),
            nonce
        ))
    }
}
