use std::path::{Path, PathBuf};

use coreup_core::PackageSpec;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoresError {
    #[error("Cores list not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read cores list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse cores list {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the ordered list of cores to track.
///
/// # Errors
/// Returns an error when the file does not exist, cannot be read, or is not a
/// JSON array of core entries.
pub fn load_cores(path: &Path) -> Result<Vec<PackageSpec>, CoresError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(CoresError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(CoresError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&data).map_err(|source| CoresError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{CoresError, load_cores};

    #[test]
    fn loads_entries_in_file_order() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let path = temp.path().join("cores.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "agg23.NES", "repo": {"user": "agg23", "project": "openfpga-NES"}, "allowPrerelease": false},
                {"repo": {"user": "spiritualized1997", "project": "openFPGA-GBA"}, "allowPrerelease": true}
            ]"#,
        )
        .expect("cores list should be written");

        let cores = load_cores(&path).expect("cores list should load");

        assert_eq!(cores.len(), 2);
        assert_eq!(cores[0].name.as_deref(), Some("agg23.NES"));
        assert_eq!(cores[1].name, None);
        assert_eq!(cores[1].repo.project, "openFPGA-GBA");
        assert!(cores[1].allow_prerelease);
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let path = temp.path().join("cores.json");

        let error = load_cores(&path).expect_err("missing file should fail");
        assert!(matches!(error, CoresError::NotFound(ref missing) if *missing == path));
        assert!(error.to_string().starts_with("Cores list not found: "));
    }

    #[test]
    fn non_list_is_a_parse_error() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let path = temp.path().join("cores.json");
        std::fs::write(&path, r#"{"repo": {"user": "u", "project": "p"}}"#)
            .expect("cores list should be written");

        assert!(matches!(load_cores(&path), Err(CoresError::Parse { .. })));
    }

    #[test]
    fn empty_list_is_valid() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let path = temp.path().join("cores.json");
        std::fs::write(&path, "[]").expect("cores list should be written");

        assert!(load_cores(&path).expect("empty list should load").is_empty());
    }
}
