//! Filesystem side of coreup: reading what is installed under the base
//! directory and unpacking downloaded archives into it.

mod installer;
mod manifest_store;

pub use installer::{ARCHIVE_FILE_NAME, ZipInstaller};
pub use manifest_store::{CORES_DIR, FsManifestStore, MANIFEST_FILE};
