use std::path::{Path, PathBuf};

use async_trait::async_trait;
use coreup_core::{ArtifactInstaller, InstallError};
use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;

/// Name the archive is saved under while it is being unpacked.
pub const ARCHIVE_FILE_NAME: &str = "core.zip";

/// Downloads a zip archive and unpacks it over the install directory.
#[derive(Debug, Clone)]
pub struct ZipInstaller {
    http: reqwest::Client,
    install_dir: PathBuf,
}

impl ZipInstaller {
    #[must_use]
    pub fn new(http: reqwest::Client, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            install_dir: install_dir.into(),
        }
    }

    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Download `download_url`, extract it into the install directory and
    /// delete the downloaded archive.
    ///
    /// # Errors
    /// Returns an error when the download, the extraction, or the cleanup of
    /// the temporary directory fails.
    pub async fn download_and_extract(&self, download_url: &str) -> Result<(), InstallError> {
        tokio::fs::create_dir_all(&self.install_dir)
            .await
            .map_err(|error| {
                InstallError::io_with_path(
                    "failed to create install directory",
                    &self.install_dir,
                    &error,
                )
            })?;

        let temp_dir = tempfile::Builder::new()
            .prefix(".coreup-")
            .tempdir_in(&self.install_dir)
            .map_err(|error| InstallError::io("failed to create temp directory", &error))?;
        let download_path = temp_dir.path().join(ARCHIVE_FILE_NAME);

        info!("Downloading file {download_url}...");
        download_file(&self.http, download_url, &download_path).await?;

        info!("Extracting...");
        extract_zip(&download_path, &self.install_dir)?;

        temp_dir
            .close()
            .map_err(|error| InstallError::io("failed to remove downloaded archive", &error))?;
        info!("Installation complete.");
        Ok(())
    }
}

#[async_trait]
impl ArtifactInstaller for ZipInstaller {
    async fn install(&self, download_url: &str) -> Result<(), InstallError> {
        self.download_and_extract(download_url).await
    }
}

async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), InstallError> {
    use futures_util::StreamExt;

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, concat!("coreup/", env!("CARGO_PKG_VERSION")))
        .send()
        .await
        .map_err(|error| InstallError::download("download request failed", error))?;

    if !response.status().is_success() {
        return Err(InstallError::Invalid(format!(
            "Download failed with status {}",
            response.status()
        )));
    }

    let mut downloaded: u64 = 0;

    let mut file = tokio::fs::File::create(dest).await.map_err(|error| {
        InstallError::io_with_path("failed to create download file", dest, &error)
    })?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|error| InstallError::download("download stream error", error))?;
        file.write_all(&chunk).await.map_err(|error| {
            InstallError::io_with_path("failed to write download data", dest, &error)
        })?;
        downloaded += chunk.len() as u64;
    }

    file.flush().await.map_err(|error| {
        InstallError::io_with_path("failed to flush download file", dest, &error)
    })?;

    debug!("Download complete: {downloaded} bytes");
    Ok(())
}

fn extract_zip(zip_path: &Path, dest: &Path) -> Result<(), InstallError> {
    let file = std::fs::File::open(zip_path).map_err(|error| {
        InstallError::io_with_path("failed to open zip file", zip_path, &error)
    })?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|error| InstallError::archive("failed to read zip archive", error))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|error| InstallError::archive("failed to read zip entry", error))?;
        let Some(name) = entry.enclosed_name() else {
            warn!("Skipping zip entry with unsafe path");
            continue;
        };
        let out_path = dest.join(name);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|error| {
                InstallError::io_with_path("failed to create extraction directory", &out_path, &error)
            })?;
        } else {
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(|error| {
                    InstallError::io_with_path(
                        "failed to create extraction parent directory",
                        parent,
                        &error,
                    )
                })?;
            }
            let mut outfile = std::fs::File::create(&out_path).map_err(|error| {
                InstallError::io_with_path("failed to create extracted file", &out_path, &error)
            })?;
            std::io::copy(&mut entry, &mut outfile).map_err(|error| {
                InstallError::io_with_path("failed to extract archive entry", &out_path, &error)
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    let _ =
                        std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode));
                }
            }
        }
    }

    debug!("Extraction complete to {}", dest.display());
    Ok(())
}
