//! Platform file services.
//!
//! Platform implementations:
//! - iOS: [`SandboxedFileService`], exports from the temp directory, no prompt
//! - Android: [`ExternalStorageFileService`], asks for storage permission and
//!   exports from the documents directory
//!
//! The variant is chosen once from the configured [`Platform`] by
//! [`for_config`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::{Platform, StoragePermission};
use crate::config::FsConfig;
use crate::error::FsError;
use crate::uri;

mod external;
mod sandboxed;

pub use external::ExternalStorageFileService;
pub use sandboxed::SandboxedFileService;

/// Trait for platform-specific file access
#[async_trait]
pub trait PlatformFileService: Send + Sync {
    fn platform(&self) -> Platform;

    /// Obtain whatever access is needed and return where `filename` should be
    /// written for export. `FsError::PermissionDenied` means nothing may be
    /// written.
    async fn prepare_export(&self, filename: &str) -> Result<PathBuf, FsError>;

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError>;

    /// Read a picked file (`file://` URI, content URI or plain path)
    async fn read(&self, uri: &str) -> Result<Vec<u8>, FsError>;

    /// Read a file the user granted access to outside the app sandbox
    async fn read_outside_sandbox(&self, path: &str) -> Result<Vec<u8>, FsError>;

    /// Name the user sees for a picked file; the last URI segment by default
    async fn display_name(&self, uri: &str) -> Option<String> {
        uri::file_name(uri)
    }

    /// Remove an exported file; failures are logged, not returned
    async fn remove(&self, path: &Path);
}

/// Build the file service variant for the configured platform
pub fn for_config(
    config: &FsConfig,
    permission: Arc<dyn StoragePermission>,
) -> Arc<dyn PlatformFileService> {
    match config.platform {
        Platform::Ios => Arc::new(SandboxedFileService::new(config.temp_dir())),
        Platform::Android => Arc::new(ExternalStorageFileService::new(
            config.documents_dir(),
            permission,
            config,
        )),
    }
}

/// Copy a picked file into `cache_dir` under its display name, so later
/// steps see a local file with its real extension
pub async fn copy_to_cache(
    files: &dyn PlatformFileService,
    uri: &str,
    cache_dir: &Path,
) -> Result<PathBuf, FsError> {
    let name = files
        .display_name(uri)
        .await
        .ok_or_else(|| FsError::Platform(format!("Picked file has no name: {}", uri)))?;
    let target = export_path(cache_dir, &name)?;

    let bytes = files.read(uri).await?;
    write_local(&target, &bytes).await?;
    tracing::debug!("Cached picked file as {}", target.display());
    Ok(target)
}

/// Join `filename` to `dir`, refusing names that would escape it
pub(crate) fn export_path(dir: &Path, filename: &str) -> Result<PathBuf, FsError> {
    let name = Path::new(filename);
    let is_plain = name.components().count() == 1
        && matches!(name.components().next(), Some(std::path::Component::Normal(_)));

    if filename.is_empty() || !is_plain {
        return Err(FsError::Platform(format!("Invalid file name: {}", filename)));
    }
    Ok(dir.join(name))
}

/// Read a local file given a `file://` URI or a plain path
pub(crate) async fn read_local(uri: &str) -> Result<Vec<u8>, FsError> {
    let path = uri::to_local_path(uri);
    let bytes = tokio::fs::read(&path).await?;
    tracing::info!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

pub(crate) async fn write_local(path: &Path, contents: &[u8]) -> Result<(), FsError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    tracing::info!("File saved to {}", path.display());
    Ok(())
}

pub(crate) async fn remove_local(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("Failed to remove {}: {}", path.display(), e);
    }
}
