//! Android-style file service backed by shared storage.
//!
//! Writing needs WRITE_EXTERNAL_STORAGE up to Android 12. From API 33 the
//! permission no longer exists and the prompt always reports a denial, so the
//! export goes ahead regardless of the answer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::{export_path, read_local, remove_local, write_local, PlatformFileService};
use crate::config::FsConfig;
use crate::error::FsError;
use crate::platform::{PermissionRationale, Platform, StoragePermission};
use crate::uri;

pub struct ExternalStorageFileService {
    documents_dir: PathBuf,
    permission: Arc<dyn StoragePermission>,
    rationale: PermissionRationale,
    sdk_version: u32,
    permission_exempt_sdk: u32,
}

impl ExternalStorageFileService {
    pub fn new(documents_dir: PathBuf, permission: Arc<dyn StoragePermission>, config: &FsConfig) -> Self {
        Self {
            documents_dir,
            permission,
            rationale: PermissionRationale::storage(&config.messages),
            sdk_version: config.android_sdk_version,
            permission_exempt_sdk: config.android_permission_exempt_sdk,
        }
    }

    fn is_permission_exempt(&self) -> bool {
        self.sdk_version >= self.permission_exempt_sdk
    }
}

#[async_trait]
impl PlatformFileService for ExternalStorageFileService {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    async fn prepare_export(&self, filename: &str) -> Result<PathBuf, FsError> {
        let status = self.permission.request(&self.rationale).await;

        if !status.is_granted() && !self.is_permission_exempt() {
            tracing::warn!("Storage Permission: {:?} (sdk {})", status, self.sdk_version);
            return Err(FsError::PermissionDenied);
        }

        export_path(&self.documents_dir, filename)
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        write_local(path, contents).await
    }

    async fn read(&self, uri: &str) -> Result<Vec<u8>, FsError> {
        if uri::is_content_uri(uri) {
            return read_content_uri(uri).await;
        }
        read_local(uri).await
    }

    async fn read_outside_sandbox(&self, path: &str) -> Result<Vec<u8>, FsError> {
        self.read(path).await
    }

    async fn display_name(&self, uri: &str) -> Option<String> {
        if uri::is_content_uri(uri) {
            if let Some(name) = query_display_name(uri).await {
                return Some(name);
            }
        }
        uri::file_name(uri)
    }

    async fn remove(&self, path: &Path) {
        remove_local(path).await
    }
}

#[cfg(target_os = "android")]
async fn read_content_uri(uri: &str) -> Result<Vec<u8>, FsError> {
    let uri = uri.to_string();
    tokio::task::spawn_blocking(move || crate::platform::android::read_content_uri(&uri))
        .await
        .map_err(|e| FsError::Platform(format!("Content read task failed: {}", e)))?
}

#[cfg(not(target_os = "android"))]
async fn read_content_uri(uri: &str) -> Result<Vec<u8>, FsError> {
    Err(FsError::Platform(format!(
        "Content URIs can only be read on Android: {}",
        uri
    )))
}

#[cfg(target_os = "android")]
async fn query_display_name(uri: &str) -> Option<String> {
    let uri = uri.to_string();
    let result =
        tokio::task::spawn_blocking(move || crate::platform::android::query_display_name(&uri))
            .await;

    match result {
        Ok(Ok(name)) => name,
        Ok(Err(e)) => {
            tracing::warn!("Display name lookup failed: {}", e);
            None
        }
        Err(e) => {
            tracing::warn!("Display name task failed: {}", e);
            None
        }
    }
}

#[cfg(not(target_os = "android"))]
async fn query_display_name(_uri: &str) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fakes::FakePermission;
    use crate::platform::PermissionStatus;

    fn service(dir: &Path, status: PermissionStatus, sdk: u32) -> (ExternalStorageFileService, Arc<FakePermission>) {
        let permission = Arc::new(FakePermission::new(status));
        let config = FsConfig {
            platform: Platform::Android,
            android_sdk_version: sdk,
            ..FsConfig::default()
        };
        let service = ExternalStorageFileService::new(dir.to_path_buf(), permission.clone(), &config);
        (service, permission)
    }

    #[tokio::test]
    async fn test_granted_permission_exports_to_documents() {
        let dir = tempfile::tempdir().unwrap();
        let (service, permission) = service(dir.path(), PermissionStatus::Granted, 30);

        let path = service.prepare_export("tx.psbt").await.unwrap();
        assert_eq!(path, dir.path().join("tx.psbt"));
        assert_eq!(permission.requests(), 1);
    }

    #[tokio::test]
    async fn test_denied_permission_below_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service(dir.path(), PermissionStatus::Denied, 32);

        let result = service.prepare_export("tx.psbt").await;
        assert!(matches!(result, Err(FsError::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_never_ask_again_on_android_13_still_exports() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service(dir.path(), PermissionStatus::NeverAskAgain, 33);

        assert!(service.prepare_export("tx.psbt").await.is_ok());
    }

    #[tokio::test]
    async fn test_prompt_uses_storage_rationale() {
        let dir = tempfile::tempdir().unwrap();
        let (service, permission) = service(dir.path(), PermissionStatus::Granted, 30);

        service.prepare_export("tx.psbt").await.unwrap();
        let rationale = permission.last_rationale().unwrap();
        assert_eq!(rationale.title, "Storage Access Permission");
        assert_eq!(rationale.button_negative, "Cancel");
    }

    #[cfg(not(target_os = "android"))]
    #[tokio::test]
    async fn test_content_uri_off_android_is_platform_error() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service(dir.path(), PermissionStatus::Granted, 30);

        let result = service.read("content://media/external/1").await;
        assert!(matches!(result, Err(FsError::Platform(_))));
    }
}
