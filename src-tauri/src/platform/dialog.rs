//! Tauri-backed platform collaborators.
//!
//! - Document picker, photo library, alerts and save-to-files use the dialog plugin
//! - Camera capture is delegated to the webview: Rust emits
//!   `camera-capture-requested` and the frontend answers through the
//!   `complete_camera_capture` command
//! - Picks that come back as `content://` URIs are copied into the cache
//!   directory under their display name before anything reads them
//! - Opening settings goes through JNI on Android and an
//!   `open-settings-requested` event elsewhere
//!
//! Dialog callbacks are bridged to single-shot futures with oneshot channels.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tauri_plugin_dialog::{DialogExt, FilePath, MessageDialogButtons, MessageDialogKind};
use tokio::sync::oneshot;

use super::files::copy_to_cache;
use super::media::wait_for_capture;
use super::{
    AlertPresenter, CameraOptions, CaptureBridge, DocumentPicker, DocumentType, Failure,
    LibraryOptions, MediaAsset, MediaPicker, Outcome, PermissionAlertChoice, PermissionRationale,
    PermissionStatus, PickRequest, PickedDocument, PlatformFileService, ShareRequest, ShareSheet,
    StoragePermission,
};
use crate::uri;

/// Payload of the `camera-capture-requested` event
#[derive(Debug, Clone, Serialize)]
pub struct CameraCaptureRequest {
    pub request_id: String,
    pub options: CameraOptions,
}

async fn wait_for<T>(rx: oneshot::Receiver<T>, what: &str) -> Result<T, Failure> {
    rx.await
        .map_err(|_| Failure::Other(format!("{} dialog closed without an answer", what)))
}

fn file_path_uri(path: &FilePath) -> String {
    match path {
        FilePath::Url(url) => url.to_string(),
        FilePath::Path(path) => uri::file_uri(path),
    }
}

fn mime_from_name(name: &str) -> Option<&'static str> {
    let extension = name.rsplit('.').next()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "json" => "application/json",
        "txt" => "text/plain",
        "psbt" | "txn" => "application/octet-stream",
        _ => return None,
    };
    Some(mime)
}

/// Document and photo picker backed by the dialog plugin
pub struct DialogPicker {
    app: AppHandle,
    files: Arc<dyn PlatformFileService>,
    cache_dir: PathBuf,
    capture: Arc<CaptureBridge>,
}

impl DialogPicker {
    pub fn new(
        app: AppHandle,
        files: Arc<dyn PlatformFileService>,
        cache_dir: PathBuf,
        capture: Arc<CaptureBridge>,
    ) -> Self {
        Self {
            app,
            files,
            cache_dir,
            capture,
        }
    }

    async fn pick(&self, types: &[DocumentType]) -> Result<Option<FilePath>, Failure> {
        let (tx, rx) = oneshot::channel();

        let mut dialog = self.app.dialog().file();
        for doc_type in types {
            let extensions = doc_type.extensions();
            if !extensions.is_empty() {
                dialog = dialog.add_filter(format!("{:?}", doc_type), extensions);
            }
        }

        dialog.pick_file(move |path| {
            let _ = tx.send(path);
        });

        wait_for(rx, "File").await
    }

    async fn cache(&self, source: &str) -> Result<String, Failure> {
        copy_to_cache(self.files.as_ref(), source, &self.cache_dir)
            .await
            .map(|copy| uri::file_uri(&copy))
            .map_err(|e| Failure::Other(format!("Failed to copy picked file: {}", e)))
    }

    /// Local `file://` URI for a picked asset; content URIs are cached first
    async fn localize(&self, source: String) -> Result<String, Failure> {
        if uri::is_content_uri(&source) {
            self.cache(&source).await
        } else {
            Ok(source)
        }
    }
}

#[async_trait]
impl DocumentPicker for DialogPicker {
    async fn pick_single(&self, request: PickRequest) -> Outcome<PickedDocument> {
        let picked = match self.pick(&request.types).await {
            Ok(Some(path)) => path,
            Ok(None) => return Outcome::Cancelled,
            Err(failure) => return Outcome::Failed(failure),
        };

        let uri = file_path_uri(&picked);
        let needs_copy = request.copy_to_cache || uri::is_content_uri(&uri);

        let file_copy_uri = if needs_copy {
            match self.cache(&uri).await {
                Ok(copy) => Some(copy),
                Err(failure) => return Outcome::Failed(failure),
            }
        } else {
            None
        };

        let local_name = file_copy_uri.as_deref().unwrap_or(&uri);
        let mime_type = mime_from_name(local_name).map(str::to_string);

        tracing::info!("Picked document ({:?})", mime_type);
        Outcome::Success(PickedDocument {
            uri,
            file_copy_uri,
            mime_type,
        })
    }
}

#[async_trait]
impl MediaPicker for DialogPicker {
    async fn pick_from_library(&self, options: LibraryOptions) -> Outcome<MediaAsset> {
        tracing::debug!(
            "Picking photo (max {}x{})",
            options.max_width,
            options.max_height
        );

        let picked = match self.pick(&[DocumentType::Images]).await {
            Ok(Some(path)) => path,
            Ok(None) => return Outcome::Cancelled,
            Err(failure) => return Outcome::Failed(failure),
        };

        match self.localize(file_path_uri(&picked)).await {
            Ok(uri) => Outcome::Success(MediaAsset { uri }),
            Err(failure) => Outcome::Failed(failure),
        }
    }

    async fn capture_photo(&self, options: CameraOptions) -> Outcome<MediaAsset> {
        let (request_id, rx) = match self.capture.begin() {
            Ok(slot) => slot,
            Err(failure) => return Outcome::Failed(failure),
        };

        let request = CameraCaptureRequest {
            request_id,
            options,
        };
        if let Err(e) = self.app.emit("camera-capture-requested", &request) {
            return Outcome::Failed(Failure::Other(format!("Failed to request capture: {}", e)));
        }

        match wait_for_capture(rx).await {
            Outcome::Success(asset) => match self.localize(asset.uri).await {
                Ok(uri) => Outcome::Success(MediaAsset { uri }),
                Err(failure) => Outcome::Failed(failure),
            },
            other => other,
        }
    }
}

/// Alerts rendered with native message dialogs
pub struct DialogAlerts {
    app: AppHandle,
    ok_label: String,
}

impl DialogAlerts {
    pub fn new(app: AppHandle, ok_label: String) -> Self {
        Self { app, ok_label }
    }

    async fn message(&self, title: Option<&str>, message: &str, kind: MessageDialogKind) {
        let (tx, rx) = oneshot::channel();

        let mut dialog = self
            .app
            .dialog()
            .message(message)
            .kind(kind)
            .buttons(MessageDialogButtons::OkCustom(self.ok_label.clone()));
        if let Some(title) = title {
            dialog = dialog.title(title);
        }
        dialog.show(move |_| {
            let _ = tx.send(());
        });

        let _ = wait_for(rx, "Message").await;
    }
}

#[async_trait]
impl AlertPresenter for DialogAlerts {
    async fn show_message(&self, message: &str) {
        self.message(None, message, MessageDialogKind::Error).await
    }

    async fn show_permission_denied(
        &self,
        title: &str,
        message: &str,
        open_settings_label: &str,
        cancel_label: &str,
    ) -> PermissionAlertChoice {
        let (tx, rx) = oneshot::channel();

        self.app
            .dialog()
            .message(message)
            .title(title)
            .kind(MessageDialogKind::Warning)
            .buttons(MessageDialogButtons::OkCancelCustom(
                open_settings_label.to_string(),
                cancel_label.to_string(),
            ))
            .show(move |open| {
                let _ = tx.send(open);
            });

        match wait_for(rx, "Permission").await {
            Ok(true) => PermissionAlertChoice::OpenSettings,
            _ => PermissionAlertChoice::Cancel,
        }
    }

    async fn show_camera_not_authorized(&self, title: &str, message: &str) {
        self.message(Some(title), message, MessageDialogKind::Warning)
            .await
    }

    async fn open_settings(&self) {
        #[cfg(target_os = "android")]
        {
            if let Err(e) = super::android::open_app_settings() {
                tracing::warn!("Failed to open settings: {}", e);
            }
        }

        #[cfg(not(target_os = "android"))]
        {
            if let Err(e) = self.app.emit("open-settings-requested", ()) {
                tracing::warn!("Failed to request settings: {}", e);
            }
        }
    }
}

/// "Save to files" export: asks for a destination and copies the file there
pub struct DialogSaveShare {
    app: AppHandle,
}

impl DialogSaveShare {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

#[async_trait]
impl ShareSheet for DialogSaveShare {
    async fn share(&self, request: ShareRequest) -> Outcome<()> {
        let source = uri::to_local_path(&request.url);
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (tx, rx) = oneshot::channel();
        self.app
            .dialog()
            .file()
            .set_file_name(file_name)
            .save_file(move |path| {
                let _ = tx.send(path);
            });

        let destination = match wait_for(rx, "Save").await {
            Ok(Some(FilePath::Path(path))) => path,
            Ok(Some(FilePath::Url(url))) => {
                return Outcome::Failed(Failure::Unavailable(format!(
                    "Cannot save to {}",
                    url
                )))
            }
            Ok(None) => return Outcome::Cancelled,
            Err(failure) => return Outcome::Failed(failure),
        };

        match tokio::fs::copy(&source, &destination).await {
            Ok(bytes) => {
                tracing::info!("Exported {} bytes to {}", bytes, destination.display());
                Outcome::Success(())
            }
            Err(e) => Outcome::Failed(Failure::Other(format!("Failed to save file: {}", e))),
        }
    }
}

/// Desktop hosts write anywhere the user can; there is nothing to ask for
pub struct DesktopStoragePermission;

#[async_trait]
impl StoragePermission for DesktopStoragePermission {
    async fn request(&self, _rationale: &PermissionRationale) -> PermissionStatus {
        PermissionStatus::Granted
    }
}
