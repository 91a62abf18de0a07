//! File actions offered to the wallet screens.
//!
//! Each action drives one platform UI flow to completion and reports failures
//! through alerts. Cancellation is always silent. Nothing here keeps state
//! between calls.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::FsConfig;
use crate::error::FsError;
use crate::platform::picker::{readable_types, transaction_types};
use crate::platform::{
    AlertPresenter, CameraOptions, DocumentPicker, DocumentType, Failure, LibraryOptions,
    MediaPicker, Outcome, PermissionAlertChoice, PickRequest, PickedDocument,
    PlatformFileService, QrImageDecoder, ShareRequest, ShareSheet,
};
use crate::platform::media::MediaType;
use crate::psbt::{self, TransactionPayload};
use crate::uri;

/// Result of the generic file pick. Both fields are `None` when nothing
/// usable was read (cancelled, failed, or an image without a QR code).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickedFile {
    pub data: Option<String>,
    pub uri: Option<String>,
}

impl PickedFile {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum ExportOutcome {
    /// The share surface completed
    Shared,
    /// The share surface was dismissed or reported an error (logged only)
    NotShared,
    /// Storage permission denied; nothing was written
    PermissionDenied,
    Failed(String),
}

/// Platform collaborators the actions are composed from
#[derive(Clone)]
pub struct PlatformServices {
    pub files: Arc<dyn PlatformFileService>,
    pub share: Arc<dyn ShareSheet>,
    pub picker: Arc<dyn DocumentPicker>,
    pub media: Arc<dyn MediaPicker>,
    pub qr: Arc<dyn QrImageDecoder>,
    pub alerts: Arc<dyn AlertPresenter>,
}

pub struct FileActions {
    config: FsConfig,
    services: PlatformServices,
}

impl FileActions {
    pub fn new(config: FsConfig, services: PlatformServices) -> Self {
        Self { config, services }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Write `contents` to `filename` and present the share surface.
    /// The written file is removed once the share settles.
    pub async fn write_file_and_export(&self, filename: &str, contents: &[u8]) -> ExportOutcome {
        let files = &self.services.files;

        let path = match files.prepare_export(filename).await {
            Ok(path) => path,
            Err(FsError::PermissionDenied) => {
                self.alert_storage_denied().await;
                return ExportOutcome::PermissionDenied;
            }
            Err(e) => {
                tracing::error!("Export of {} failed: {}", filename, e);
                self.services.alerts.show_message(&e.to_string()).await;
                return ExportOutcome::Failed(e.to_string());
            }
        };

        if let Err(e) = files.write(&path, contents).await {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            self.services.alerts.show_message(&e.to_string()).await;
            return ExportOutcome::Failed(e.to_string());
        }

        let request = ShareRequest {
            url: uri::file_uri(&path),
            save_to_files: self.config.is_desktop,
        };

        let outcome = match self.services.share.share(request).await {
            Outcome::Success(()) => ExportOutcome::Shared,
            Outcome::Cancelled => {
                tracing::debug!("Share of {} dismissed", filename);
                ExportOutcome::NotShared
            }
            Outcome::Failed(failure) => {
                tracing::warn!("Share of {} failed: {}", filename, failure);
                ExportOutcome::NotShared
            }
        };

        files.remove(&path).await;
        outcome
    }

    async fn alert_storage_denied(&self) {
        let messages = &self.config.messages;
        let choice = self
            .services
            .alerts
            .show_permission_denied(
                &messages.permission_storage_title,
                &messages.permission_storage_denied_message,
                &messages.open_settings,
                &messages.cancel,
            )
            .await;

        if choice == PermissionAlertChoice::OpenSettings {
            self.services.alerts.open_settings().await;
        }
    }

    /// Let the user pick a transaction file and return its base64 PSBT.
    /// `None` if cancelled or unreadable; never errors.
    pub async fn open_signed_transaction(&self) -> Option<TransactionPayload> {
        let request = PickRequest {
            types: transaction_types(self.config.platform),
            copy_to_cache: false,
        };

        let result = match self.services.picker.pick_single(request).await {
            Outcome::Success(doc) => self.read_transaction(&doc.uri).await,
            Outcome::Cancelled => return None,
            Outcome::Failed(failure) => Err(FsError::Platform(failure.to_string())),
        };

        match result {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!("Signed transaction import failed: {}", e);
                self.services
                    .alerts
                    .show_message(&self.config.messages.details_no_signed_tx)
                    .await;
                None
            }
        }
    }

    async fn read_transaction(&self, uri: &str) -> Result<TransactionPayload, FsError> {
        let raw = self.services.files.read(uri).await?;
        psbt::read_transaction_file(&raw, self.config.strict_transaction_files)
    }

    /// Pick any supported file and read it. Transaction files come back as
    /// base64 PSBT, images as the text of the QR code they contain.
    pub async fn show_file_picker_and_read_file(&self) -> PickedFile {
        let request = PickRequest {
            types: readable_types(self.config.platform),
            copy_to_cache: true,
        };

        let result = match self.services.picker.pick_single(request).await {
            Outcome::Success(doc) => self.read_picked(&doc).await,
            Outcome::Cancelled => return PickedFile::empty(),
            Outcome::Failed(failure) => Err(FsError::Platform(failure.to_string())),
        };

        match result {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Reading picked file failed: {}", e);
                self.services.alerts.show_message(&e.to_string()).await;
                PickedFile::empty()
            }
        }
    }

    async fn read_picked(&self, doc: &PickedDocument) -> Result<PickedFile, FsError> {
        let source = doc.readable_uri();
        let decoded = uri::decode_uri(source).into_owned();

        if uri::has_extension(source, "psbt") {
            tracing::debug!("Picked file is a transaction file");
            let payload = self.read_transaction(source).await?;
            return Ok(PickedFile {
                data: Some(payload),
                uri: Some(decoded),
            });
        }

        let is_image = doc
            .mime_type
            .as_deref()
            .is_some_and(DocumentType::is_image_type);

        if is_image {
            tracing::debug!("Picked file is an image, looking for a QR code");
            return Ok(match self.services.qr.decode(&uri::to_local_path(source)).await {
                Outcome::Success(text) => PickedFile {
                    data: Some(text),
                    uri: Some(decoded),
                },
                _ => PickedFile::empty(),
            });
        }

        let raw = self.services.files.read(source).await?;
        let text = String::from_utf8_lossy(&raw).into_owned();
        Ok(PickedFile {
            data: Some(text),
            uri: Some(decoded),
        })
    }

    /// Pick a photo from the library and decode the QR code in it.
    /// `Ok(None)` when the user cancels.
    pub async fn show_image_picker_and_read_image(&self) -> Result<Option<String>, FsError> {
        let options = LibraryOptions {
            media_type: MediaType::Photo,
            max_width: self.config.library_max_width,
            max_height: self.config.library_max_height,
            selection_limit: 1,
        };

        match self.services.media.pick_from_library(options).await {
            Outcome::Success(asset) => self.decode_qr(&asset.uri).await.map(Some),
            Outcome::Cancelled => Ok(None),
            Outcome::Failed(failure) => Err(FsError::Platform(failure.to_string())),
        }
    }

    /// Take a photo and decode the QR code in it. `Ok(None)` when the user
    /// cancels or camera access is not authorized (an alert says so).
    pub async fn take_photo_and_read_qr(&self) -> Result<Option<String>, FsError> {
        match self.services.media.capture_photo(CameraOptions::default()).await {
            Outcome::Success(asset) => self.decode_qr(&asset.uri).await.map(Some),
            Outcome::Cancelled => Ok(None),
            Outcome::Failed(Failure::PermissionDenied(reason)) => {
                tracing::warn!("Camera not authorized: {}", reason);
                let messages = &self.config.messages;
                self.services
                    .alerts
                    .show_camera_not_authorized(
                        &messages.camera_not_authorized_title,
                        &messages.camera_not_authorized_message,
                    )
                    .await;
                Ok(None)
            }
            Outcome::Failed(failure) => Err(FsError::Platform(failure.to_string())),
        }
    }

    async fn decode_qr(&self, asset_uri: &str) -> Result<String, FsError> {
        match self.services.qr.decode(&uri::to_local_path(asset_uri)).await {
            Outcome::Success(text) => Ok(text),
            other => {
                tracing::debug!("No QR code in captured image: {:?}", other);
                Err(FsError::QrNotFound(self.config.messages.qr_error_no_qrcode.clone()))
            }
        }
    }

    /// Read a file outside the app sandbox with the platform's read primitive
    pub async fn read_file_outside_sandbox(&self, path: &str) -> Result<Vec<u8>, FsError> {
        self.services.files.read_outside_sandbox(path).await
    }
}
