//! In-memory collaborators for tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    files, AlertPresenter, CameraOptions, DocumentPicker, LibraryOptions, MediaAsset, MediaPicker,
    Outcome, PermissionAlertChoice, PermissionRationale, PermissionStatus, PickRequest,
    PickedDocument, Platform, PlatformFileService, QrImageDecoder, ShareRequest, ShareSheet,
    StoragePermission,
};
use crate::error::FsError;
use crate::uri;

pub struct FakePermission {
    status: PermissionStatus,
    requests: Mutex<Vec<PermissionRationale>>,
}

impl FakePermission {
    pub fn new(status: PermissionStatus) -> Self {
        Self {
            status,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_rationale(&self) -> Option<PermissionRationale> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StoragePermission for FakePermission {
    async fn request(&self, rationale: &PermissionRationale) -> PermissionStatus {
        self.requests.lock().unwrap().push(rationale.clone());
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertEvent {
    Message(String),
    PermissionDenied { title: String, message: String },
    CameraNotAuthorized(String),
    OpenSettings,
}

pub struct FakeAlerts {
    choice: PermissionAlertChoice,
    events: Mutex<Vec<AlertEvent>>,
}

impl FakeAlerts {
    pub fn new() -> Self {
        Self::choosing(PermissionAlertChoice::Cancel)
    }

    pub fn choosing(choice: PermissionAlertChoice) -> Self {
        Self {
            choice,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertPresenter for FakeAlerts {
    async fn show_message(&self, message: &str) {
        self.events.lock().unwrap().push(AlertEvent::Message(message.to_string()));
    }

    async fn show_permission_denied(
        &self,
        title: &str,
        message: &str,
        _open_settings_label: &str,
        _cancel_label: &str,
    ) -> PermissionAlertChoice {
        self.events.lock().unwrap().push(AlertEvent::PermissionDenied {
            title: title.to_string(),
            message: message.to_string(),
        });
        self.choice
    }

    async fn show_camera_not_authorized(&self, _title: &str, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(AlertEvent::CameraNotAuthorized(message.to_string()));
    }

    async fn open_settings(&self) {
        self.events.lock().unwrap().push(AlertEvent::OpenSettings);
    }
}

/// Share sheet that records what it was shown and whether the file existed
pub struct FakeShareSheet {
    outcome: Outcome<()>,
    shown: Mutex<Vec<(ShareRequest, Option<Vec<u8>>)>>,
}

impl FakeShareSheet {
    pub fn new(outcome: Outcome<()>) -> Self {
        Self {
            outcome,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<(ShareRequest, Option<Vec<u8>>)> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShareSheet for FakeShareSheet {
    async fn share(&self, request: ShareRequest) -> Outcome<()> {
        let contents = std::fs::read(uri::to_local_path(&request.url)).ok();
        self.shown.lock().unwrap().push((request, contents));
        self.outcome.clone()
    }
}

pub struct FakeDocumentPicker {
    outcome: Outcome<PickedDocument>,
    requests: Mutex<Vec<PickRequest>>,
}

impl FakeDocumentPicker {
    pub fn new(outcome: Outcome<PickedDocument>) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn picking(path: &Path, mime_type: Option<&str>) -> Self {
        Self::new(Outcome::Success(PickedDocument {
            uri: uri::file_uri(path),
            file_copy_uri: Some(uri::file_uri(path)),
            mime_type: mime_type.map(str::to_string),
        }))
    }

    pub fn requests(&self) -> Vec<PickRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentPicker for FakeDocumentPicker {
    async fn pick_single(&self, request: PickRequest) -> Outcome<PickedDocument> {
        self.requests.lock().unwrap().push(request);
        self.outcome.clone()
    }
}

pub struct FakeMediaPicker {
    library: Outcome<MediaAsset>,
    camera: Outcome<MediaAsset>,
    library_requests: Mutex<Vec<LibraryOptions>>,
}

impl FakeMediaPicker {
    pub fn new(library: Outcome<MediaAsset>, camera: Outcome<MediaAsset>) -> Self {
        Self {
            library,
            camera,
            library_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn library_requests(&self) -> Vec<LibraryOptions> {
        self.library_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaPicker for FakeMediaPicker {
    async fn pick_from_library(&self, options: LibraryOptions) -> Outcome<MediaAsset> {
        self.library_requests.lock().unwrap().push(options);
        self.library.clone()
    }

    async fn capture_photo(&self, _options: CameraOptions) -> Outcome<MediaAsset> {
        self.camera.clone()
    }
}

/// QR decoder that answers from a fixed result and records the paths it saw
pub struct FakeQrDecoder {
    result: Outcome<String>,
    paths: Mutex<Vec<PathBuf>>,
}

impl FakeQrDecoder {
    pub fn new(result: Outcome<String>) -> Self {
        Self {
            result,
            paths: Mutex::new(Vec::new()),
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl QrImageDecoder for FakeQrDecoder {
    async fn decode(&self, path: &Path) -> Outcome<String> {
        self.paths.lock().unwrap().push(path.to_path_buf());
        self.result.clone()
    }
}

/// File service that serves one `content://` document and writes locally
pub struct FakeContentFiles {
    uri: String,
    name: Option<String>,
    contents: Vec<u8>,
}

impl FakeContentFiles {
    pub fn new(uri: &str, name: Option<&str>, contents: &[u8]) -> Self {
        Self {
            uri: uri.to_string(),
            name: name.map(str::to_string),
            contents: contents.to_vec(),
        }
    }
}

#[async_trait]
impl PlatformFileService for FakeContentFiles {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    async fn prepare_export(&self, _filename: &str) -> Result<PathBuf, FsError> {
        Err(FsError::PermissionDenied)
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        files::write_local(path, contents).await
    }

    async fn read(&self, uri: &str) -> Result<Vec<u8>, FsError> {
        if uri == self.uri {
            return Ok(self.contents.clone());
        }
        files::read_local(uri).await
    }

    async fn read_outside_sandbox(&self, path: &str) -> Result<Vec<u8>, FsError> {
        self.read(path).await
    }

    async fn display_name(&self, uri: &str) -> Option<String> {
        match &self.name {
            Some(name) if uri == self.uri => Some(name.clone()),
            _ => uri::file_name(uri),
        }
    }

    async fn remove(&self, path: &Path) {
        files::remove_local(path).await
    }
}
