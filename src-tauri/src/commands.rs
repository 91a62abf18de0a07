//! Tauri commands exposing the file actions to the webview.

use std::sync::Arc;

use serde::Deserialize;
use tauri::State;

use crate::actions::{ExportOutcome, FileActions, PickedFile};
use crate::platform::{
    CaptureBridge, Failure, MediaAsset, Outcome, PermissionBridge, PermissionStatus,
};

pub type FileActionsState = Arc<FileActions>;
pub type CaptureState = Arc<CaptureBridge>;
pub type PermissionState = Arc<PermissionBridge>;

/// Write a file and present the share / save surface
#[tauri::command]
pub async fn write_file_and_export(
    actions: State<'_, FileActionsState>,
    filename: String,
    contents: String,
) -> Result<ExportOutcome, String> {
    tracing::info!(
        "write_file_and_export called for: {} (len: {})",
        filename,
        contents.len()
    );
    Ok(actions
        .write_file_and_export(&filename, contents.as_bytes())
        .await)
}

/// Pick a transaction file; resolves to base64 PSBT or null
#[tauri::command]
pub async fn open_signed_transaction(
    actions: State<'_, FileActionsState>,
) -> Result<Option<String>, String> {
    Ok(actions.open_signed_transaction().await)
}

#[tauri::command]
pub async fn show_file_picker_and_read_file(
    actions: State<'_, FileActionsState>,
) -> Result<PickedFile, String> {
    Ok(actions.show_file_picker_and_read_file().await)
}

#[tauri::command]
pub async fn show_image_picker_and_read_image(
    actions: State<'_, FileActionsState>,
) -> Result<Option<String>, String> {
    Ok(actions.show_image_picker_and_read_image().await?)
}

#[tauri::command]
pub async fn take_photo_and_read_qr(
    actions: State<'_, FileActionsState>,
) -> Result<Option<String>, String> {
    Ok(actions.take_photo_and_read_qr().await?)
}

/// Read a file outside the sandbox as text; invalid UTF-8 is replaced
#[tauri::command]
pub async fn read_file_outside_sandbox(
    actions: State<'_, FileActionsState>,
    path: String,
) -> Result<String, String> {
    let bytes = actions.read_file_outside_sandbox(&path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Frontend's answer to a `camera-capture-requested` event
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CameraCaptureResult {
    Captured { uri: String },
    Cancelled,
    NotAuthorized { reason: String },
    Error { message: String },
}

impl From<CameraCaptureResult> for Outcome<MediaAsset> {
    fn from(result: CameraCaptureResult) -> Self {
        match result {
            CameraCaptureResult::Captured { uri } => Outcome::Success(MediaAsset { uri }),
            CameraCaptureResult::Cancelled => Outcome::Cancelled,
            CameraCaptureResult::NotAuthorized { reason } => {
                Outcome::Failed(Failure::PermissionDenied(reason))
            }
            CameraCaptureResult::Error { message } => Outcome::Failed(Failure::Other(message)),
        }
    }
}

#[tauri::command]
pub fn complete_camera_capture(
    capture: State<'_, CaptureState>,
    request_id: String,
    result: CameraCaptureResult,
) -> Result<(), String> {
    if capture.complete(&request_id, result.into()) {
        Ok(())
    } else {
        Err(format!("No pending camera capture with id {}", request_id))
    }
}

/// Frontend's answer to a `storage-permission-requested` event
#[tauri::command]
pub fn complete_storage_permission(
    permission: State<'_, PermissionState>,
    request_id: String,
    status: PermissionStatus,
) -> Result<(), String> {
    tracing::info!("Storage permission answered: {:?}", status);
    if permission.complete(&request_id, status) {
        Ok(())
    } else {
        Err(format!("No pending permission prompt with id {}", request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_result_from_json() {
        let result: CameraCaptureResult =
            serde_json::from_str(r#"{"status":"captured","uri":"file:///tmp/a.jpg"}"#).unwrap();
        assert_eq!(
            Outcome::from(result),
            Outcome::Success(MediaAsset {
                uri: "file:///tmp/a.jpg".to_string()
            })
        );

        let result: CameraCaptureResult =
            serde_json::from_str(r#"{"status":"not_authorized","reason":"denied"}"#).unwrap();
        assert_eq!(
            Outcome::from(result),
            Outcome::Failed(Failure::PermissionDenied("denied".to_string()))
        );
    }

    #[test]
    fn test_permission_status_from_frontend() {
        let status: PermissionStatus = serde_json::from_str(r#""never_ask_again""#).unwrap();
        assert_eq!(status, PermissionStatus::NeverAskAgain);
    }
}
