//! Runtime configuration for the file bridge.
//!
//! The platform variant is chosen once from [`FsConfig::platform`] when the
//! services are built. Everything else has a sensible default, so an empty
//! JSON object is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::FsError;
use crate::platform::Platform;

/// Android API level from which WRITE_EXTERNAL_STORAGE is no longer needed
pub const ANDROID_PERMISSION_EXEMPT_SDK: u32 = 33;

/// Bounds applied to photo library picks
pub const LIBRARY_MAX_WIDTH: u32 = 600;
pub const LIBRARY_MAX_HEIGHT: u32 = 800;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    pub platform: Platform,
    /// Offer "save to files" on the share surface
    pub is_desktop: bool,
    /// Android API level of the running device (ignored on iOS)
    pub android_sdk_version: u32,
    pub android_permission_exempt_sdk: u32,
    pub library_max_width: u32,
    pub library_max_height: u32,
    /// Reject transaction files whose text content is not base64 PSBT
    pub strict_transaction_files: bool,
    pub temp_dir: Option<PathBuf>,
    pub documents_dir: Option<PathBuf>,
    pub messages: Messages,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Ios,
            is_desktop: false,
            android_sdk_version: 0,
            android_permission_exempt_sdk: ANDROID_PERMISSION_EXEMPT_SDK,
            library_max_width: LIBRARY_MAX_WIDTH,
            library_max_height: LIBRARY_MAX_HEIGHT,
            strict_transaction_files: false,
            temp_dir: None,
            documents_dir: None,
            messages: Messages::default(),
        }
    }
}

impl FsConfig {
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, FsError> {
        serde_json::from_str(json).map_err(|e| FsError::Config(e.to_string()))
    }

    /// Fill in the platform and OS version from the running host. Every
    /// host other than Android, desktop included, uses the sandboxed (iOS)
    /// file service.
    #[cfg(feature = "app")]
    pub fn detect() -> Self {
        let platform = match tauri_plugin_os::platform() {
            "android" => Platform::Android,
            _ => Platform::Ios,
        };

        let android_sdk_version = if platform == Platform::Android {
            detect_android_sdk()
        } else {
            0
        };

        tracing::info!(
            "Detected platform {:?} (android sdk {})",
            platform,
            android_sdk_version
        );

        Self {
            platform,
            is_desktop: cfg!(desktop),
            android_sdk_version,
            ..Self::default()
        }
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.documents_dir
            .clone()
            .or_else(dirs::document_dir)
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(feature = "app")]
fn detect_android_sdk() -> u32 {
    #[cfg(target_os = "android")]
    {
        match crate::platform::android::sdk_version() {
            Ok(sdk) => return sdk,
            Err(e) => tracing::warn!("Falling back to release version for SDK level: {}", e),
        }
    }

    android_sdk_from_version(&tauri_plugin_os::version().to_string())
}

/// Map an Android release ("13", "12.1.0") to its API level
#[cfg_attr(not(feature = "app"), allow(dead_code))]
fn android_sdk_from_version(release: &str) -> u32 {
    let mut parts = release.split('.');
    let major: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minor: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

    match (major, minor) {
        (0, _) => 0,
        (m, _) if m >= 13 => m + 20,
        (12, 1..) => 32,
        (12, _) => 31,
        (11, _) => 30,
        (10, _) => 29,
        (9, _) => 28,
        (8, 1..) => 27,
        (8, _) => 26,
        _ => 25,
    }
}

/// User-facing strings shown by the alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub permission_storage_title: String,
    pub permission_storage_message: String,
    pub permission_storage_later: String,
    pub permission_storage_denied_message: String,
    pub open_settings: String,
    pub cancel: String,
    pub ok: String,
    pub details_no_signed_tx: String,
    pub qr_error_no_qrcode: String,
    pub camera_not_authorized_title: String,
    pub camera_not_authorized_message: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            permission_storage_title: "Storage Access Permission".to_string(),
            permission_storage_message:
                "The wallet needs your permission to access your storage to save this file."
                    .to_string(),
            permission_storage_later: "Ask Me Later".to_string(),
            permission_storage_denied_message:
                "The wallet is unable to save this file. Please open your device settings and enable Storage Permission."
                    .to_string(),
            open_settings: "Open Settings".to_string(),
            cancel: "Cancel".to_string(),
            ok: "OK".to_string(),
            details_no_signed_tx:
                "The selected file doesn't contain a transaction that can be imported.".to_string(),
            qr_error_no_qrcode:
                "We were unable to find a QR Code in the selected image. Make sure the image contains only a QR Code and no additional content such as text, or buttons."
                    .to_string(),
            camera_not_authorized_title: "Camera Not Authorized".to_string(),
            camera_not_authorized_message:
                "Allow camera access in your device settings to scan QR codes.".to_string(),
        }
    }
}
