//! Platform abstraction layer for the wallet's file and media surfaces.
//!
//! This module provides unified interfaces for OS collaborators:
//! - Files: sandboxed (iOS) and external-storage (Android) file services
//! - Pickers: document picker, photo library and camera
//! - Share: share sheet / save-to-files surface
//! - Alerts: message and permission dialogs
//! - QR: decoding a QR code from an image file
//!
//! Host APIs that report through callbacks are exposed as single-shot
//! async operations resolving to an [`Outcome`]. Surfaces the webview shows
//! answer through a [`ReplySlot`].

pub mod alerts;
pub mod bridge;
pub mod files;
pub mod media;
pub mod permissions;
pub mod picker;
pub mod qr;
pub mod share;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(feature = "app")]
pub mod dialog;

#[cfg(test)]
pub(crate) mod fakes;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use alerts::{AlertPresenter, PermissionAlertChoice};
pub use bridge::ReplySlot;
pub use files::{ExternalStorageFileService, PlatformFileService, SandboxedFileService};
pub use media::{CameraOptions, CaptureBridge, LibraryOptions, MediaAsset, MediaPicker};
pub use permissions::{
    PermissionBridge, PermissionRationale, PermissionStatus, PromptedStoragePermission,
    StoragePermission, StoragePermissionRequest,
};
pub use picker::{DocumentPicker, DocumentType, PickRequest, PickedDocument};
pub use qr::{QrImageDecoder, RqrrDecoder};
pub use share::{ShareRequest, ShareSheet};

/// Mobile platform the services are built for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Ios,
    Android,
}

/// Why a collaborator did not produce a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The user (or OS) refused the permission the surface needs
    PermissionDenied(String),
    /// The surface cannot serve the request right now
    Unavailable(String),
    Other(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            Self::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Result of a single-shot platform UI flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Cancelled,
    Failed(Failure),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Cancelled => Outcome::Cancelled,
            Self::Failed(failure) => Outcome::Failed(failure),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_serde_names() {
        assert_eq!(serde_json::to_string(&Platform::Ios).unwrap(), "\"ios\"");
        assert_eq!(
            serde_json::from_str::<Platform>("\"android\"").unwrap(),
            Platform::Android
        );
    }

    #[test]
    fn test_outcome_map_keeps_variant() {
        assert_eq!(Outcome::Success(2).map(|v| v * 2), Outcome::Success(4));
        assert!(Outcome::<u8>::Cancelled.map(|v| v + 1).is_cancelled());
        assert_eq!(
            Outcome::<u8>::Failed(Failure::Other("x".into())).map(|v| v + 1),
            Outcome::Failed(Failure::Other("x".into()))
        );
    }
}
