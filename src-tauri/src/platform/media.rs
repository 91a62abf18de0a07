//! Photo library and camera surface.
//!
//! Platform implementations:
//! - Library picks go through the host's image picker (dialog plugin on Tauri)
//! - Camera capture is driven by the frontend; the result comes back to Rust
//!   through [`CaptureBridge`]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use super::bridge::ReplySlot;
use super::Outcome;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Photo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryOptions {
    pub media_type: MediaType,
    pub max_width: u32,
    pub max_height: u32,
    pub selection_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CameraOptions {
    pub media_type: MediaType,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            media_type: MediaType::Photo,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaAsset {
    pub uri: String,
}

/// Trait for platform image library and camera pickers
#[async_trait]
pub trait MediaPicker: Send + Sync {
    /// Let the user choose one photo from the library
    async fn pick_from_library(&self, options: LibraryOptions) -> Outcome<MediaAsset>;

    /// Take a photo with the camera
    async fn capture_photo(&self, options: CameraOptions) -> Outcome<MediaAsset>;
}

/// Pending camera capture answered by the frontend. The camera is modal, so
/// at most one capture is outstanding.
pub type CaptureBridge = ReplySlot<Outcome<MediaAsset>>;

impl ReplySlot<Outcome<MediaAsset>> {
    pub fn camera() -> Self {
        Self::new("camera capture")
    }
}

/// Wait for a capture reply; a dropped request counts as cancelled
pub async fn wait_for_capture(rx: oneshot::Receiver<Outcome<MediaAsset>>) -> Outcome<MediaAsset> {
    CaptureBridge::wait(rx).await.unwrap_or(Outcome::Cancelled)
}
