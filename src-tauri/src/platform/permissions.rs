//! Storage permission prompt (Android WRITE_EXTERNAL_STORAGE).
//!
//! The runtime prompt needs an Activity result callback, so the frontend
//! shows it: [`PromptedStoragePermission`] emits a
//! [`StoragePermissionRequest`] and waits for the answer on a
//! [`PermissionBridge`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::bridge::ReplySlot;
use crate::config::Messages;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    NeverAskAgain,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// Text shown on the permission prompt, one label per button role
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PermissionRationale {
    pub title: String,
    pub message: String,
    pub button_neutral: String,
    pub button_negative: String,
    pub button_positive: String,
}

impl PermissionRationale {
    pub fn storage(messages: &Messages) -> Self {
        Self {
            title: messages.permission_storage_title.clone(),
            message: messages.permission_storage_message.clone(),
            button_neutral: messages.permission_storage_later.clone(),
            button_negative: messages.cancel.clone(),
            button_positive: messages.ok.clone(),
        }
    }
}

/// Trait for the platform storage permission prompt
#[async_trait]
pub trait StoragePermission: Send + Sync {
    /// Ask for write access to shared storage
    async fn request(&self, rationale: &PermissionRationale) -> PermissionStatus;
}

/// Payload of the `storage-permission-requested` event
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoragePermissionRequest {
    pub request_id: String,
    #[serde(flatten)]
    pub rationale: PermissionRationale,
}

pub type PermissionBridge = ReplySlot<PermissionStatus>;

impl ReplySlot<PermissionStatus> {
    pub fn storage_permission() -> Self {
        Self::new("storage permission prompt")
    }
}

type EmitRequest = dyn Fn(&StoragePermissionRequest) -> Result<(), String> + Send + Sync;

/// Permission prompt shown by the frontend and answered through a
/// [`PermissionBridge`]. A prompt that cannot be shown, or is abandoned,
/// counts as denied.
pub struct PromptedStoragePermission {
    bridge: Arc<PermissionBridge>,
    emit: Box<EmitRequest>,
}

impl PromptedStoragePermission {
    pub fn new(
        bridge: Arc<PermissionBridge>,
        emit: impl Fn(&StoragePermissionRequest) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            bridge,
            emit: Box::new(emit),
        }
    }
}

#[async_trait]
impl StoragePermission for PromptedStoragePermission {
    async fn request(&self, rationale: &PermissionRationale) -> PermissionStatus {
        let (request_id, rx) = match self.bridge.begin() {
            Ok(slot) => slot,
            Err(failure) => {
                tracing::warn!("Storage permission prompt unavailable: {}", failure);
                return PermissionStatus::Denied;
            }
        };

        let request = StoragePermissionRequest {
            request_id,
            rationale: rationale.clone(),
        };
        if let Err(e) = (self.emit)(&request) {
            tracing::warn!("Failed to show storage permission prompt: {}", e);
            return PermissionStatus::Denied;
        }

        PermissionBridge::wait(rx)
            .await
            .unwrap_or(PermissionStatus::Denied)
    }
}
