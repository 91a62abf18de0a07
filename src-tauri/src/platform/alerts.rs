//! In-app alert dialogs. The only channel through which failures reach the user.

use async_trait::async_trait;

/// Button chosen on the storage-permission-denied alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAlertChoice {
    OpenSettings,
    Cancel,
}

/// Trait for platform alert presenters
#[async_trait]
pub trait AlertPresenter: Send + Sync {
    /// Plain message alert with a single OK button
    async fn show_message(&self, message: &str);

    /// Alert offering to open the OS settings screen
    async fn show_permission_denied(
        &self,
        title: &str,
        message: &str,
        open_settings_label: &str,
        cancel_label: &str,
    ) -> PermissionAlertChoice;

    /// Alert explaining that the camera may not be used
    async fn show_camera_not_authorized(&self, title: &str, message: &str);

    /// Jump to this app's page in the OS settings
    async fn open_settings(&self);
}
