//! Share sheet / export surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Outcome;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareRequest {
    /// `file://` URI of the file to share
    pub url: String,
    /// Additionally offer "save to files" (desktop-style hosts)
    pub save_to_files: bool,
}

/// Trait for platform share surfaces
#[async_trait]
pub trait ShareSheet: Send + Sync {
    /// Present the share surface and wait until it is dismissed
    async fn share(&self, request: ShareRequest) -> Outcome<()>;
}
