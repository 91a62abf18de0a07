//! Document picker surface.
//!
//! Each platform names file types in its own vocabulary: iOS takes uniform
//! type identifiers, Android takes MIME types, desktop dialogs take
//! extensions. [`DocumentType`] carries all three.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Outcome, Platform};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Partially signed transaction
    Psbt,
    /// Signed transaction exported as `.txn`
    PsbtTxn,
    /// Wallet backup file
    Backup,
    PlainText,
    Json,
    Images,
    AllFiles,
}

impl DocumentType {
    /// Uniform type identifier used by the iOS document picker
    pub fn uti(self) -> &'static str {
        match self {
            Self::Psbt => "io.bluewallet.psbt",
            Self::PsbtTxn => "io.bluewallet.psbt.txn",
            Self::Backup => "io.bluewallet.backup",
            Self::PlainText => "public.plain-text",
            Self::Json => "public.json",
            Self::Images => "public.image",
            Self::AllFiles => "public.item",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Psbt | Self::PsbtTxn | Self::Backup => "application/octet-stream",
            Self::PlainText => "text/plain",
            Self::Json => "application/json",
            Self::Images => "image/*",
            Self::AllFiles => "*/*",
        }
    }

    /// Extensions for extension-filtered file dialogs (empty means any)
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Psbt => &["psbt"],
            Self::PsbtTxn => &["txn"],
            Self::Backup => &["json", "txt"],
            Self::PlainText => &["txt"],
            Self::Json => &["json"],
            Self::Images => &["png", "jpg", "jpeg", "gif", "bmp", "heic"],
            Self::AllFiles => &[],
        }
    }

    /// Identifier in the platform's own vocabulary
    pub fn identifier(self, platform: Platform) -> &'static str {
        match platform {
            Platform::Ios => self.uti(),
            Platform::Android => self.mime(),
        }
    }

    /// Whether a picked document's declared type is an image
    pub fn is_image_type(declared: &str) -> bool {
        declared == Self::Images.uti() || declared == Self::Images.mime() || declared.starts_with("image/")
    }
}

/// Types offered when importing a signed transaction
pub fn transaction_types(platform: Platform) -> Vec<DocumentType> {
    match platform {
        Platform::Ios => vec![DocumentType::Psbt, DocumentType::PsbtTxn],
        Platform::Android => vec![DocumentType::AllFiles],
    }
}

/// Types offered by the generic file picker
pub fn readable_types(platform: Platform) -> Vec<DocumentType> {
    match platform {
        Platform::Ios => vec![
            DocumentType::Psbt,
            DocumentType::PsbtTxn,
            DocumentType::Backup,
            DocumentType::PlainText,
            DocumentType::Json,
            DocumentType::Images,
        ],
        Platform::Android => vec![DocumentType::AllFiles],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    pub types: Vec<DocumentType>,
    /// Copy the picked file into the app's caches directory
    pub copy_to_cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickedDocument {
    pub uri: String,
    /// Local copy when the request asked for one
    pub file_copy_uri: Option<String>,
    /// Declared type (MIME type or UTI)
    pub mime_type: Option<String>,
}

impl PickedDocument {
    /// The URI to read from: the local copy if any, else the original
    pub fn readable_uri(&self) -> &str {
        self.file_copy_uri.as_deref().unwrap_or(&self.uri)
    }
}

/// Trait for platform document pickers
#[async_trait]
pub trait DocumentPicker: Send + Sync {
    /// Present the picker and wait for a single document
    async fn pick_single(&self, request: PickRequest) -> Outcome<PickedDocument>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_follow_platform_vocabulary() {
        assert_eq!(DocumentType::Psbt.identifier(Platform::Ios), "io.bluewallet.psbt");
        assert_eq!(DocumentType::AllFiles.identifier(Platform::Android), "*/*");
        assert_eq!(DocumentType::Json.identifier(Platform::Ios), "public.json");
    }

    #[test]
    fn test_android_pickers_accept_all_files() {
        assert_eq!(transaction_types(Platform::Android), vec![DocumentType::AllFiles]);
        assert_eq!(readable_types(Platform::Android), vec![DocumentType::AllFiles]);
        assert_eq!(readable_types(Platform::Ios).len(), 6);
    }

    #[test]
    fn test_is_image_type() {
        assert!(DocumentType::is_image_type("image/png"));
        assert!(DocumentType::is_image_type("public.image"));
        assert!(DocumentType::is_image_type("image/*"));
        assert!(!DocumentType::is_image_type("application/json"));
    }

    #[test]
    fn test_readable_uri_prefers_copy() {
        let mut doc = PickedDocument {
            uri: "content://docs/1".to_string(),
            file_copy_uri: Some("file:///cache/a.psbt".to_string()),
            mime_type: None,
        };
        assert_eq!(doc.readable_uri(), "file:///cache/a.psbt");
        doc.file_copy_uri = None;
        assert_eq!(doc.readable_uri(), "content://docs/1");
    }
}
