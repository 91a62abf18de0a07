//! Helpers for the `file://` URIs handed back by pickers and cameras.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub const FILE_SCHEME: &str = "file://";

/// Percent-decode a picked URI, keeping the input when it is not valid UTF-8
pub fn decode_uri(uri: &str) -> Cow<'_, str> {
    urlencoding::decode(uri).unwrap_or(Cow::Borrowed(uri))
}

/// Remove a leading `file://`, if any
pub fn strip_file_scheme(uri: &str) -> &str {
    uri.strip_prefix(FILE_SCHEME).unwrap_or(uri)
}

/// Local filesystem path for a picked `file://` URI or a plain path.
/// Only URIs are percent-decoded; a plain path is taken as written.
pub fn to_local_path(uri: &str) -> PathBuf {
    match uri.strip_prefix(FILE_SCHEME) {
        Some(path) => PathBuf::from(decode_uri(path).into_owned()),
        None => PathBuf::from(uri),
    }
}

/// `file://` URI for a local path, percent-encoding each path segment
pub fn file_uri(path: &Path) -> String {
    let path = path.to_string_lossy();
    let encoded: Vec<_> = path.split('/').map(urlencoding::encode).collect();
    format!("{}{}", FILE_SCHEME, encoded.join("/"))
}

/// Last path segment of a URI, percent-decoded
pub fn file_name(uri: &str) -> Option<String> {
    let without_query = uri.split(['?', '#']).next().unwrap_or(uri);
    let segment = without_query.rsplit('/').next()?;
    let name = decode_uri(segment).into_owned();
    (!name.is_empty()).then_some(name)
}

/// Case-insensitive check of the file extension at the end of a URI
pub fn has_extension(uri: &str, extension: &str) -> bool {
    let suffix = format!(".{}", extension.to_ascii_lowercase());
    uri.to_ascii_lowercase().ends_with(&suffix)
}

pub fn is_content_uri(uri: &str) -> bool {
    uri.starts_with("content://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_file_scheme() {
        assert_eq!(strip_file_scheme("file:///tmp/a.png"), "/tmp/a.png");
        assert_eq!(strip_file_scheme("/tmp/a.png"), "/tmp/a.png");
    }

    #[test]
    fn test_to_local_path_decodes_percent_escapes() {
        let path = to_local_path("file:///var/mobile/Caches/My%20Wallet.psbt");
        assert_eq!(path, PathBuf::from("/var/mobile/Caches/My Wallet.psbt"));
    }

    #[test]
    fn test_has_extension_is_case_insensitive() {
        assert!(has_extension("file:///x/SIGNED.PSBT", "psbt"));
        assert!(has_extension("file:///x/signed.psbt", "psbt"));
        assert!(!has_extension("file:///x/signed.psbt.txt", "psbt"));
        assert!(!has_extension("file:///x/psbt", "psbt"));
    }

    #[test]
    fn test_plain_path_is_not_percent_decoded() {
        assert_eq!(
            to_local_path("/x/report%41.txt"),
            PathBuf::from("/x/report%41.txt")
        );
    }

    #[test]
    fn test_file_uri() {
        assert_eq!(file_uri(Path::new("/tmp/tx.psbt")), "file:///tmp/tx.psbt");
        assert_eq!(
            file_uri(Path::new("/tmp/My Wallet%41.psbt")),
            "file:///tmp/My%20Wallet%2541.psbt"
        );
    }

    #[test]
    fn test_file_uri_resolves_back_to_the_same_path() {
        let path = Path::new("/cache/picked/report%41 (1).txt");
        assert_eq!(to_local_path(&file_uri(path)), path);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("file:///tmp/My%20Tx.psbt").as_deref(), Some("My Tx.psbt"));
        assert_eq!(
            file_name("content://com.android.providers.downloads.documents/document/42").as_deref(),
            Some("42")
        );
        assert_eq!(file_name("content://authority/"), None);
    }

    #[test]
    fn test_content_uri() {
        assert!(is_content_uri("content://com.android.providers/document/12"));
        assert!(!is_content_uri("file:///sdcard/tx.psbt"));
    }
}
