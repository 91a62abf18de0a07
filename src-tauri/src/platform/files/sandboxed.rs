//! iOS-style sandboxed file service.
//!
//! Exports are staged in the temp directory and need no permission prompt.
//! Files outside the sandbox are reached through the security-scoped URL the
//! document picker handed to the host, which resolves to a readable path.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{export_path, read_local, remove_local, write_local, PlatformFileService};
use crate::error::FsError;
use crate::platform::Platform;

pub struct SandboxedFileService {
    temp_dir: PathBuf,
}

impl SandboxedFileService {
    pub fn new(temp_dir: PathBuf) -> Self {
        Self { temp_dir }
    }
}

#[async_trait]
impl PlatformFileService for SandboxedFileService {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    async fn prepare_export(&self, filename: &str) -> Result<PathBuf, FsError> {
        export_path(&self.temp_dir, filename)
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        write_local(path, contents).await
    }

    async fn read(&self, uri: &str) -> Result<Vec<u8>, FsError> {
        read_local(uri).await
    }

    async fn read_outside_sandbox(&self, path: &str) -> Result<Vec<u8>, FsError> {
        read_local(path).await
    }

    async fn remove(&self, path: &Path) {
        remove_local(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_export_goes_to_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let service = SandboxedFileService::new(dir.path().to_path_buf());

        let path = service.prepare_export("wallet.json").await.unwrap();
        assert_eq!(path, dir.path().join("wallet.json"));

        service.write(&path, b"{}").await.unwrap();
        assert_eq!(service.read(&path.display().to_string()).await.unwrap(), b"{}");

        service.remove(&path).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_read_outside_sandbox_missing_file() {
        let service = SandboxedFileService::new(std::env::temp_dir());
        let result = service.read_outside_sandbox("/no/such/file.psbt").await;
        assert!(matches!(result, Err(FsError::Io(_))));
    }

    #[tokio::test]
    async fn test_read_outside_sandbox_takes_path_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report%41.txt");
        std::fs::write(&path, b"as named").unwrap();

        let service = SandboxedFileService::new(std::env::temp_dir());
        let bytes = service
            .read_outside_sandbox(&path.display().to_string())
            .await
            .unwrap();
        assert_eq!(bytes, b"as named");
    }
}
