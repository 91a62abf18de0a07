//! QR-code decoding from a local image file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Failure, Outcome};

/// Trait for QR-from-image decoders
#[async_trait]
pub trait QrImageDecoder: Send + Sync {
    /// Decode the first QR code found in the image at `path`.
    /// `Outcome::Cancelled` is never returned; no code found is a failure.
    async fn decode(&self, path: &Path) -> Outcome<String>;
}

/// Decoder backed by `image` for loading and `rqrr` for detection
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_blocking(path: &Path) -> Result<String, String> {
        let luma = image::open(path)
            .map_err(|e| format!("Failed to open image: {}", e))?
            .to_luma8();

        let (width, height) = luma.dimensions();
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                luma.get_pixel(x as u32, y as u32).0[0]
            });

        let grids = prepared.detect_grids();
        tracing::debug!("Found {} QR grid(s) in {}", grids.len(), path.display());

        grids
            .iter()
            .find_map(|grid| grid.decode().ok().map(|(_, content)| content))
            .ok_or_else(|| "No QR code found".to_string())
    }
}

impl Default for RqrrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QrImageDecoder for RqrrDecoder {
    async fn decode(&self, path: &Path) -> Outcome<String> {
        let path: PathBuf = path.to_path_buf();

        let result = tokio::task::spawn_blocking(move || Self::decode_blocking(&path)).await;

        match result {
            Ok(Ok(text)) => Outcome::Success(text),
            Ok(Err(msg)) => Outcome::Failed(Failure::Other(msg)),
            Err(e) => Outcome::Failed(Failure::Other(format!("QR decode task failed: {}", e))),
        }
    }
}
