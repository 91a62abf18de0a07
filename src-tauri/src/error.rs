//! Error type shared by the file actions and the platform file services.

use std::fmt;

/// Error type for file bridge operations
#[derive(Debug)]
pub enum FsError {
    /// Reading or writing a file failed
    Io(std::io::Error),
    /// Storage permission was not granted
    PermissionDenied,
    /// Picked file does not hold a transaction we can import
    InvalidTransactionFile,
    /// No QR code found in the image (carries the localized message)
    QrNotFound(String),
    /// Platform collaborator failed with message
    Platform(String),
    /// Configuration could not be parsed
    Config(String),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "File I/O error: {}", err),
            Self::PermissionDenied => write!(f, "Storage permission denied"),
            Self::InvalidTransactionFile => {
                write!(f, "File does not contain a valid signed transaction")
            }
            Self::QrNotFound(msg) => write!(f, "{}", msg),
            Self::Platform(msg) => write!(f, "Platform error: {}", msg),
            Self::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<FsError> for String {
    fn from(err: FsError) -> Self {
        err.to_string()
    }
}
