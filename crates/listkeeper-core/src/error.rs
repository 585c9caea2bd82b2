//! Error types for listkeeper-core

use thiserror::Error;

/// Main error type for listkeeper-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A list/key lookup matched zero rows. The message doubles as the
    /// user-facing reply text.
    #[error("List is empty")]
    EmptyList,

    #[error("QR encoding error: {0}")]
    QrEncoding(#[from] qrcode::types::QrError),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for listkeeper-core
pub type Result<T> = std::result::Result<T, Error>;
