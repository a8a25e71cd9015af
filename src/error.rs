//! Error types for markup construction and rendering.

use thiserror::Error;

/// Errors that can surface while rendering markup.
///
/// Document construction itself is total; these only arise at the edges:
/// sinks that fail, raw bytes that are not UTF-8, a bad configuration, or a
/// document description that cannot be parsed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 in raw input at byte {offset}")]
    InvalidUtf8 {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::InvalidUtf8 {
            offset: err.valid_up_to(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
