use std::io;
use thiserror::Error;

/// Errors produced while encoding/decoding blocks or probing library files.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed block: {0}")]
    MalformedBlock(String),

    #[error("Payload of {payload_len} bytes does not fit a 9-digit block header")]
    SizeOverflow { payload_len: usize },

    #[error("Not an executable: {0}")]
    NotExecutable(String),

    #[error("Architecture probing is not supported on {0}")]
    UnsupportedPlatform(String),

    #[error("External tool `{tool}` failed: {reason}")]
    ExternalToolFailure { tool: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
