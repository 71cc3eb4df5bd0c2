use thiserror::Error;

/// Failure decoding a hex payload after whitespace is stripped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("payload is empty")]
    Empty,

    #[error("odd number of hex digits ({0})")]
    OddLength(usize),

    #[error("invalid hex character {character:?} at digit {position}")]
    InvalidCharacter { character: char, position: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to decode patch '{patch}': {source}")]
    Decode {
        patch: String,
        #[source]
        source: HexError,
    },

    #[error(
        "Patch '{patch}' writes {len} bytes at {address} (0x{address:X}), outside image of {image_len} bytes"
    )]
    OutOfBounds {
        patch: String,
        address: i128,
        len: usize,
        image_len: usize,
    },

    #[error("Patch not found in library: {0}")]
    PatchNotFound(String),

    #[error("Invalid feature request: {0}")]
    InvalidRequest(String),

    #[error("Invalid patch library: {0}")]
    InvalidLibrary(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Name of the patch or feature step that failed, if the error carries one
    pub fn patch_name(&self) -> Option<&str> {
        match self {
            Error::Decode { patch, .. } | Error::OutOfBounds { patch, .. } => Some(patch),
            Error::PatchNotFound(name) => Some(name),
            _ => None,
        }
    }
}
