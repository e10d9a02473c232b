/// Errors that can occur during frame encoding, decoding, and scanning.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The input ended before the header's terminating byte.
    #[error("[byframe] data is not sufficient to construct the header")]
    HeaderInsufficient,

    /// The header is complete but the payload is truncated.
    #[error("[byframe] data is not sufficient to construct the body ({available} of {needed} bytes)")]
    Insufficient { needed: usize, available: usize },

    /// More than nine header bytes were seen without a terminator.
    #[error("[byframe] header is too long")]
    HeaderTooLarge,

    /// A frame (or its header) needs more buffer than the configured ceiling.
    #[error("[byframe] exceeded the limit ({limit} bytes)")]
    LimitExceeded { limit: usize },

    /// The length cannot be represented by a nine-byte header.
    #[error("[byframe] length {length} exceeds the maximum encodable length {max}")]
    LengthTooLarge { length: usize, max: usize },

    /// The byte source or sink failed.
    #[error("[byframe] I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// True for the kinds that only mean "more bytes are needed".
    ///
    /// A one-shot decode treats these as fatal; a streaming caller can keep
    /// reading and try again.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            FrameError::HeaderInsufficient | FrameError::Insufficient { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
