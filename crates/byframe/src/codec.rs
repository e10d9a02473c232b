use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::header::{decode_header, encoded_len, Header, HeaderStatus};

/// Default ceiling for a single buffered frame: 16 MiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Total wire size of a frame carrying `payload_len` bytes.
pub fn frame_len(payload_len: usize) -> usize {
    encoded_len(payload_len) + payload_len
}

/// Encode a payload into a standalone frame.
///
/// Wire format:
/// ```text
/// ┌────────────────────┬─────────────────┐
/// │ Header (1-9B)      │ Payload          │
/// │ base-128 LE digits │ (Length bytes)   │
/// └────────────────────┴─────────────────┘
/// ```
pub fn encode(payload: &[u8]) -> Vec<u8> {
    // Slice lengths never exceed isize::MAX, which every header can carry.
    let header = Header::from_length(payload.len());
    let mut out = Vec::with_capacity(header.len() + payload.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(payload);
    out
}

/// Append a frame to `dst`.
pub fn encode_into(payload: &[u8], dst: &mut BytesMut) {
    let header = Header::from_length(payload.len());
    dst.reserve(header.len() + payload.len());
    dst.put_slice(&header);
    dst.put_slice(payload);
}

/// Decode one frame from the start of `frame`.
///
/// Returns the payload, borrowed from `frame`, and the number of bytes the
/// frame occupies so a caller can step over it in a larger buffer. The input
/// is never modified.
pub fn decode(frame: &[u8]) -> Result<(&[u8], usize)> {
    let (header_len, data_len) = match decode_header(frame) {
        HeaderStatus::Complete {
            header_len,
            data_len,
        } => (header_len, data_len),
        HeaderStatus::Incomplete => return Err(FrameError::HeaderInsufficient),
        HeaderStatus::TooLarge => return Err(FrameError::HeaderTooLarge),
    };

    let needed = header_len
        .checked_add(data_len)
        .ok_or(FrameError::HeaderTooLarge)?;
    if frame.len() < needed {
        return Err(FrameError::Insufficient {
            needed,
            available: frame.len(),
        });
    }

    Ok((&frame[header_len..needed], needed))
}

/// Like [`decode`], but returns a refcounted slice of a shared buffer.
pub fn decode_bytes(frame: &Bytes) -> Result<(Bytes, usize)> {
    let (payload, consumed) = decode(frame)?;
    let start = consumed - payload.len();
    Ok((frame.slice(start..consumed), consumed))
}
