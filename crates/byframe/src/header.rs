//! Variable-length header codec.
//!
//! A header is a base-128 little-endian digit stream. Each byte carries seven
//! bits of the payload length; the high bit is set on every byte except the
//! last.
//!
//! ```text
//! 200 = 0b1_1001000
//!       ┌──────────┬──────────┐
//!       │ 1_1001000│ 0_0000001│
//!       │   0xC8   │   0x01   │
//!       └──────────┴──────────┘
//! ```

use std::ops::Deref;

use crate::error::{FrameError, Result};

/// Continuation flag: more digits follow.
pub const CONTINUE_MASK: u8 = 0b1000_0000;

/// Seven-bit digit of the length.
pub const DIGIT_MASK: u8 = 0b0111_1111;

/// Longest legal header. Nine digits carry 63 bits.
pub const MAX_HEADER_LEN: usize = 9;

/// Largest length a header can carry on this target.
pub const MAX_LENGTH: usize = if usize::BITS > 63 {
    (u64::MAX >> 1) as usize
} else {
    usize::MAX
};

/// An encoded header, held inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    bytes: [u8; MAX_HEADER_LEN],
    len: u8,
}

impl Header {
    /// Encode `length`; callers guarantee `length <= MAX_LENGTH`.
    pub(crate) fn from_length(mut length: usize) -> Self {
        let mut bytes = [0u8; MAX_HEADER_LEN];
        let mut len = 0usize;
        loop {
            let digit = (length & DIGIT_MASK as usize) as u8;
            length >>= 7;
            if length == 0 {
                bytes[len] = digit;
                len += 1;
                break;
            }
            bytes[len] = digit | CONTINUE_MASK;
            len += 1;
        }
        Self {
            bytes,
            len: len as u8,
        }
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl Deref for Header {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Header {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Result of scanning a (possibly partial) header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
    /// A terminating byte was found.
    Complete { header_len: usize, data_len: usize },
    /// The input ran out before the terminating byte. Try again with more bytes.
    Incomplete,
    /// No terminator within [`MAX_HEADER_LEN`] bytes, or the value overflows `usize`.
    TooLarge,
}

/// Encode a payload length into its canonical header.
///
/// Zero encodes as the single byte `0x00`.
pub fn encode_header(length: usize) -> Result<Header> {
    if length > MAX_LENGTH {
        return Err(FrameError::LengthTooLarge {
            length,
            max: MAX_LENGTH,
        });
    }
    Ok(Header::from_length(length))
}

/// Number of bytes [`encode_header`] produces for `length`.
pub fn encoded_len(length: usize) -> usize {
    let bits = usize::BITS - length.leading_zeros();
    bits.div_ceil(7).max(1) as usize
}

/// Decode a header from the start of `bytes`.
///
/// Works on partial input: a prefix without a terminator is
/// [`HeaderStatus::Incomplete`], not an error. Non-minimal encodings are
/// accepted as written.
pub fn decode_header(bytes: &[u8]) -> HeaderStatus {
    let mut data_len = 0u64;
    for (i, &byte) in bytes.iter().enumerate() {
        if i >= MAX_HEADER_LEN {
            return HeaderStatus::TooLarge;
        }
        data_len |= u64::from(byte & DIGIT_MASK) << (i * 7);
        if byte & CONTINUE_MASK == 0 {
            return match usize::try_from(data_len) {
                Ok(data_len) => HeaderStatus::Complete {
                    header_len: i + 1,
                    data_len,
                },
                Err(_) => HeaderStatus::TooLarge,
            };
        }
    }
    HeaderStatus::Incomplete
}
