//! Varint length-prefixed message framing.
//!
//! Packs opaque byte payloads into a continuous stream and recovers them,
//! including incrementally as bytes arrive. Every frame is:
//! - A 1-9 byte header: the payload length as base-128 little-endian digits,
//!   high bit set on every byte but the last
//! - The payload, exactly that many bytes
//!
//! No checksums, no compression, no typed serialization. Those belong to a
//! higher layer.
//!
//! ```
//! let frame = byframe::encode(b"test");
//! let (payload, consumed) = byframe::decode(&frame).unwrap();
//! assert_eq!(payload, b"test");
//! assert_eq!(consumed, frame.len());
//! ```

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod error;
pub mod header;
pub mod scanner;
pub mod tuple;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::FrameCodec;
pub use codec::{decode, decode_bytes, encode, encode_into, frame_len, DEFAULT_MAX_FRAME_SIZE};
pub use error::{FrameError, Result};
pub use header::{
    decode_header, encode_header, encoded_len, Header, HeaderStatus, MAX_HEADER_LEN, MAX_LENGTH,
};
pub use scanner::{Frames, Scanner, ScannerConfig, DEFAULT_READ_CHUNK_SIZE};
pub use tuple::{decode_tuple, decode_tuple_into, decode_tuple_vec, encode_tuple};
pub use writer::FrameWriter;
