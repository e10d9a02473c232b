//! `tokio_util::codec` adapter for the frame format.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{encode_into, frame_len, DEFAULT_MAX_FRAME_SIZE};
use crate::error::{FrameError, Result};
use crate::header::{decode_header, HeaderStatus};

/// Frame codec for `FramedRead` / `FramedWrite`.
///
/// Applies the same size ceiling as [`Scanner`](crate::Scanner) in both
/// directions.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_size: usize,
}

impl FrameCodec {
    /// Codec with the default 16 MiB ceiling.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Codec with an explicit ceiling on header plus payload.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    fn limit_exceeded(&self) -> FrameError {
        FrameError::LimitExceeded {
            limit: self.max_frame_size,
        }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        let (header_len, data_len) = match decode_header(src) {
            HeaderStatus::Complete {
                header_len,
                data_len,
            } => (header_len, data_len),
            HeaderStatus::Incomplete if src.len() >= self.max_frame_size => {
                return Err(self.limit_exceeded());
            }
            HeaderStatus::Incomplete => return Ok(None),
            HeaderStatus::TooLarge => return Err(FrameError::HeaderTooLarge),
        };

        let total = header_len
            .checked_add(data_len)
            .filter(|total| *total <= self.max_frame_size)
            .ok_or_else(|| self.limit_exceeded())?;

        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let mut frame = src.split_to(total);
        frame.advance(header_len);
        Ok(Some(frame.freeze()))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if src.is_empty() {
            return Ok(None);
        }
        match decode_header(src) {
            HeaderStatus::Complete {
                header_len,
                data_len,
            } => Err(FrameError::Insufficient {
                needed: header_len + data_len,
                available: src.len(),
            }),
            _ => Err(FrameError::HeaderInsufficient),
        }
    }
}

impl<'a> Encoder<&'a [u8]> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &'a [u8], dst: &mut BytesMut) -> Result<()> {
        if frame_len(item.len()) > self.max_frame_size {
            return Err(self.limit_exceeded());
        }
        encode_into(item, dst);
        Ok(())
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&[u8]>::encode(self, &item[..], dst)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;
    use crate::codec::encode;
    use crate::header::CONTINUE_MASK;

    #[test]
    fn decode_waits_for_body() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&[5u8, b'h', b'e'][..]);

        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b"llo");
        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.as_ref(), b"hello");
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_rejects_oversized_frame() {
        let mut codec = FrameCodec::with_max_frame_size(8);
        let mut buf = BytesMut::from(encode(&[0u8; 32]).as_slice());

        let err = codec.decode(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::LimitExceeded { limit: 8 }));
    }

    #[test]
    fn decode_rejects_long_header() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&[CONTINUE_MASK; 10][..]);

        let err = codec.decode(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::HeaderTooLarge));
    }

    #[test]
    fn decode_eof_mid_frame() {
        let mut codec = FrameCodec::new();

        let mut body = BytesMut::from(&[4u8, 1][..]);
        let err = codec.decode_eof(&mut body).unwrap_err();
        assert!(matches!(err, FrameError::Insufficient { needed: 5, available: 2 }));

        let mut header = BytesMut::from(&[0x80u8][..]);
        let err = codec.decode_eof(&mut header).unwrap_err();
        assert!(matches!(err, FrameError::HeaderInsufficient));

        let mut empty = BytesMut::new();
        assert!(codec.decode_eof(&mut empty).unwrap().is_none());
    }

    #[test]
    fn encoder_refuses_oversized_payload() {
        let mut codec = FrameCodec::with_max_frame_size(4);
        let mut dst = BytesMut::new();

        let err = Encoder::<&[u8]>::encode(&mut codec, b"too big", &mut dst).unwrap_err();
        assert!(matches!(err, FrameError::LimitExceeded { .. }));
        assert!(dst.is_empty());
    }

    #[tokio::test]
    async fn framed_roundtrip() {
        let mut sink = FramedWrite::new(Vec::new(), FrameCodec::new());
        sink.send(Bytes::from_static(b"one")).await.unwrap();
        sink.send(Bytes::new()).await.unwrap();
        sink.send(Bytes::from(vec![7u8; 1000])).await.unwrap();
        let wire = sink.into_inner();

        let mut stream = FramedRead::new(wire.as_slice(), FrameCodec::new());
        let mut frames = Vec::new();
        while let Some(frame) = stream.next().await {
            frames.push(frame.unwrap().to_vec());
        }
        assert_eq!(frames, vec![b"one".to_vec(), Vec::new(), vec![7u8; 1000]]);
    }
}
