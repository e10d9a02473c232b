use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_into, frame_len};
use crate::error::{FrameError, Result};
use crate::scanner::ScannerConfig;
use crate::tuple::encode_tuple;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete frames to any `Write` sink.
///
/// Frames larger than the configured `max_frame_size` are refused before
/// anything is written, so a [`Scanner`](crate::Scanner) using the same
/// configuration can always read what this writer produces.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: ScannerConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, ScannerConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: ScannerConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode and send one payload as a frame.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.check_size(frame_len(payload.len()))?;

        self.buf.clear();
        encode_into(payload, &mut self.buf);
        self.write_buffered()
    }

    /// Encode a tuple and send it as one frame.
    pub fn send_tuple(&mut self, items: &[&[u8]]) -> Result<()> {
        self.send(&encode_tuple(items))
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if size > self.config.max_frame_size {
            return Err(FrameError::LimitExceeded {
                limit: self.config.max_frame_size,
            });
        }
        Ok(())
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update the maximum frame size for subsequent sends.
    pub fn set_max_frame_size(&mut self, max_frame_size: usize) {
        self.config.max_frame_size = max_frame_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::scanner::Scanner;
    use crate::tuple::decode_tuple;

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(Vec::new());

        writer.send(b"hello").unwrap();

        let wire = writer.into_inner();
        let (payload, consumed) = decode(&wire).unwrap();
        assert_eq!(payload, b"hello");
        assert_eq!(consumed, wire.len());
    }

    #[test]
    fn write_multiple_frames() {
        let mut writer = FrameWriter::new(Vec::new());

        writer.send(b"one").unwrap();
        writer.send(b"").unwrap();
        writer.send(b"three").unwrap();

        let wire = writer.into_inner();
        let frames: Vec<_> = Scanner::new(wire.as_slice())
            .frames()
            .map(|frame| frame.unwrap().to_vec())
            .collect();
        assert_eq!(frames, vec![b"one".to_vec(), Vec::new(), b"three".to_vec()]);
    }

    #[test]
    fn send_tuple_roundtrip() {
        let mut writer = FrameWriter::new(Vec::new());

        writer.send_tuple(&[b"Jack", b"Black"]).unwrap();

        let wire = writer.into_inner();
        let mut scanner = Scanner::new(wire.as_slice());
        let frame = scanner.next_frame().unwrap().unwrap();
        let [first, last] = decode_tuple::<2>(&frame).unwrap();
        assert_eq!(first, b"Jack");
        assert_eq!(last, b"Black");
    }

    #[test]
    fn frame_over_limit_rejected() {
        let cfg = ScannerConfig {
            max_frame_size: 4,
            ..ScannerConfig::default()
        };
        let mut writer = FrameWriter::with_config(Vec::new(), cfg);

        let err = writer.send(b"oversized").unwrap_err();
        assert!(matches!(err, FrameError::LimitExceeded { limit: 4 }));
        assert!(writer.get_ref().is_empty());

        writer.set_max_frame_size(64);
        writer.send(b"oversized").unwrap();
        assert_eq!(writer.config().max_frame_size, 64);
    }

    #[test]
    fn short_writes_split_multibyte_header() {
        let sink = TrickleSink {
            data: Vec::new(),
            calls: 0,
            flushes: 0,
        };
        let mut writer = FrameWriter::new(sink);
        let big = vec![0x5Au8; 20_000];

        writer.send(&big).unwrap();
        writer.send(b"after").unwrap();

        let sink = writer.into_inner();
        assert_eq!(sink.flushes, 2);
        assert_eq!(&sink.data[..3], &[0xA0, 0x9C, 0x01]);

        let mut scanner = Scanner::new(sink.data.as_slice());
        assert_eq!(scanner.next_frame().unwrap().unwrap().as_ref(), big.as_slice());
        assert_eq!(scanner.next_frame().unwrap().unwrap().as_ref(), b"after");
        assert!(scanner.next_frame().unwrap().is_none());
    }

    #[test]
    fn full_sink_is_write_zero() {
        let mut storage = [0u8; 3];
        let mut writer = FrameWriter::new(&mut storage[..]);

        let err = writer.send(b"four").unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WriteZero));
        drop(writer);
        assert_eq!(storage, [4, b'f', b'o']);
    }

    /// Accepts at most two bytes per call and interrupts every third call.
    struct TrickleSink {
        data: Vec<u8>,
        calls: usize,
        flushes: usize,
    }

    impl Write for TrickleSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.calls += 1;
            if self.calls % 3 == 0 {
                return Err(ErrorKind::Interrupted.into());
            }
            let n = buf.len().min(2);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }
}
