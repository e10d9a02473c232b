use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::DEFAULT_MAX_FRAME_SIZE;
use crate::error::{FrameError, Result};
use crate::header::{decode_header, HeaderStatus};

/// Default number of bytes requested from the source per read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8 * 1024;

/// Configuration for a [`Scanner`].
///
/// Set before the first scan; changing it mid-stream is not supported.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Ceiling on buffered bytes for one frame, header included. Default: 16 MiB.
    pub max_frame_size: usize,
    /// Bytes requested per read from the source. Default: 8 KiB.
    pub read_chunk_size: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

/// Reads complete frames from any `Read` source, one per call.
///
/// Handles partial reads internally; a source may deliver one byte at a time
/// or several frames in a single read. Emitted frames are zero-copy `Bytes`
/// split off the scanner's buffer and stay valid after later scans.
///
/// `Ok(0)` from the source is end-of-source. `ErrorKind::Interrupted` is
/// retried; any other error ends the scan and is kept for [`Scanner::err`].
///
/// ```
/// use byframe::{encode, Scanner};
///
/// let mut wire = Vec::new();
/// for i in 0..3 {
///     wire.extend(encode(i.to_string().as_bytes()));
/// }
///
/// let mut scanner = Scanner::new(wire.as_slice());
/// let mut seen = Vec::new();
/// while scanner.scan() {
///     seen.push(String::from_utf8_lossy(scanner.frame()).into_owned());
/// }
/// assert_eq!(seen, ["0", "1", "2"]);
/// assert!(scanner.err().is_none());
/// ```
pub struct Scanner<R> {
    inner: R,
    buf: BytesMut,
    config: ScannerConfig,
    frame: Bytes,
    err: Option<FrameError>,
    finished: bool,
}

impl<R: Read> Scanner<R> {
    /// Create a scanner with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, ScannerConfig::default())
    }

    /// Create a scanner with explicit configuration.
    pub fn with_config(inner: R, mut config: ScannerConfig) -> Self {
        config.read_chunk_size = config.read_chunk_size.max(1);
        Self {
            inner,
            buf: BytesMut::new(),
            config,
            frame: Bytes::new(),
            err: None,
            finished: false,
        }
    }

    /// Set the maximum buffered size of one frame.
    pub fn limit(mut self, size: usize) -> Self {
        self.config.max_frame_size = size;
        self
    }

    /// Set how many bytes are requested from the source per read.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size.max(1);
        self
    }

    /// Advance to the next frame.
    ///
    /// Returns `false` once the source is exhausted or an error occurs; the
    /// cause is then available from [`Scanner::err`].
    pub fn scan(&mut self) -> bool {
        match self.next_frame() {
            Ok(Some(frame)) => {
                self.frame = frame;
                true
            }
            Ok(None) => false,
            Err(err) => {
                self.err = Some(err);
                false
            }
        }
    }

    /// The frame produced by the last successful [`Scanner::scan`].
    pub fn frame(&self) -> &Bytes {
        &self.frame
    }

    /// The error that stopped [`Scanner::scan`].
    ///
    /// `None` when the source ended cleanly on a frame boundary.
    pub fn err(&self) -> Option<&FrameError> {
        self.err.as_ref()
    }

    /// Take ownership of the stored error.
    pub fn take_err(&mut self) -> Option<FrameError> {
        self.err.take()
    }

    /// Iterate over the remaining frames.
    ///
    /// Yields each frame, then at most one error, then stops. The scanner is
    /// only borrowed, so it can still be inspected after iteration.
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames { scanner: self }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Ok(None)` on a clean end-of-source. After `Ok(None)` or an
    /// error every later call returns `Ok(None)`.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>> {
        if self.finished {
            return Ok(None);
        }

        let result = self.read_frame();
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => self.finished = true,
            Err(err) => {
                debug!(error = %err, buffered = self.buf.len(), "frame scan stopped");
                self.finished = true;
            }
        }
        result
    }

    fn read_frame(&mut self) -> Result<Option<Bytes>> {
        let (header_len, data_len) = loop {
            match decode_header(&self.buf) {
                HeaderStatus::Complete {
                    header_len,
                    data_len,
                } => break (header_len, data_len),
                HeaderStatus::TooLarge => return Err(FrameError::HeaderTooLarge),
                HeaderStatus::Incomplete => {
                    if self.fill()? == 0 {
                        if self.buf.is_empty() {
                            return Ok(None);
                        }
                        return Err(FrameError::HeaderInsufficient);
                    }
                }
            }
        };

        let limit = self.config.max_frame_size;
        let total = header_len
            .checked_add(data_len)
            .filter(|total| *total <= limit)
            .ok_or(FrameError::LimitExceeded { limit })?;

        while self.buf.len() < total {
            if self.fill()? == 0 {
                return Err(FrameError::Insufficient {
                    needed: total,
                    available: self.buf.len(),
                });
            }
        }

        let mut frame = self.buf.split_to(total);
        frame.advance(header_len);
        Ok(Some(frame.freeze()))
    }

    /// Append one read's worth of bytes to the buffer. Returns 0 at end-of-source.
    ///
    /// The buffer never grows past the configured limit. With no room left, a
    /// one-byte read tells end-of-source apart from an overrun.
    fn fill(&mut self) -> Result<usize> {
        let limit = self.config.max_frame_size;
        let room = limit.saturating_sub(self.buf.len());
        if room == 0 {
            return match read_retrying(&mut self.inner, &mut [0u8; 1])? {
                0 => Ok(0),
                _ => Err(FrameError::LimitExceeded { limit }),
            };
        }
        let want = room.min(self.config.read_chunk_size);

        let start = self.buf.len();
        self.buf.resize(start + want, 0);
        let read = match read_retrying(&mut self.inner, &mut self.buf[start..]) {
            Ok(read) => read,
            Err(err) => {
                self.buf.truncate(start);
                return Err(err);
            }
        };
        self.buf.truncate(start + read);

        trace!(read, buffered = self.buf.len(), "read from source");
        Ok(read)
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Bytes read from the source but not yet emitted.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Current scanner configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the scanner and return the inner source.
    ///
    /// Buffered bytes that were not emitted are dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Read once into `dst`, retrying `Interrupted`.
fn read_retrying<R: Read>(inner: &mut R, dst: &mut [u8]) -> Result<usize> {
    loop {
        match inner.read(dst) {
            Ok(n) => return Ok(n.min(dst.len())),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}

/// Iterator over a [`Scanner`]'s frames, from [`Scanner::frames`].
#[derive(Debug)]
pub struct Frames<'a, R> {
    scanner: &'a mut Scanner<R>,
}

impl<R: Read> Iterator for Frames<'_, R> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scanner.next_frame().transpose()
    }
}

impl<R: Read> FusedIterator for Frames<'_, R> {}

impl<R> std::fmt::Debug for Scanner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("buffered", &self.buf.len())
            .field("config", &self.config)
            .field("finished", &self.finished)
            .finish()
    }
}
