//! Byte-level input: the stream abstraction and the position-tracking source.
//!
//! [`ByteStream`] is the minimal surface the reader needs from its input:
//! sequential reads plus a one-byte peek. It is implemented for byte slices
//! and, under the `std` feature, for any `std::io::Read` via [`IoStream`].
//!
//! [`ByteSource`] sits on top of a stream and owns the line/column counters.
//! It collapses CR+LF into a single LF, so callers never see a Windows line
//! ending. Columns count *bytes*, not code points: multi-byte UTF-8 sequences
//! advance the column once per byte. Editor integrations rely on byte
//! offsets, so this is deliberate.

/// Sequential byte input with one-byte lookahead.
pub trait ByteStream {
    /// Consumes and returns the next byte, or `None` at end of stream or on
    /// a read failure.
    fn read_byte(&mut self) -> Option<u8>;

    /// Returns the next byte without consuming it.
    fn peek_byte(&mut self) -> Option<u8>;
}

impl ByteStream for &[u8] {
    fn read_byte(&mut self) -> Option<u8> {
        let (&b, rest) = self.split_first()?;
        *self = rest;
        Some(b)
    }

    fn peek_byte(&mut self) -> Option<u8> {
        self.first().copied()
    }
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn peek_byte(&mut self) -> Option<u8> {
        (**self).peek_byte()
    }
}

/// Adapts any `std::io::Read` to [`ByteStream`] with an internal one-byte
/// lookahead slot.
///
/// Read errors are indistinguishable from end of stream: the reader observes
/// them as EOF and unwinds with its usual missing-close diagnostics.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoStream<R> {
    inner: R,
    peeked: Option<u8>,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            peeked: None,
        }
    }

    fn pull(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteStream for IoStream<R> {
    fn read_byte(&mut self) -> Option<u8> {
        self.peeked.take().or_else(|| self.pull())
    }

    fn peek_byte(&mut self) -> Option<u8> {
        if self.peeked.is_none() {
            self.peeked = self.pull();
        }
        self.peeked
    }
}

/// The reader's view of its input: raw bytes with newline normalization and
/// 1-based line/column tracking.
#[derive(Debug)]
pub(crate) struct ByteSource<S> {
    stream: S,
    line: usize,
    col: usize,
}

impl<S: ByteStream> ByteSource<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self {
            stream,
            line: 1,
            col: 1,
        }
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn col(&self) -> usize {
        self.col
    }

    /// Consumes one byte. CR followed by LF is collapsed into the LF; the
    /// line counter advances on the LF branch only, so a lone CR resets the
    /// column without starting a new line. A CR that ends the stream is
    /// swallowed.
    pub(crate) fn read(&mut self) -> Option<u8> {
        let mut ch = self.stream.read_byte()?;
        if ch == b'\r' {
            self.col = 1;
            match self.stream.peek_byte() {
                None => return None,
                Some(b'\n') => ch = self.stream.read_byte()?,
                Some(_) => {}
            }
        }
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Raw lookahead; does not touch the position counters.
    pub(crate) fn peek(&mut self) -> Option<u8> {
        self.stream.peek_byte()
    }
}
