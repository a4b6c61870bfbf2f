//! Character sinks for the formatting engine.
//!
//! A [`Sink`] receives rendered bytes one at a time and is told once, at the
//! end of a render, how many bytes were produced. Three destinations exist:
//!
//! - [`BufferSink`]: a caller-owned fixed buffer, filled and NUL-terminated.
//!   Writes past the capacity are dropped, never performed.
//! - `Vec<u8>`: a growable owned buffer.
//! - [`DeviceSink`]: a live [`OutputDevice`], refreshed once after a render
//!   that produced at least one byte.

use std::io::{self, Write};

/// Destination for rendered bytes.
pub trait Sink {
    /// Accepts one rendered byte.
    fn put(&mut self, byte: u8);

    /// Called exactly once after the last byte of a render.
    fn finish(&mut self, _produced: usize) {}
}

impl Sink for Vec<u8> {
    fn put(&mut self, byte: u8) {
        self.push(byte);
    }
}

/// A character output device (console, serial line, framebuffer terminal).
pub trait OutputDevice {
    /// Emits one byte.
    fn putchar(&mut self, byte: u8);

    /// Makes everything emitted so far visible.
    fn refresh(&mut self);
}

/// Bounded sink over a caller buffer.
///
/// One byte of the buffer is always reserved for the NUL terminator, so at
/// most `buf.len() - 1` rendered bytes are stored.
#[derive(Debug)]
pub struct BufferSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> BufferSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// Bytes stored so far (excluding the terminator).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stored bytes (excluding the terminator).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl Sink for BufferSink<'_> {
    fn put(&mut self, byte: u8) {
        if self.len + 1 < self.buf.len() {
            self.buf[self.len] = byte;
            self.len += 1;
        }
    }

    fn finish(&mut self, _produced: usize) {
        if let Some(slot) = self.buf.get_mut(self.len) {
            *slot = 0;
        }
    }
}

/// Streaming sink over an [`OutputDevice`].
pub struct DeviceSink<'d, D: OutputDevice + ?Sized> {
    device: &'d mut D,
}

impl<'d, D: OutputDevice + ?Sized> DeviceSink<'d, D> {
    pub fn new(device: &'d mut D) -> Self {
        Self { device }
    }
}

impl<D: OutputDevice + ?Sized> Sink for DeviceSink<'_, D> {
    fn put(&mut self, byte: u8) {
        self.device.putchar(byte);
    }

    fn finish(&mut self, produced: usize) {
        if produced > 0 {
            self.device.refresh();
        }
    }
}

/// Adapts any [`io::Write`] as an output device.
///
/// The device interface has no error channel, so the first I/O error is
/// kept and all later output is discarded until [`take_error`] is called.
///
/// [`take_error`]: WriteDevice::take_error
#[derive(Debug)]
pub struct WriteDevice<W: Write> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: Write> WriteDevice<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, error: None }
    }

    /// The first I/O error seen since the last call, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }
}

impl<W: Write> OutputDevice for WriteDevice<W> {
    fn putchar(&mut self, byte: u8) {
        if self.error.is_none() {
            let result = self.inner.write_all(&[byte]);
            self.record(result);
        }
    }

    fn refresh(&mut self) {
        if self.error.is_none() {
            let result = self.inner.flush();
            self.record(result);
        }
    }
}
