//! Cursor-based decoding of structured binary data.
//!
//! Every read takes the whole buffer and a cursor into it. On success,
//! the cursor is advanced by exactly the number of bytes the value
//! occupies. On failure, it is left where it was before the call.
//!
//! All multi-byte values use little endian byte order, regardless of
//! the host platform. This matches what the game client produces.

use std::{
    borrow::Cow,
    io::{self, Write},
    mem,
    path::Path,
};

use thiserror::Error;

use crate::{load, LoadError};

/// The presence marker the game client writes before non-empty strings.
///
/// Readers accept any non-zero byte as "present".
pub const STRING_PRESENT: u8 = 0x0B;

/// Errors that may occur while decoding values from a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BinaryError {
    /// A read would have crossed the end of the buffer.
    #[error("attempted to read {needed} bytes at offset {offset}, but buffer has {len} bytes")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },
}

#[cold]
#[inline(never)]
fn out_of_bounds(offset: usize, needed: usize, len: usize) -> BinaryError {
    BinaryError::OutOfBounds {
        offset,
        needed,
        len,
    }
}

/// Splits `n` bytes off the buffer at `cursor` and advances it.
#[inline]
fn take<'a>(buf: &'a [u8], cursor: &mut usize, n: usize) -> Result<&'a [u8], BinaryError> {
    let start = *cursor;
    match start.checked_add(n).and_then(|end| buf.get(start..end)) {
        Some(bytes) => {
            *cursor = start + n;
            Ok(bytes)
        }

        None => Err(out_of_bounds(start, n, buf.len())),
    }
}

/// A fixed-width value that can be copied in and out of a buffer.
pub trait Primitive: Copy + Sized {
    /// The number of bytes the value occupies in encoded form.
    const SIZE: usize;

    /// Decodes the value from exactly [`Self::SIZE`] bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;

    /// Encodes the value to the given writer.
    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()>;
}

macro_rules! primitive_impl {
    ($($ty:ty),* $(,)*) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = mem::size_of::<$ty>();

                #[inline]
                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut v = [0; mem::size_of::<$ty>()];
                    v.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(v)
                }

                #[inline]
                fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
                    out.write_all(&self.to_le_bytes())
                }
            }
        )*
    };
}

primitive_impl! {
    u8, i8,
    u16, i16,
    u32, i32,
    u64, i64,
    f32, f64,
}

impl Primitive for bool {
    const SIZE: usize = 1;

    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    #[inline]
    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_all(&[self as u8])
    }
}

/// Reads a fixed-width [`Primitive`] at `cursor`.
#[inline]
pub fn read<T: Primitive>(buf: &[u8], cursor: &mut usize) -> Result<T, BinaryError> {
    take(buf, cursor, T::SIZE).map(T::from_le_slice)
}

/// Writes a fixed-width [`Primitive`] to the output stream.
#[inline]
pub fn write<T: Primitive, W: Write>(out: &mut W, v: T) -> io::Result<()> {
    v.write_le(out)
}

/// Decodes an unsigned LEB128 integer at `cursor`.
///
/// There is no limit on the number of bytes consumed. Payload bits
/// that do not fit into the 64-bit result are silently discarded.
pub fn uleb128(buf: &[u8], cursor: &mut usize) -> Result<u64, BinaryError> {
    let start = *cursor;
    let mut result = 0u64;
    let mut shift = 0u32;

    loop {
        let byte = match read::<u8>(buf, cursor) {
            Ok(byte) => byte,
            Err(e) => {
                *cursor = start;
                return Err(e);
            }
        };

        result |= u64::from(byte & 0x7F).checked_shl(shift).unwrap_or(0);
        shift = shift.saturating_add(7);

        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
}

/// Encodes an unsigned LEB128 integer to the output stream.
pub fn write_uleb128<W: Write>(out: &mut W, mut v: u64) -> io::Result<()> {
    loop {
        let mut byte = (v & 0x7F) as u8;
        v >>= 7;

        if v != 0 {
            byte |= 0x80;
        }
        out.write_all(&[byte])?;

        if v == 0 {
            return Ok(());
        }
    }
}

/// Reads the raw contents of a presence-prefixed string at `cursor`.
///
/// The encoding is a presence byte, followed by a ULEB128 length and
/// the string bytes only when the presence byte is non-zero. Absent
/// strings decode to an empty slice.
pub fn prefixed_bytes<'a>(buf: &'a [u8], cursor: &mut usize) -> Result<&'a [u8], BinaryError> {
    let start = *cursor;
    prefixed_bytes_impl(buf, cursor).inspect_err(|_| *cursor = start)
}

fn prefixed_bytes_impl<'a>(buf: &'a [u8], cursor: &mut usize) -> Result<&'a [u8], BinaryError> {
    if read::<u8>(buf, cursor)? == 0 {
        return Ok(&[]);
    }

    let len = uleb128(buf, cursor)?;
    let len = usize::try_from(len).map_err(|_| out_of_bounds(*cursor, usize::MAX, buf.len()))?;
    take(buf, cursor, len)
}

/// Reads a presence-prefixed string at `cursor`.
///
/// The bytes are not validated; invalid UTF-8 sequences are replaced
/// with U+FFFD instead of failing the read.
#[inline]
pub fn prefixed_string(buf: &[u8], cursor: &mut usize) -> Result<String, BinaryError> {
    prefixed_bytes(buf, cursor).map(|b| String::from_utf8_lossy(b).into_owned())
}

/// Writes a presence-prefixed string to the output stream.
///
/// Empty strings are written as absent.
pub fn write_prefixed_string<W: Write>(out: &mut W, v: &str) -> io::Result<()> {
    if v.is_empty() {
        return out.write_all(&[0]);
    }

    out.write_all(&[STRING_PRESENT])?;
    write_uleb128(out, v.len() as u64)?;
    out.write_all(v.as_bytes())
}

/// A reader that owns its buffer and cursor.
///
/// This is a convenience over the free functions in this module for
/// callers which decode a single file front to back.
#[derive(Clone, Debug)]
pub struct BinaryReader<'a> {
    buf: Cow<'a, [u8]>,
    cursor: usize,
}

impl<'a> BinaryReader<'a> {
    /// Creates a reader over the given buffer, starting at offset 0.
    #[inline]
    pub fn new(buf: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            buf: buf.into(),
            cursor: 0,
        }
    }

    /// Loads the file at `path` and creates a reader over it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<BinaryReader<'static>, LoadError> {
        load(path).map(|buf| BinaryReader::new(buf.into_vec()))
    }

    /// Gets the current cursor offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Gets the number of bytes left past the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.cursor)
    }

    /// Reads a fixed-width [`Primitive`].
    #[inline]
    pub fn read<T: Primitive>(&mut self) -> Result<T, BinaryError> {
        read(&self.buf, &mut self.cursor)
    }

    /// Reads an unsigned LEB128 integer.
    #[inline]
    pub fn uleb128(&mut self) -> Result<u64, BinaryError> {
        uleb128(&self.buf, &mut self.cursor)
    }

    /// Reads a presence-prefixed string.
    #[inline]
    pub fn prefixed_string(&mut self) -> Result<String, BinaryError> {
        prefixed_string(&self.buf, &mut self.cursor)
    }

    /// Splits the reader into its buffer and cursor.
    #[inline]
    pub fn into_inner(self) -> (Cow<'a, [u8]>, usize) {
        (self.buf, self.cursor)
    }
}
