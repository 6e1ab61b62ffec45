use crate::error::WireError;

/// Big-endian cursor over an in-memory Archive II buffer.
///
/// Archive II is big-endian throughout, floats included, and Message 31
/// needs random access: data-block pointers are byte offsets from the start
/// of the message, so the parser records [`position`](Self::position) before
/// reading the header and later calls [`seek_to`](Self::seek_to) with
/// `start + pointer`. All offsets are relative to the origin of the slice
/// this reader wraps, never to the outer file.
///
/// ```text
///   ┌────────────── buf ──────────────┐
///   │ ........ ▲ .................... │
///   └──────────┼──────────────────────┘
///              pos   (may sit at len, never beyond it for reads)
/// ```
///
/// Skipping past the end is allowed (the fixed 2432-byte message slots are
/// routinely longer than the trailing bytes of a record); any subsequent
/// read then fails with [`WireError::UnexpectedEof`] and
/// [`is_exhausted`](Self::is_exhausted) reports `true`.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

macro_rules! read_be {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Read a big-endian `", stringify!($ty), "` and advance.")]
        ///
        /// # Errors
        ///
        /// [`WireError::UnexpectedEof`] if fewer bytes remain than the
        /// width of the value.
        pub fn $name(&mut self) -> Result<$ty, WireError> {
            let bytes = self.read_array::<{ std::mem::size_of::<$ty>() }>()?;
            Ok(<$ty>::from_be_bytes(bytes))
        }
    };
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the origin of the wrapped buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the wrapped buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes left between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// `true` once the cursor sits at or beyond the end of the buffer.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// The unread tail of the buffer (empty when exhausted).
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        self.buf.get(self.pos..).unwrap_or_default()
    }

    /// Move the cursor to an absolute offset from the buffer origin.
    ///
    /// # Errors
    ///
    /// [`WireError::SeekOutOfBounds`] if `offset` is past the end.
    pub fn seek_to(&mut self, offset: usize) -> Result<(), WireError> {
        if offset > self.buf.len() {
            return Err(WireError::SeekOutOfBounds {
                offset: i64::try_from(offset).unwrap_or(i64::MAX),
                len: self.buf.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Advance the cursor by `n` bytes. The cursor may end up past the end
    /// of the buffer; that is how fixed-size message slots are consumed.
    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    /// Step the cursor back by `n` bytes.
    ///
    /// # Errors
    ///
    /// [`WireError::SeekOutOfBounds`] if this would move before the origin.
    pub fn rewind(&mut self, n: usize) -> Result<(), WireError> {
        let Some(pos) = self.pos.checked_sub(n) else {
            return Err(WireError::SeekOutOfBounds {
                offset: i64::try_from(self.pos).unwrap_or(i64::MAX)
                    - i64::try_from(n).unwrap_or(i64::MAX),
                len: self.buf.len(),
            });
        };
        self.pos = pos;
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let bytes = self.peek_bytes(n)?;
        self.pos += n;
        Ok(bytes)
    }

    /// Borrow the next `n` bytes without moving the cursor.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn peek_bytes(&self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.buf.len());
        match end {
            Some(end) => Ok(&self.buf[self.pos..end]),
            None => Err(WireError::UnexpectedEof {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            }),
        }
    }

    /// Read a fixed-size array and advance.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Peek a fixed-size array without advancing.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `N` bytes remain.
    pub fn peek_array<const N: usize>(&self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.peek_bytes(N)?);
        Ok(out)
    }

    read_be!(read_u8, u8);
    read_be!(read_u16, u16);
    read_be!(read_i16, i16);
    read_be!(read_u32, u32);
    read_be!(read_i32, i32);

    /// Read an IEEE-754 single in big-endian byte order.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_bits(self.read_u32()?))
    }
}
