//! Fixed-layout big-endian structures shared with guest memory
//!
//! Every structure here mirrors a console ABI layout byte for byte. All
//! multi-byte fields are big-endian and nothing is implicitly padded; where
//! the console aligns a field, the padding is an explicit reserved field.
//!
//! | Structure | Size |
//! |-----------|------|
//! | [`HostAddress`](crate::value_objects::HostAddress) (XNADDR) | 0x24 |
//! | [`XSessionInfo`] | 0x3C |
//! | [`XSessionLocalDetails`] | 0x80 |
//! | [`XOnlinePresence`] | 0xA4 |
//! | [`XOnlineFriend`] | 0xC4 |
//! | [`FindUserInfo`] | 0x18 |
//! | [`FindUsersResponseHeader`] | 0x08 |
//!
//! Sizes are asserted at compile time; a layout edit that changes a size
//! fails the build rather than corrupting guest memory.

mod find_user;
mod presence;
mod session;

pub use find_user::{FindUserInfo, FindUsersResponse, FindUsersResponseHeader};
pub use presence::{XOnlineFriend, XOnlinePresence};
pub(crate) use presence::rich_presence_field;
pub use session::{XSessionInfo, XSessionLocalDetails};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("Buffer too short for {structure}: need {expected} bytes, got {actual}")]
    TooShort {
        structure: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// A structure with a fixed guest-memory image.
pub trait WireStruct: Sized {
    /// Exact byte size of the image
    const SIZE: usize;

    /// Name used in diagnostics
    const NAME: &'static str;

    fn write_fields(&self, w: &mut WireWriter<'_>);

    fn read_fields(r: &mut WireReader<'_>) -> Self;

    /// Write the image into the front of `buf`, returning bytes written.
    fn write_to(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        if buf.len() < Self::SIZE {
            return Err(WireError::TooShort {
                structure: Self::NAME,
                expected: Self::SIZE,
                actual: buf.len(),
            });
        }
        let mut writer = WireWriter::new(&mut buf[..Self::SIZE]);
        self.write_fields(&mut writer);
        debug_assert_eq!(writer.position(), Self::SIZE, "{} wrote a short image", Self::NAME);
        Ok(Self::SIZE)
    }

    /// Read the image from the front of `buf`.
    fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < Self::SIZE {
            return Err(WireError::TooShort {
                structure: Self::NAME,
                expected: Self::SIZE,
                actual: buf.len(),
            });
        }
        let mut reader = WireReader::new(&buf[..Self::SIZE]);
        let value = Self::read_fields(&mut reader);
        debug_assert_eq!(reader.position(), Self::SIZE, "{} read a short image", Self::NAME);
        Ok(value)
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::SIZE];
        let mut writer = WireWriter::new(&mut buf);
        self.write_fields(&mut writer);
        buf
    }
}

/// Sequential big-endian writer over an exactly-sized buffer.
///
/// Callers size the buffer from [`WireStruct::SIZE`], so field writes never
/// run past the end.
pub struct WireWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WireWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    pub fn put_u16(&mut self, value: u16) {
        self.put_bytes(&value.to_be_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.put_bytes(&value.to_be_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.put_bytes(&value.to_be_bytes());
    }

    pub fn put_struct<T: WireStruct>(&mut self, value: &T) {
        let end = self.pos + T::SIZE;
        let mut nested = WireWriter::new(&mut self.buf[self.pos..end]);
        value.write_fields(&mut nested);
        self.pos = end;
    }

    /// Zero-fill reserved or padding bytes.
    pub fn skip(&mut self, len: usize) {
        self.buf[self.pos..self.pos + len].fill(0);
        self.pos += len;
    }
}

/// Sequential big-endian reader over an exactly-sized buffer.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    pub fn u16(&mut self) -> u16 {
        u16::from_be_bytes(self.bytes())
    }

    pub fn u32(&mut self) -> u32 {
        u32::from_be_bytes(self.bytes())
    }

    pub fn u64(&mut self) -> u64 {
        u64::from_be_bytes(self.bytes())
    }

    pub fn get_struct<T: WireStruct>(&mut self) -> T {
        let end = self.pos + T::SIZE;
        let mut nested = WireReader::new(&self.buf[self.pos..end]);
        let value = T::read_fields(&mut nested);
        self.pos = end;
        value
    }

    pub fn skip(&mut self, len: usize) {
        self.pos += len;
    }
}
