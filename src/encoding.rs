//! Byte-order packing and compact size integers
//!
//! Every multi-byte integer on the wire is little-endian. Variable-length
//! counts use the compact size format:
//!
//! | value              | encoding                 |
//! |--------------------|--------------------------|
//! | `< 0xfd`           | 1 byte                   |
//! | `<= 0xffff`        | `0xfd` + 2 bytes LE      |
//! | `<= 0xffff_ffff`   | `0xfe` + 4 bytes LE      |
//! | otherwise          | `0xff` + 8 bytes LE      |

use crate::error::{Result, SigningError};

pub fn pack_u32_le(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn pack_u32_be(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn pack_u64_le(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

pub fn pack_u64_be(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn unpack_u32_le(bytes: &[u8]) -> Result<u32> {
    Ok(u32::from_le_bytes(Reader::new(bytes).read_array()?))
}

pub fn unpack_u32_be(bytes: &[u8]) -> Result<u32> {
    Ok(u32::from_be_bytes(Reader::new(bytes).read_array()?))
}

pub fn unpack_u64_le(bytes: &[u8]) -> Result<u64> {
    Ok(u64::from_le_bytes(Reader::new(bytes).read_array()?))
}

pub fn unpack_u64_be(bytes: &[u8]) -> Result<u64> {
    Ok(u64::from_be_bytes(Reader::new(bytes).read_array()?))
}

/// Number of bytes the compact size encoding of `n` occupies
pub fn compact_size_len(n: u64) -> usize {
    if n < 0xfd {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffff_ffff {
        5
    } else {
        9
    }
}

pub fn write_compact_size(n: u64, out: &mut Vec<u8>) {
    if n < 0xfd {
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        out.push(0xfe);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

pub fn encode_compact_size(n: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(compact_size_len(n));
    write_compact_size(n, &mut out);
    out
}

/// Decode a compact size from the start of `bytes`, returning the value and
/// the number of bytes consumed
pub fn decode_compact_size(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut reader = Reader::new(bytes);
    let n = reader.read_compact_size()?;
    Ok((n, reader.position()))
}

/// Cursor over a byte slice; every read fails with `Truncated` instead of panicking
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(SigningError::Truncated {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a compact size, rejecting encodings that are longer than necessary
    pub fn read_compact_size(&mut self) -> Result<u64> {
        let (value, minimum) = match self.read_u8()? {
            0xff => (self.read_u64_le()?, 0x1_0000_0000),
            0xfe => (self.read_u32_le()? as u64, 0x1_0000),
            0xfd => (self.read_u16_le()? as u64, 0xfd),
            n => return Ok(n as u64),
        };
        if value < minimum {
            return Err(SigningError::InvalidCompactSize(format!(
                "non-canonical encoding of {}",
                value
            )));
        }
        Ok(value)
    }

    /// Read a compact size length followed by that many bytes
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_compact_size()?;
        if len > self.remaining() as u64 {
            return Err(SigningError::Truncated {
                needed: usize::try_from(len).unwrap_or(usize::MAX),
                remaining: self.remaining(),
            });
        }
        self.read_bytes(len as usize)
    }
}
