use std::collections::BTreeMap;
use thiserror::Error;

use super::Value;

// Nested containers deeper than this are rejected
const MAX_DEPTH: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Unexpected end of input")]
    InvalidSize,
    #[error("Unsupported MessagePack marker 0x{0:02x}")]
    UnsupportedMarker(u8),
    #[error("Map key is not a string")]
    InvalidMapKey,
    #[error("String is not valid UTF-8")]
    InvalidString,
    #[error("Maximum nesting depth exceeded")]
    TooDeep,
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
}

/// MessagePack reader for the subset produced by [`super::Writer`].
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, total: 0 }
    }

    // Decode exactly one value spanning the whole input
    pub fn read_all(bytes: &'a [u8]) -> Result<Value, ReaderError> {
        let mut reader = Self::new(bytes);
        let value = reader.read_value()?;
        if reader.size() > 0 {
            return Err(ReaderError::TrailingBytes(reader.size()));
        }
        Ok(value)
    }

    pub fn size(&self) -> usize {
        self.bytes.len() - self.total
    }

    pub fn total_read(&self) -> usize {
        self.total
    }

    pub fn read_u8(&mut self) -> Result<u8, ReaderError> {
        let byte = *self.bytes.get(self.total).ok_or(ReaderError::InvalidSize)?;
        self.total += 1;
        Ok(byte)
    }

    pub fn read_bytes_ref(&mut self, n: usize) -> Result<&'a [u8], ReaderError> {
        if n > self.size() {
            return Err(ReaderError::InvalidSize);
        }
        let bytes: &'a [u8] = self.bytes;
        let slice = &bytes[self.total..self.total + n];
        self.total += n;
        Ok(slice)
    }

    fn read_be(&mut self, n: usize) -> Result<u64, ReaderError> {
        let bytes = self.read_bytes_ref(n)?;
        Ok(bytes.iter().fold(0u64, |acc, byte| (acc << 8) | *byte as u64))
    }

    fn read_string(&mut self, len: usize) -> Result<String, ReaderError> {
        let bytes = self.read_bytes_ref(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReaderError::InvalidString)
    }

    pub fn read_value(&mut self) -> Result<Value, ReaderError> {
        self.read_value_at(0)
    }

    fn read_array(&mut self, len: usize, depth: usize) -> Result<Value, ReaderError> {
        let mut values = Vec::with_capacity(len.min(self.size()));
        for _ in 0..len {
            values.push(self.read_value_at(depth + 1)?);
        }
        Ok(Value::Array(values))
    }

    fn read_map(&mut self, len: usize, depth: usize) -> Result<Value, ReaderError> {
        let mut entries = BTreeMap::new();
        for _ in 0..len {
            let key = match self.read_value_at(depth + 1)? {
                Value::Str(key) => key,
                _ => return Err(ReaderError::InvalidMapKey),
            };
            let value = self.read_value_at(depth + 1)?;
            entries.insert(key, value);
        }
        Ok(Value::Map(entries))
    }

    fn read_value_at(&mut self, depth: usize) -> Result<Value, ReaderError> {
        if depth > MAX_DEPTH {
            return Err(ReaderError::TooDeep);
        }

        let marker = self.read_u8()?;
        match marker {
            0x00..=0x7f => Ok(Value::Uint(marker as u64)),
            0x80..=0x8f => self.read_map((marker & 0x0f) as usize, depth),
            0x90..=0x9f => self.read_array((marker & 0x0f) as usize, depth),
            0xa0..=0xbf => Ok(Value::Str(self.read_string((marker & 0x1f) as usize)?)),
            0xc0 => Ok(Value::Nil),
            0xc2 => Ok(Value::Bool(false)),
            0xc3 => Ok(Value::Bool(true)),
            0xc4 | 0xc5 | 0xc6 => {
                let len = self.read_be(1 << (marker - 0xc4))? as usize;
                Ok(Value::Bytes(self.read_bytes_ref(len)?.to_vec()))
            }
            0xcc | 0xcd | 0xce | 0xcf => Ok(Value::Uint(self.read_be(1 << (marker - 0xcc))?)),
            0xd9 | 0xda | 0xdb => {
                let len = self.read_be(1 << (marker - 0xd9))? as usize;
                Ok(Value::Str(self.read_string(len)?))
            }
            0xdc | 0xdd => {
                let len = self.read_be(2 << (marker - 0xdc))? as usize;
                self.read_array(len, depth)
            }
            0xde | 0xdf => {
                let len = self.read_be(2 << (marker - 0xde))? as usize;
                self.read_map(len, depth)
            }
            other => Err(ReaderError::UnsupportedMarker(other)),
        }
    }
}
