//! Firmware image buffer.

use std::fs;
use std::ops::Range;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Exclusively owned firmware image. The length is fixed once loaded; all
/// patches overwrite bytes in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    data: Vec<u8>,
}

/// Contiguous run of bytes that differs between two images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub start: usize,
    pub len: usize,
}

impl ByteRange {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

impl BinaryImage {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Zero-filled image of the given length
    pub fn zeroed(len: usize) -> Self {
        Self { data: vec![0; len] }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, &self.data)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Byte range `[address, address + len)` if it lies entirely inside
    /// the image. Negative addresses and ranges that overflow are rejected.
    pub fn checked_range(&self, address: i128, len: usize) -> Option<Range<usize>> {
        let start = usize::try_from(address).ok()?;
        let end = start.checked_add(len)?;
        (end <= self.data.len()).then_some(start..end)
    }

    /// Overwrite a range that has already been bounds checked
    pub(crate) fn overwrite(&mut self, range: Range<usize>, bytes: &[u8]) {
        self.data[range].copy_from_slice(bytes);
    }

    pub fn read(&self, address: usize, len: usize) -> Option<&[u8]> {
        self.data.get(address..address.checked_add(len)?)
    }

    /// Ranges where `self` and `other` differ.
    ///
    /// Bytes past the end of the shorter image count as different.
    pub fn diff(&self, other: &BinaryImage) -> Vec<ByteRange> {
        let len = self.len().max(other.len());
        let mut ranges: Vec<ByteRange> = Vec::new();
        let mut current: Option<ByteRange> = None;

        for i in 0..len {
            let differs = self.data.get(i) != other.data.get(i);
            if !differs {
                ranges.extend(current.take());
            } else if let Some(range) = current.as_mut() {
                range.len += 1;
            } else {
                current = Some(ByteRange { start: i, len: 1 });
            }
        }
        ranges.extend(current);

        ranges
    }
}

impl From<Vec<u8>> for BinaryImage {
    fn from(data: Vec<u8>) -> Self {
        Self::from_bytes(data)
    }
}

impl AsRef<[u8]> for BinaryImage {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
