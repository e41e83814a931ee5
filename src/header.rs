//! Header: per-table size metadata and the layout of an entry block.
//!
//! Every entry stores its key and value in a single boxed block, key
//! first. The header knows both sizes and is the only place that slices
//! such a block or checks caller buffers against the declared sizes.

use crate::error::TableError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Header {
    key_size: usize,
    value_size: usize,
}

impl Header {
    pub const fn new(key_size: usize, value_size: usize) -> Self {
        Self {
            key_size,
            value_size,
        }
    }

    #[inline]
    pub fn key_size(&self) -> usize {
        self.key_size
    }

    #[inline]
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Length of one entry block (key bytes followed by value bytes).
    #[inline]
    pub fn entry_len(&self) -> usize {
        self.key_size + self.value_size
    }

    /// Leading `key_size` bytes of a caller key buffer.
    ///
    /// # Panics
    /// If `key` is shorter than `key_size`.
    #[inline]
    pub(crate) fn key<'a>(&self, key: &'a [u8]) -> &'a [u8] {
        assert!(
            key.len() >= self.key_size,
            "key buffer is {} bytes, table expects {}",
            key.len(),
            self.key_size
        );
        &key[..self.key_size]
    }

    /// Leading `value_size` bytes of a caller value buffer.
    ///
    /// # Panics
    /// If `value` is shorter than `value_size`.
    #[inline]
    pub(crate) fn value<'a>(&self, value: &'a [u8]) -> &'a [u8] {
        assert!(
            value.len() >= self.value_size,
            "value buffer is {} bytes, table expects {}",
            value.len(),
            self.value_size
        );
        &value[..self.value_size]
    }

    pub(crate) fn try_key<'a>(&self, key: &'a [u8]) -> Result<&'a [u8], TableError> {
        key.get(..self.key_size).ok_or(TableError::KeySize {
            expected: self.key_size,
            actual: key.len(),
        })
    }

    pub(crate) fn try_value<'a>(&self, value: &'a [u8]) -> Result<&'a [u8], TableError> {
        value.get(..self.value_size).ok_or(TableError::ValueSize {
            expected: self.value_size,
            actual: value.len(),
        })
    }

    /// Build an entry block from already-sized key and value slices,
    /// reporting allocation failure instead of aborting.
    pub(crate) fn try_block(&self, key: &[u8], value: &[u8]) -> Result<Box<[u8]>, TableError> {
        debug_assert_eq!(key.len(), self.key_size);
        debug_assert_eq!(value.len(), self.value_size);
        let mut block = Vec::new();
        block.try_reserve_exact(self.entry_len())?;
        block.extend_from_slice(key);
        block.extend_from_slice(value);
        Ok(block.into_boxed_slice())
    }

    pub(crate) fn block(&self, key: &[u8], value: &[u8]) -> Box<[u8]> {
        debug_assert_eq!(key.len(), self.key_size);
        debug_assert_eq!(value.len(), self.value_size);
        let mut block = Vec::with_capacity(self.entry_len());
        block.extend_from_slice(key);
        block.extend_from_slice(value);
        block.into_boxed_slice()
    }

    #[inline]
    pub(crate) fn split<'a>(&self, block: &'a [u8]) -> (&'a [u8], &'a [u8]) {
        block.split_at(self.key_size)
    }

    #[inline]
    pub(crate) fn block_key<'a>(&self, block: &'a [u8]) -> &'a [u8] {
        &block[..self.key_size]
    }

    #[inline]
    pub(crate) fn block_value<'a>(&self, block: &'a [u8]) -> &'a [u8] {
        &block[self.key_size..]
    }

    #[inline]
    pub(crate) fn block_value_mut<'a>(&self, block: &'a mut [u8]) -> &'a mut [u8] {
        &mut block[self.key_size..]
    }
}
