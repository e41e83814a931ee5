//! Table: typed facade over `ByteTable` for plain-old-data keys and values.
//!
//! `K` and `V` are viewed as their raw bytes through `bytemuck`, so key
//! equality is byte equality (`-0.0` and `0.0` are different float keys).
//! Entry blocks carry no alignment guarantee; values are copied out with
//! `pod_read_unaligned` rather than borrowed.

use crate::byte_table::{ByteTable, SetOutcome};
use crate::config::TableConfig;
use crate::cursor::Cursor;
use crate::error::TableError;
use crate::hash::FnvBuildHasher;
use bytemuck::{bytes_of, pod_read_unaligned, Pod};
use core::fmt;
use core::hash::BuildHasher;
use core::marker::PhantomData;
use core::mem::size_of;

pub struct Table<K, V, S = FnvBuildHasher> {
    raw: ByteTable<S>,
    _pd: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Table<K, V>
where
    K: Pod,
    V: Pod,
{
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// # Panics
    /// If `config` is invalid.
    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, FnvBuildHasher)
    }

    pub fn try_with_config(config: TableConfig) -> Result<Self, TableError> {
        Self::try_with_config_and_hasher(config, FnvBuildHasher)
    }
}

impl<K, V> Default for Table<K, V>
where
    K: Pod,
    V: Pod,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Table<K, V, S>
where
    K: Pod,
    V: Pod,
    S: BuildHasher,
{
    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Self {
        Self {
            raw: ByteTable::with_config_and_hasher(size_of::<K>(), size_of::<V>(), config, hasher),
            _pd: PhantomData,
        }
    }

    pub fn try_with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self, TableError> {
        let raw =
            ByteTable::try_with_config_and_hasher(size_of::<K>(), size_of::<V>(), config, hasher)?;
        Ok(Self {
            raw,
            _pd: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    pub fn bucket_of(&self, key: &K) -> usize {
        self.raw.bucket_of(bytes_of(key))
    }

    pub fn set(&mut self, key: &K, value: V) -> SetOutcome {
        self.raw.set(bytes_of(key), bytes_of(&value))
    }

    /// Buffers always match the declared sizes here, so the only possible
    /// error is a failed entry allocation.
    pub fn try_set(&mut self, key: &K, value: V) -> Result<SetOutcome, TableError> {
        self.raw.try_set(bytes_of(key), bytes_of(&value))
    }

    /// # Panics
    /// If `key` is absent.
    pub fn get(&self, key: &K) -> V {
        pod_read_unaligned(self.raw.get(bytes_of(key)))
    }

    pub fn try_get(&self, key: &K) -> Option<V> {
        self.raw.try_get(bytes_of(key)).map(pod_read_unaligned)
    }

    /// Apply `f` to the value under `key` in place. Returns false if the
    /// key is absent.
    pub fn update<F>(&mut self, key: &K, f: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        let Some(bytes) = self.raw.get_mut(bytes_of(key)) else {
            return false;
        };
        let mut value: V = pod_read_unaligned(bytes);
        f(&mut value);
        bytes.copy_from_slice(bytes_of(&value));
        true
    }

    pub fn exists(&self, key: &K) -> bool {
        self.raw.exists(bytes_of(key))
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.raw.delete(bytes_of(key))
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.raw.remove(bytes_of(key)).map(|b| pod_read_unaligned(&b))
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    pub fn rewind(&mut self) {
        self.raw.rewind();
    }

    pub fn cursor(&self) -> Cursor {
        self.raw.cursor()
    }

    /// See [`ByteTable::next`].
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<V> {
        self.raw.next().map(pod_read_unaligned)
    }

    pub fn next_entry(&mut self) -> Option<(K, V)> {
        self.raw
            .next_entry()
            .map(|(k, v)| (pod_read_unaligned(k), pod_read_unaligned(v)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.raw
            .iter()
            .map(|(k, v)| (pod_read_unaligned(k), pod_read_unaligned(v)))
    }

    /// The underlying byte-level table.
    pub fn as_bytes(&self) -> &ByteTable<S> {
        &self.raw
    }

    pub fn destroy(self) {}
}

impl<K, V, S> fmt::Debug for Table<K, V, S>
where
    K: Pod + fmt::Debug,
    V: Pod + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_types() {
        let t: Table<u16, [u64; 3]> = Table::new();
        assert_eq!(t.as_bytes().key_size(), 2);
        assert_eq!(t.as_bytes().value_size(), 24);
        assert_eq!(t.capacity(), 100);
    }

    #[test]
    fn fixed_size_string_key() {
        let mut t: Table<[u8; 4], i32> = Table::new();
        t.set(b"user", 42);
        assert_eq!(t.get(b"user"), 42);
        assert!(t.exists(b"user"));
        assert_eq!(t.try_get(b"nope"), None);
    }

    #[test]
    fn update_in_place() {
        let mut t: Table<u32, u64> = Table::new();
        t.set(&7, 10);
        assert!(t.update(&7, |v| *v += 5));
        assert_eq!(t.get(&7), 15);
        assert!(!t.update(&8, |v| *v += 5));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn remove_returns_typed_value() {
        let mut t: Table<u8, f64> = Table::new();
        t.set(&1, 2.5);
        assert_eq!(t.remove(&1), Some(2.5));
        assert_eq!(t.remove(&1), None);
        assert!(!t.delete(&1));
    }

    #[test]
    fn debug_lists_entries() {
        let mut t: Table<u8, u8> = Table::new();
        t.set(&1, 2);
        assert_eq!(format!("{:?}", t), "{1: 2}");
    }
}
