//! ByteTable: fixed-capacity chained hash table over fixed-size byte keys
//! and values.

use crate::config::TableConfig;
use crate::cursor::{Cursor, CursorState};
use crate::error::TableError;
use crate::hash::{bucket_index, FnvBuildHasher};
use crate::header::Header;
use core::fmt;
use core::hash::BuildHasher;
use log::{debug, trace};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational link to an entry in a table's arena.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
struct Entry {
    block: Box<[u8]>, // key bytes, then value bytes
    next: Option<EntryKey>,
}

/// What a `set` did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SetOutcome {
    /// The key was absent; a new entry now heads its bucket's chain.
    Inserted,
    /// The key was present; its value bytes were overwritten in place.
    Updated,
}

/// Hash table keyed by `key_size`-byte keys holding `value_size`-byte
/// values, both fixed at construction.
///
/// Keys compare by byte equality. Buffers longer than the declared size
/// are truncated to it; shorter ones are a contract violation (panic, or
/// an error from [`ByteTable::try_set`]).
pub struct ByteTable<S = FnvBuildHasher> {
    header: Header,
    hasher: S,
    buckets: Box<[Option<EntryKey>]>,
    entries: SlotMap<EntryKey, Entry>,
    cursor: CursorState,
}

impl ByteTable {
    /// Table with the default configuration (100 buckets).
    pub fn new(key_size: usize, value_size: usize) -> Self {
        Self::with_config(key_size, value_size, TableConfig::default())
    }

    /// # Panics
    /// If `config` is invalid.
    pub fn with_config(key_size: usize, value_size: usize, config: TableConfig) -> Self {
        Self::with_config_and_hasher(key_size, value_size, config, FnvBuildHasher)
    }

    pub fn try_with_config(
        key_size: usize,
        value_size: usize,
        config: TableConfig,
    ) -> Result<Self, TableError> {
        Self::try_with_config_and_hasher(key_size, value_size, config, FnvBuildHasher)
    }
}

impl<S> ByteTable<S>
where
    S: BuildHasher,
{
    /// # Panics
    /// If `config` is invalid.
    pub fn with_config_and_hasher(
        key_size: usize,
        value_size: usize,
        config: TableConfig,
        hasher: S,
    ) -> Self {
        if let Err(e) = config.validate() {
            panic!("invalid table config: {e}");
        }
        let buckets = vec![None; config.capacity].into_boxed_slice();
        Self::from_parts(Header::new(key_size, value_size), hasher, buckets)
    }

    /// Like [`ByteTable::with_config_and_hasher`], but reports an invalid
    /// config or a failed bucket-store allocation as an error.
    pub fn try_with_config_and_hasher(
        key_size: usize,
        value_size: usize,
        config: TableConfig,
        hasher: S,
    ) -> Result<Self, TableError> {
        config.validate()?;
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(config.capacity)?;
        buckets.resize(config.capacity, None);
        Ok(Self::from_parts(
            Header::new(key_size, value_size),
            hasher,
            buckets.into_boxed_slice(),
        ))
    }

    fn from_parts(header: Header, hasher: S, buckets: Box<[Option<EntryKey>]>) -> Self {
        debug!(
            "created table: key_size={} value_size={} capacity={}",
            header.key_size(),
            header.value_size(),
            buckets.len()
        );
        Self {
            header,
            hasher,
            buckets,
            entries: SlotMap::with_key(),
            cursor: CursorState::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buckets; never changes.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn key_size(&self) -> usize {
        self.header.key_size()
    }
    pub fn value_size(&self) -> usize {
        self.header.value_size()
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// Bucket that `key` hashes to.
    pub fn bucket_of(&self, key: &[u8]) -> usize {
        self.bucket(self.header.key(key))
    }

    /// Number of entries chained in `bucket`; 0 for an out-of-range index.
    pub fn chain_len(&self, bucket: usize) -> usize {
        self.chain(bucket).count()
    }

    #[inline]
    fn bucket(&self, key: &[u8]) -> usize {
        bucket_index(&self.hasher, key, self.buckets.len())
    }

    fn chain(&self, bucket: usize) -> impl Iterator<Item = (EntryKey, &Entry)> + '_ {
        let mut link = self.buckets.get(bucket).copied().flatten();
        core::iter::from_fn(move || {
            let k = link?;
            let e = &self.entries[k];
            link = e.next;
            Some((k, e))
        })
    }

    fn find(&self, bucket: usize, key: &[u8]) -> Option<EntryKey> {
        self.chain(bucket)
            .find(|(_, e)| self.header.block_key(&e.block) == key)
            .map(|(k, _)| k)
    }

    /// Insert `key -> value`, or overwrite the value of an existing equal
    /// key in place. New entries are prepended to their bucket's chain.
    ///
    /// # Panics
    /// If `key` or `value` is shorter than the table's fixed sizes.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> SetOutcome {
        let key = self.header.key(key);
        let value = self.header.value(value);
        let bucket = self.bucket(key);
        if self.overwrite(bucket, key, value) {
            return SetOutcome::Updated;
        }
        let block = self.header.block(key, value);
        self.push_front(bucket, block);
        SetOutcome::Inserted
    }

    /// Fallible [`ByteTable::set`]: short buffers and a failed entry
    /// allocation come back as errors and leave the table unchanged,
    /// including an active cursor.
    pub fn try_set(&mut self, key: &[u8], value: &[u8]) -> Result<SetOutcome, TableError> {
        let key = self.header.try_key(key)?;
        let value = self.header.try_value(value)?;
        let bucket = self.bucket(key);
        if self.overwrite(bucket, key, value) {
            return Ok(SetOutcome::Updated);
        }
        let block = self.header.try_block(key, value)?;
        self.push_front(bucket, block);
        Ok(SetOutcome::Inserted)
    }

    fn overwrite(&mut self, bucket: usize, key: &[u8], value: &[u8]) -> bool {
        let Some(k) = self.find(bucket, key) else {
            return false;
        };
        self.header
            .block_value_mut(&mut self.entries[k].block)
            .copy_from_slice(value);
        self.cursor.invalidate();
        trace!("updated entry in bucket {}", bucket);
        true
    }

    fn push_front(&mut self, bucket: usize, block: Box<[u8]>) {
        let next = self.buckets[bucket];
        let k = self.entries.insert(Entry { block, next });
        self.buckets[bucket] = Some(k);
        self.cursor.invalidate();
        trace!(
            "inserted entry in bucket {} (len now {})",
            bucket,
            self.entries.len()
        );
    }

    /// Value stored under `key`.
    ///
    /// # Panics
    /// If `key` is absent; use [`ByteTable::try_get`] to test for presence.
    pub fn get(&self, key: &[u8]) -> &[u8] {
        match self.try_get(key) {
            Some(v) => v,
            None => panic!("key {:02x?} not found in table", self.header.key(key)),
        }
    }

    pub fn try_get(&self, key: &[u8]) -> Option<&[u8]> {
        let key = self.header.key(key);
        let k = self.find(self.bucket(key), key)?;
        Some(self.header.block_value(&self.entries[k].block))
    }

    /// Mutable view of the value stored under `key`. Editing a value is not
    /// a structural change and leaves an active cursor usable.
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut [u8]> {
        let key = self.header.key(key);
        let k = self.find(self.bucket(key), key)?;
        Some(self.header.block_value_mut(&mut self.entries[k].block))
    }

    pub fn exists(&self, key: &[u8]) -> bool {
        self.try_get(key).is_some()
    }

    /// Remove the entry for `key`. Returns false, and changes nothing, if
    /// the key is absent.
    pub fn delete(&mut self, key: &[u8]) -> bool {
        self.unlink(key).is_some()
    }

    /// Remove the entry for `key` and hand back its value bytes.
    pub fn remove(&mut self, key: &[u8]) -> Option<Box<[u8]>> {
        let entry = self.unlink(key)?;
        Some(self.header.block_value(&entry.block).into())
    }

    fn unlink(&mut self, key: &[u8]) -> Option<Entry> {
        let key = self.header.key(key);
        let bucket = self.bucket(key);
        let mut prev: Option<EntryKey> = None;
        let mut link = self.buckets[bucket];
        while let Some(k) = link {
            let entry = &self.entries[k];
            if self.header.block_key(&entry.block) == key {
                let next = entry.next;
                match prev {
                    None => self.buckets[bucket] = next,
                    Some(p) => self.entries[p].next = next,
                }
                self.cursor.invalidate();
                trace!("deleted entry from bucket {} (head: {})", bucket, prev.is_none());
                return self.entries.remove(k);
            }
            prev = Some(k);
            link = entry.next;
        }
        None
    }

    /// Drop every entry, keeping the bucket store.
    pub fn clear(&mut self) {
        debug!("clearing table: releasing {} entries", self.entries.len());
        self.entries.clear();
        self.buckets.fill(None);
        self.cursor.invalidate();
    }

    /// Reset the cursor to the first bucket.
    pub fn rewind(&mut self) {
        self.cursor.rewind();
    }

    /// Current cursor coordinates.
    pub fn cursor(&self) -> Cursor {
        self.cursor.position()
    }

    /// Advance the cursor and return the next value, walking buckets in
    /// ascending order and each chain from its head. Returns `None` once
    /// the pass is complete.
    ///
    /// # Panics
    /// If the table was structurally mutated (`set`, a successful `delete`
    /// or `remove`, `clear`) since the last [`ByteTable::rewind`].
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&[u8]> {
        self.next_entry().map(|(_, v)| v)
    }

    /// [`ByteTable::next`], yielding the key alongside the value.
    pub fn next_entry(&mut self) -> Option<(&[u8], &[u8])> {
        let entries = &self.entries;
        let k = self.cursor.advance(&self.buckets, |k| entries[k].next)?;
        Some(self.header.split(&self.entries[k].block))
    }

    /// Borrowing iterator over `(key, value)` in cursor order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            header: self.header,
            buckets: self.buckets.iter(),
            entries: &self.entries,
            link: None,
            remaining: self.entries.len(),
        }
    }

    /// Consume and release the table. Same as dropping it.
    pub fn destroy(self) {}
}

impl<S> Drop for ByteTable<S> {
    fn drop(&mut self) {
        debug!(
            "dropping table: releasing {} entries and {} buckets",
            self.entries.len(),
            self.buckets.len()
        );
    }
}

impl<S> fmt::Debug for ByteTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteTable")
            .field("key_size", &self.header.key_size())
            .field("value_size", &self.header.value_size())
            .field("capacity", &self.buckets.len())
            .field("len", &self.entries.len())
            .field("cursor", &self.cursor.position())
            .finish()
    }
}

/// Iterator over `(key, value)` byte slices of a [`ByteTable`].
pub struct Iter<'a> {
    header: Header,
    buckets: core::slice::Iter<'a, Option<EntryKey>>,
    entries: &'a SlotMap<EntryKey, Entry>,
    link: Option<EntryKey>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], &'a [u8]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entries: &'a SlotMap<EntryKey, Entry> = self.entries;
        loop {
            if let Some(k) = self.link {
                let e = &entries[k];
                self.link = e.next;
                self.remaining -= 1;
                return Some(self.header.split(&e.block));
            }
            self.link = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a, S> IntoIterator for &'a ByteTable<S>
where
    S: BuildHasher,
{
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
