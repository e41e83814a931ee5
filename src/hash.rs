//! FNV-1a hashing over raw key bytes and reduction to a bucket index.

use core::hash::{BuildHasher, Hasher};

/// 64-bit FNV-1a. Not collision resistant; fast and deterministic.
#[derive(Debug, Copy, Clone)]
pub struct FnvHasher {
    hash: u64,
}

impl FnvHasher {
    pub const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    pub const PRIME: u64 = 0x0000_0100_0000_01b3;

    pub const fn new() -> Self {
        Self {
            hash: Self::OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash ^= u64::from(b);
            self.hash = self.hash.wrapping_mul(Self::PRIME);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }
}

/// Builder for [`FnvHasher`]; the default hasher of every table.
#[derive(Debug, Copy, Clone, Default)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> Self::Hasher {
        FnvHasher::new()
    }
}

/// Digest of exactly `key`'s bytes. Bypasses `Hash for [u8]`, which would
/// also feed the slice length into the hasher.
#[inline]
pub fn digest<S: BuildHasher>(hasher: &S, key: &[u8]) -> u64 {
    let mut h = hasher.build_hasher();
    h.write(key);
    h.finish()
}

/// Bucket selected for `key` in a table of `capacity` buckets.
#[inline]
pub fn bucket_index<S: BuildHasher>(hasher: &S, key: &[u8], capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (digest(hasher, key) % capacity as u64) as usize
}
