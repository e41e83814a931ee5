//! chain-table: a single-threaded hash table with a fixed number of
//! buckets, chained collision resolution and a stateful iteration cursor,
//! storing fixed-size byte keys and values.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one table implementation usable for any key/value pair whose
//!   sizes are known up front, with the byte layout kept in one place and
//!   a typed API layered on top.
//! - Layers:
//!   - Header: the per-table `key_size`/`value_size` record. Owns the
//!     layout of an entry block (key bytes, then value bytes) and the
//!     buffer-size contract.
//!   - ByteTable<S>: bucket store of chain heads, entries in a generational
//!     arena linked through their keys, FNV-1a hashing by default, and the
//!     cursor.
//!   - Table<K, V, S>: typed facade for `bytemuck::Pod` keys and values.
//!
//! Constraints
//! - Single-threaded: mutation takes `&mut self`; nothing is shared.
//! - Capacity (bucket count) is set at construction and never grows. The
//!   default is 100 buckets.
//! - Keys compare by byte equality over exactly `key_size` bytes. Longer
//!   buffers are truncated; shorter ones panic (or error via `try_set`).
//! - At most one entry per key; a second `set` overwrites in place.
//! - New entries are prepended to their bucket's chain, so chain order is
//!   most-recently-inserted first. This is observable through the cursor.
//!
//! Chains
//! - Entries live in a `SlotMap` arena and link to the next entry of
//!   their chain by arena key. Deletion tracks the predecessor link; the
//!   head case rewrites the bucket slot itself.
//! - One boxed block per entry holds both key and value, so an entry is a
//!   single allocation besides its arena slot.
//!
//! Cursor
//! - `rewind` then repeated `next` walks buckets `0..capacity` and each
//!   chain from its head, yielding every live entry exactly once.
//! - The cursor stores the link of the next entry, not an offset, so it
//!   cannot skip or double-visit.
//! - Structural mutation (`set`, a successful `delete`/`remove`, `clear`)
//!   bumps a mutation epoch. Advancing a cursor bound to an older epoch
//!   panics; `rewind` rebinds it. `get_mut` edits values without
//!   invalidating.
//! - `iter()` is the borrowing alternative and cannot observe mutation.
//!
//! Failure tiers
//! - Panicking: `new`/`with_config` (invalid config), `set` (short
//!   buffers), `get` (missing key). Allocation failure aborts as usual.
//! - Fallible: `try_with_config`, `try_set`, `try_get` report through
//!   `TableError` or `Option`.
//! - Not errors: deleting a missing key returns `false`; `exists` on a
//!   missing key returns `false`; an exhausted cursor returns `None`.
//!
//! Logging
//! - Uses the `log` facade: `debug` for construction, clearing and drop,
//!   `trace` for each insert, overwrite and delete. No logger is installed.

pub mod byte_table;
mod byte_table_proptest;
pub mod config;
pub mod cursor;
pub mod error;
pub mod hash;
pub mod header;
pub mod table;

// Public surface
pub use byte_table::{ByteTable, Iter, SetOutcome};
pub use config::{TableConfig, DEFAULT_CAPACITY};
pub use cursor::Cursor;
pub use error::TableError;
pub use hash::{FnvBuildHasher, FnvHasher};
pub use header::Header;
pub use table::Table;
