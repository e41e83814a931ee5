//! Stateful full-table cursor.
//!
//! The cursor walks bucket heads in ascending order and follows each
//! chain link by link. It remembers the link of the next entry to yield
//! rather than an offset into the chain, so a pass never skips or repeats
//! an entry.
//!
//! Structural mutation invalidates an active cursor. The table bumps a
//! mutation epoch on every `set`/`delete`/`clear`; `rewind` binds the
//! cursor to the current epoch and advancing a cursor bound to an older
//! epoch panics.

use crate::byte_table::EntryKey;

/// Observable cursor coordinates: the bucket being walked and how many
/// entries of that bucket's chain have been yielded so far.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Cursor {
    pub bucket: usize,
    pub position: usize,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Step {
    /// Next read is the head of `at.bucket`.
    Head,
    /// Next read is this entry of `at.bucket`'s chain.
    At(EntryKey),
}

#[derive(Debug)]
pub(crate) struct CursorState {
    at: Cursor,
    step: Step,
    epoch: u64,
    bound: u64,
}

impl CursorState {
    pub(crate) const fn new() -> Self {
        Self {
            at: Cursor {
                bucket: 0,
                position: 0,
            },
            step: Step::Head,
            epoch: 0,
            bound: 0,
        }
    }

    #[inline]
    pub(crate) fn position(&self) -> Cursor {
        self.at
    }

    pub(crate) fn rewind(&mut self) {
        self.at = Cursor::default();
        self.step = Step::Head;
        self.bound = self.epoch;
    }

    /// Record a structural mutation of the owning table.
    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    #[inline]
    pub(crate) fn is_stale(&self) -> bool {
        self.bound != self.epoch
    }

    /// Advance to the next live entry. `heads` is the bucket store and
    /// `next_of` follows a chain link. Returns `None` once every bucket is
    /// exhausted, and keeps returning `None` until the next rewind.
    ///
    /// # Panics
    /// If the table was mutated since the last rewind.
    pub(crate) fn advance<F>(
        &mut self,
        heads: &[Option<EntryKey>],
        next_of: F,
    ) -> Option<EntryKey>
    where
        F: Fn(EntryKey) -> Option<EntryKey>,
    {
        assert!(
            !self.is_stale(),
            "table mutated during cursor iteration; call rewind first"
        );
        while self.at.bucket < heads.len() {
            let link = match self.step {
                Step::Head => heads[self.at.bucket],
                Step::At(k) => Some(k),
            };
            let Some(k) = link else {
                self.next_bucket();
                continue;
            };
            match next_of(k) {
                Some(n) => {
                    self.step = Step::At(n);
                    self.at.position += 1;
                }
                // Tail yielded: park on the next bucket's head.
                None => self.next_bucket(),
            }
            return Some(k);
        }
        None
    }

    #[inline]
    fn next_bucket(&mut self) {
        self.at.bucket += 1;
        self.at.position = 0;
        self.step = Step::Head;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    // Build chains in an arena; each chain is linked head-first.
    #[allow(clippy::type_complexity)]
    fn chains(shape: &[usize]) -> (Vec<Option<EntryKey>>, SlotMap<EntryKey, Option<EntryKey>>) {
        let mut arena: SlotMap<EntryKey, Option<EntryKey>> = SlotMap::with_key();
        let mut heads = Vec::new();
        for &len in shape {
            let mut head = None;
            for _ in 0..len {
                head = Some(arena.insert(head));
            }
            heads.push(head);
        }
        (heads, arena)
    }

    fn drain(
        c: &mut CursorState,
        heads: &[Option<EntryKey>],
        arena: &SlotMap<EntryKey, Option<EntryKey>>,
    ) -> Vec<EntryKey> {
        let mut out = Vec::new();
        while let Some(k) = c.advance(heads, |k| arena[k]) {
            out.push(k);
        }
        out
    }

    #[test]
    fn visits_every_entry_once_in_bucket_order() {
        let (heads, arena) = chains(&[0, 3, 0, 1, 2, 0]);
        let mut c = CursorState::new();
        c.rewind();
        let seen = drain(&mut c, &heads, &arena);
        assert_eq!(seen.len(), 6);
        let mut uniq = seen.clone();
        uniq.sort();
        uniq.dedup();
        assert_eq!(uniq.len(), 6);
        assert_eq!(seen[0], heads[1].unwrap());
        assert_eq!(seen[3], heads[3].unwrap());
        assert_eq!(seen[4], heads[4].unwrap());
    }

    #[test]
    fn exhausted_cursor_stays_exhausted() {
        let (heads, arena) = chains(&[1, 1]);
        let mut c = CursorState::new();
        assert_eq!(drain(&mut c, &heads, &arena).len(), 2);
        assert!(c.advance(&heads, |k| arena[k]).is_none());
        assert!(c.advance(&heads, |k| arena[k]).is_none());
        c.rewind();
        assert_eq!(drain(&mut c, &heads, &arena).len(), 2);
    }

    #[test]
    fn position_tracks_chain_offset() {
        let (heads, arena) = chains(&[3]);
        let mut c = CursorState::new();
        assert_eq!(c.position(), Cursor { bucket: 0, position: 0 });
        c.advance(&heads, |k| arena[k]);
        assert_eq!(c.position(), Cursor { bucket: 0, position: 1 });
        c.advance(&heads, |k| arena[k]);
        assert_eq!(c.position(), Cursor { bucket: 0, position: 2 });
        c.advance(&heads, |k| arena[k]);
        assert_eq!(c.position(), Cursor { bucket: 1, position: 0 });
    }

    #[test]
    fn empty_store_yields_nothing() {
        let mut c = CursorState::new();
        assert!(c.advance(&[], |_| None).is_none());
        assert!(c.advance(&[None, None], |_| None).is_none());
    }

    #[test]
    fn invalidate_marks_stale_until_rewind() {
        let mut c = CursorState::new();
        assert!(!c.is_stale());
        c.invalidate();
        assert!(c.is_stale());
        c.rewind();
        assert!(!c.is_stale());
    }

    #[test]
    fn advancing_stale_cursor_panics() {
        let (heads, arena) = chains(&[2]);
        let mut c = CursorState::new();
        c.invalidate();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = c.advance(&heads, |k| arena[k]);
        }));
        assert!(res.is_err(), "expected stale cursor to panic");
    }
}
