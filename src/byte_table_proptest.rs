#![cfg(test)]

// Property tests for ByteTable kept inside the crate so they can inspect
// chain structure through crate-private accessors.

use crate::byte_table::{ByteTable, SetOutcome};
use crate::config::TableConfig;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

type Key = [u8; 3];

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, u32),
    TrySet(usize, u32),
    Get(usize),
    Exists(Key),
    Delete(usize),
    Remove(usize),
    Mutate(usize, u32),
    Iterate,
    CursorPass,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<Key>, Vec<OpI>)> {
    proptest::collection::vec(any::<Key>(), 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let exists_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<u32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => (idx.clone(), any::<u32>()).prop_map(|(i, v)| OpI::TrySet(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![exists_pool, any::<Key>()].prop_map(OpI::Exists),
            2 => idx.clone().prop_map(OpI::Delete),
            1 => idx.clone().prop_map(OpI::Remove),
            1 => (idx.clone(), any::<u32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::CursorPass),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn val(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

fn read(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes.try_into().expect("value is 4 bytes"))
}

// Drive `sut` through `ops` and compare against a HashMap model.
// Invariants checked across random operation sequences:
// - `set` reports Inserted iff the key was absent; overwrites keep one entry.
// - `get`/`try_get`/`exists` agree with the model, independent of value content.
// - `delete`/`remove` report presence correctly and unlink only the target.
// - `iter` and a full cursor pass each yield every live entry exactly once.
// - Every entry sits in the bucket its key hashes to; chain lengths sum to `len`.
fn run_state_machine<S: BuildHasher>(
    mut sut: ByteTable<S>,
    pool: &[Key],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, u32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let k = pool[i];
                let already = model.contains_key(&k);
                let out = sut.set(&k, &val(v));
                prop_assert_eq!(out == SetOutcome::Updated, already);
                model.insert(k, v);
            }
            OpI::TrySet(i, v) => {
                let k = pool[i];
                let already = model.contains_key(&k);
                let out = sut.try_set(&k, &val(v));
                prop_assert!(out.is_ok());
                prop_assert_eq!(out.ok() == Some(SetOutcome::Updated), already);
                model.insert(k, v);
            }
            OpI::Get(i) => {
                let k = pool[i];
                let got = sut.try_get(&k).map(read);
                prop_assert_eq!(got, model.get(&k).copied());
                if let Some(&mv) = model.get(&k) {
                    prop_assert_eq!(read(sut.get(&k)), mv);
                }
            }
            OpI::Exists(k) => {
                prop_assert_eq!(sut.exists(&k), model.contains_key(&k));
            }
            OpI::Delete(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.delete(&k), model.remove(&k).is_some());
                prop_assert!(!sut.exists(&k));
            }
            OpI::Remove(i) => {
                let k = pool[i];
                let got = sut.remove(&k).map(|b| read(&b));
                prop_assert_eq!(got, model.remove(&k));
            }
            OpI::Mutate(i, d) => {
                let k = pool[i];
                match sut.get_mut(&k) {
                    Some(bytes) => {
                        let nv = read(bytes).wrapping_add(d);
                        bytes.copy_from_slice(&val(nv));
                        let mv = model.get_mut(&k).expect("present in model");
                        *mv = mv.wrapping_add(d);
                    }
                    None => {
                        prop_assert!(!model.contains_key(&k));
                    }
                }
            }
            OpI::Iterate => {
                let seen: BTreeMap<Vec<u8>, u32> =
                    sut.iter().map(|(k, v)| (k.to_vec(), read(v))).collect();
                prop_assert_eq!(seen.len(), sut.len());
                let expected: BTreeMap<Vec<u8>, u32> =
                    model.iter().map(|(k, v)| (k.to_vec(), *v)).collect();
                prop_assert_eq!(seen, expected);
            }
            OpI::CursorPass => {
                sut.rewind();
                let mut keys: Vec<Vec<u8>> = Vec::new();
                while let Some((k, _)) = sut.next_entry() {
                    keys.push(k.to_vec());
                }
                prop_assert!(sut.next().is_none());
                let uniq: BTreeSet<_> = keys.iter().cloned().collect();
                prop_assert_eq!(uniq.len(), keys.len(), "cursor revisited an entry");
                let m_keys: BTreeSet<_> = model.keys().map(|k| k.to_vec()).collect();
                prop_assert_eq!(uniq, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        // 1) Size parity
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // 2) Chains partition the entries and each key sits in its own bucket
        let total: usize = (0..sut.capacity()).map(|b| sut.chain_len(b)).sum();
        prop_assert_eq!(total, sut.len());
        for k in model.keys() {
            let b = sut.bucket_of(k);
            prop_assert!(b < sut.capacity());
            prop_assert!(sut.chain_len(b) > 0);
        }
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap with
// the default FNV hasher and a small bucket count so chains form.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut = ByteTable::with_config(3, 4, TableConfig::new().with_capacity(5));
        run_state_machine(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress chain maintenance.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants under worst-case collisions, where every
// delete exercises head, interior or tail unlinking in a single chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = ByteTable::with_config_and_hasher(3, 4, TableConfig::default(), ConstBuildHasher);
        run_state_machine(sut, &pool, ops)?;
    }
}

// Property: the bucket chosen for a key never changes within a table and
// is always in range, for any capacity.
proptest! {
    #[test]
    fn prop_bucket_is_stable(key in proptest::collection::vec(any::<u8>(), 8), cap in 1usize..500) {
        let t = ByteTable::with_config(8, 1, TableConfig::new().with_capacity(cap));
        let b = t.bucket_of(&key);
        prop_assert!(b < cap);
        prop_assert_eq!(b, t.bucket_of(&key));
    }
}
