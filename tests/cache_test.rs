//! Tests for the strict-FIFO [`FifoCache`] and the microblock and inventory caches built on it.

mod common;

use ng_rs::cache::{FifoCache, InvCache, MicroBlockCache};

use common::blocks::{id, keypair, micro_block, signed_micro_block};

#[test]
fn evicts_exactly_the_first_inserted_key() {
    let mut cache = FifoCache::new(4);
    for key in 0..5u32 {
        cache.add(key, key * 10);
    }

    assert_eq!(cache.len(), 4);
    assert_eq!(cache.get(&0), None);
    assert!(!cache.exists(&0));
    for key in 1..5u32 {
        assert_eq!(cache.get(&key), Some(&(key * 10)));
    }
}

#[test]
fn reading_does_not_extend_an_entry_lifetime() {
    let mut cache = FifoCache::new(2);
    cache.add("a", 1);
    cache.add("b", 2);

    // Reading "a" must not protect it: eviction is by insertion, not by use.
    assert_eq!(cache.get(&"a"), Some(&1));
    assert!(cache.exists(&"a"));
    cache.add("c", 3);

    assert!(!cache.exists(&"a"));
    assert!(cache.exists(&"b"));
    assert!(cache.exists(&"c"));
}

#[test]
fn re_adding_a_key_replaces_its_value_in_place() {
    let mut cache = FifoCache::new(2);
    cache.add(1, "one");
    cache.add(2, "two");
    cache.add(1, "uno");

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&1), Some(&"uno"));

    // Key 1 keeps its original slot, so it is still the oldest.
    cache.add(3, "three");
    assert!(!cache.exists(&1));
    assert!(cache.exists(&2));
}

#[test]
fn zero_capacity_holds_one_entry() {
    let mut cache = FifoCache::new(0);
    assert_eq!(cache.capacity(), 1);
    cache.add(1, ());
    cache.add(2, ());
    assert_eq!(cache.len(), 1);
    assert!(cache.exists(&2));
}

#[test]
fn micro_block_cache_is_keyed_by_total_id() {
    let cache = MicroBlockCache::new(2);
    let first = micro_block(id(10), id(1));
    let second = micro_block(id(11), id(10));
    let third = micro_block(id(12), id(11));

    cache.add(first.clone());
    assert_eq!(cache.get(&id(10)).as_deref(), Some(&first));
    // The reference is not a key.
    assert!(!cache.exists(&id(1)));

    cache.add(second);
    cache.add(third.clone());
    assert_eq!(cache.len(), 2);
    assert!(cache.get(&id(10)).is_none());
    assert_eq!(cache.get(&id(12)).as_deref(), Some(&third));
}

#[test]
fn clones_of_a_cache_share_entries() {
    let cache = MicroBlockCache::new(4);
    let reader = cache.clone();
    cache.add(micro_block(id(2), id(1)));
    assert!(reader.exists(&id(2)));
}

#[test]
fn inv_cache_is_keyed_by_announced_total_id() {
    let keypair = keypair();
    let cache = InvCache::new(1);
    let first = signed_micro_block(&keypair, id(1)).inv(&keypair);
    let second = signed_micro_block(&keypair, id(1)).inv(&keypair);

    cache.add(first.clone());
    assert!(cache.exists(&first.total_id));
    assert_eq!(cache.get(&first.total_id).as_deref(), Some(&first));

    cache.add(second.clone());
    assert!(!cache.exists(&first.total_id));
    assert!(cache.exists(&second.total_id));
    assert_eq!(cache.len(), 1);
}
