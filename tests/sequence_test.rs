//! Tests for the tentative chain [`Blocks`] sequence: attaching key blocks and microblocks, deriving
//! rows, rejecting orphans, and shrinking.

mod common;

use ng_rs::{
    chain::{Blocks, ChainError, Row},
    types::block::{KeyBlock, MicroBlock},
};

use common::blocks::{id, key_block, micro_block};

fn assert_row(row: &Row, key: &KeyBlock, micros: &[MicroBlock]) {
    assert_eq!(*row.key_block, *key);
    let actual: Vec<MicroBlock> = row.micro_blocks.iter().map(|m| MicroBlock::clone(m)).collect();
    assert_eq!(actual, micros.to_vec());
}

// K1 <- M1 <- K2 <- M2
fn k1_m1_k2_m2() -> (Blocks, KeyBlock, MicroBlock, KeyBlock, MicroBlock) {
    let k1 = key_block(id(1), id(0));
    let m1 = micro_block(id(2), id(1));
    let k2 = key_block(id(3), id(2));
    let m2 = micro_block(id(4), id(3));
    let blocks = Blocks::from_key_block(k1.clone())
        .add_micro(m1.clone())
        .unwrap()
        .add_block(k2.clone())
        .unwrap()
        .add_micro(m2.clone())
        .unwrap();
    (blocks, k1, m1, k2, m2)
}

#[test]
fn new_sequence_holds_one_row() {
    let k1 = key_block(id(1), id(0));
    let blocks = Blocks::from_key_block(k1.clone());

    assert_eq!(blocks.len(), 1);
    assert_row(&blocks.row(), &k1, &[]);
    assert_eq!(blocks.previous_row(), Err(ChainError::NoPreviousRow));
    assert_eq!(blocks.last_id(), Some(&id(1)));
}

#[test]
fn row_and_previous_row() {
    let (blocks, k1, m1, k2, m2) = k1_m1_k2_m2();

    assert_eq!(blocks.len(), 4);
    assert_row(&blocks.row(), &k2, &[m2]);
    assert_row(&blocks.previous_row().unwrap(), &k1, &[m1]);
    assert_eq!(blocks.row().last_id(), &id(4));
}

#[test]
fn adding_leaves_the_original_untouched() {
    let (blocks, _, _, k2, m2) = k1_m1_k2_m2();
    let before = blocks.clone();
    let first_row = blocks.row();

    let with_micro = blocks.add_micro(micro_block(id(5), id(4))).unwrap();
    let with_block = blocks.add_block(key_block(id(6), id(4))).unwrap();

    assert_eq!(blocks, before);
    assert_eq!(blocks.len(), 4);
    assert_row(&blocks.row(), &k2, &[m2]);
    assert_eq!(blocks.row(), first_row);
    assert_ne!(with_micro, blocks);
    assert_ne!(with_block, blocks);
    assert_eq!(with_micro.len(), 5);
    assert_eq!(with_block.len(), 5);
}

#[test]
fn attaching_to_an_earlier_element_drops_what_followed_it() {
    let k1 = key_block(id(1), id(0));
    let m1 = micro_block(id(2), id(1));
    let m2 = micro_block(id(3), id(2));
    let blocks = Blocks::from_key_block(k1.clone())
        .add_micro(m1.clone())
        .unwrap()
        .add_micro(m2)
        .unwrap();

    // A competing microblock extending m1.
    let m2_prime = micro_block(id(4), id(2));
    let forked = blocks.add_micro(m2_prime.clone()).unwrap();
    assert_row(&forked.row(), &k1, &[m1, m2_prime]);
    assert!(!forked.contains_id(&id(3)));

    // The next key block built directly on k1, discarding every microblock.
    let k2 = key_block(id(5), id(1));
    let rebased = blocks.add_block(k2.clone()).unwrap();
    assert_eq!(rebased.len(), 2);
    assert_row(&rebased.row(), &k2, &[]);
    assert_row(&rebased.previous_row().unwrap(), &k1, &[]);
}

#[test]
fn orphans_are_rejected() {
    let (blocks, ..) = k1_m1_k2_m2();
    let before = blocks.clone();

    assert_eq!(
        blocks.add_block(key_block(id(10), id(99))),
        Err(ChainError::ParentNotFound { parent: id(99) })
    );
    assert_eq!(
        blocks.add_micro(micro_block(id(11), id(98))),
        Err(ChainError::ParentNotFound { parent: id(98) })
    );
    assert_eq!(blocks, before);
}

#[test]
fn contains_id_matches_key_blocks_and_micro_blocks() {
    let (blocks, ..) = k1_m1_k2_m2();

    for n in 1..=4 {
        assert!(blocks.contains_id(&id(n)));
    }
    // The parent of the first key block is not an element of the sequence.
    assert!(!blocks.contains_id(&id(0)));
    assert!(!blocks.contains_id(&id(5)));
}

#[test]
fn adding_a_micro_block_to_an_empty_sequence_yields_an_empty_sequence() {
    let blocks = Blocks::empty();
    let result = blocks.add_micro(micro_block(id(2), id(1))).unwrap();
    assert!(result.is_empty());
}

#[test]
#[should_panic]
fn adding_a_key_block_to_an_empty_sequence_panics() {
    let _ = Blocks::empty().add_block(key_block(id(1), id(0)));
}

#[test]
#[should_panic]
fn row_of_an_empty_sequence_panics() {
    let _ = Blocks::empty().row();
}

// K0, then `pairs` times (K, M), each element extending the one before it.
fn alternating(pairs: u64, soft_cap: usize) -> Blocks {
    let mut blocks = Blocks::from_key_block_with_soft_cap(key_block(id(1), id(0)), soft_cap);
    let mut last = 1;
    for _ in 0..pairs {
        blocks = blocks.add_block(key_block(id(last + 1), id(last))).unwrap();
        blocks = blocks.add_micro(micro_block(id(last + 2), id(last + 1))).unwrap();
        last += 2;
    }
    blocks
}

#[test]
fn shrink_keeps_the_latest_rows() {
    let original = alternating(60, usize::MAX);
    assert_eq!(original.len(), 121);

    let shrunk = original.with_soft_cap(100).shrink();

    // Only the oldest row, made of the lone first key block, is dropped.
    assert_eq!(shrunk.len(), 120);
    assert_eq!(shrunk.iter().next().unwrap().id(), &id(2));
    assert!(shrunk.iter().next().unwrap().is_key_block());
    assert_eq!(shrunk.row(), original.row());
    assert_eq!(shrunk.previous_row(), original.previous_row());
    assert_eq!(shrunk.last_id(), original.last_id());
}

#[test]
fn shrink_drops_one_row_per_call() {
    let blocks = alternating(60, 100);
    let original = alternating(60, usize::MAX).with_soft_cap(100);
    // Shrinking after every add never lets the sequence outgrow the cap by more than one element.
    assert!(blocks.len() <= 100);

    let once = original.shrink();
    let twice = once.shrink();
    assert_eq!(once.len(), 120);
    assert_eq!(twice.len(), 118);
    assert_eq!(twice.iter().next().unwrap().id(), &id(4));
    assert_eq!(twice.row(), original.row());
}

#[test]
fn shrink_below_the_soft_cap_is_a_no_op() {
    let blocks = alternating(10, 100);
    assert_eq!(blocks.shrink(), blocks);
}

#[test]
fn sequence_is_shrunk_after_every_add() {
    let blocks = alternating(100, 10);

    assert!(blocks.len() <= 10);
    assert!(blocks.iter().next().unwrap().is_key_block());
    assert_eq!(blocks.row().key_block.id, id(200));
    assert_eq!(blocks.previous_row().unwrap().key_block.id, id(198));
}

#[test]
fn shrink_never_drops_the_previous_row() {
    // K1, M, M, M, M, K2: longer than the cap, but holding only the current and previous rows.
    let mut blocks = Blocks::from_key_block_with_soft_cap(key_block(id(1), id(0)), 3);
    for n in 2..=5 {
        blocks = blocks.add_micro(micro_block(id(n), id(n - 1))).unwrap();
    }
    let blocks = blocks.add_block(key_block(id(6), id(5))).unwrap();

    assert_eq!(blocks.len(), 6);
    let previous = blocks.previous_row().unwrap();
    assert_eq!(previous.key_block.id, id(1));
    assert_eq!(previous.micro_blocks.len(), 4);
}
