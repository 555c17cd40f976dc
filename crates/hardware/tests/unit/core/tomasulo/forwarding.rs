//! # Memory Disambiguation and Forwarding
//!
//! Loads against older in-flight stores: exact matches forward (narrowed to
//! the load width), partial overlaps and unknown addresses wait.

use pretty_assertions::assert_eq;

use crate::common::TestContext;
use crate::common::builder::instruction::{InstructionBuilder as I, exit, li};
use crate::common::harness::{DATA_BASE, program};

/// `x5 = DATA_BASE`, `x1 = 1`.
fn prologue() -> Vec<u32> {
    vec![I::new().lui(5, DATA_BASE >> 12).build(), I::new().addi(1, 0, 1).build()]
}

#[test]
fn forwards_from_pending_store() {
    let prog = program([
        &prologue(),
        &[
            I::new().addi(6, 0, 6).build(),
            I::new().mul(7, 6, 6).build(),
            I::new().sw(5, 7, 0).build(),
            I::new().lw(10, 5, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 36);
    let stats = ctx.core.stats();
    assert_eq!(stats.loads_forwarded, 1);
    assert!(stats.disambiguation_stalls > 0, "load must wait for the store data");
    assert_eq!(ctx.read_word(DATA_BASE), 36);
}

#[test]
fn forwarded_value_is_narrowed_to_load_width() {
    let prog = program([
        &prologue(),
        &li(6, 0x1234_5680),
        &[
            I::new().mul(7, 6, 1).build(),
            I::new().sw(5, 7, 0).build(),
            I::new().lb(10, 5, 0).build(),
            I::new().lhu(11, 5, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 0xFFFF_FF80u32 as i32);
    assert_eq!(ctx.reg(11), 0x5680);
    assert_eq!(ctx.core.stats().loads_forwarded, 2);
}

#[test]
fn youngest_older_store_wins() {
    let prog = program([
        &prologue(),
        &[
            I::new().addi(6, 0, 11).build(),
            I::new().mul(7, 6, 1).build(),
            I::new().addi(8, 0, 22).build(),
            I::new().sw(5, 7, 0).build(),
            I::new().sw(5, 8, 0).build(),
            I::new().lw(10, 5, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 22);
}

#[test]
fn partial_overlap_waits_for_store() {
    let prog = program([
        &prologue(),
        &[
            I::new().addi(6, 0, 0xAB).build(),
            I::new().mul(7, 6, 1).build(),
            I::new().sb(5, 7, 1).build(),
            I::new().lw(10, 5, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog).poke(DATA_BASE, 0x1122_3344);
    assert_eq!(ctx.run(), 0x1122_AB44);
    assert_eq!(ctx.core.stats().loads_forwarded, 0);
    assert!(ctx.core.stats().disambiguation_stalls > 0);
}

#[test]
fn narrower_store_at_same_address_does_not_forward() {
    let prog = program([
        &prologue(),
        &[
            I::new().addi(6, 0, -1).build(),
            I::new().sh(5, 6, 0).build(),
            I::new().lw(10, 5, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog).poke(DATA_BASE, 0x1234_0000);
    assert_eq!(ctx.run(), 0x1234_FFFF);
    assert_eq!(ctx.core.stats().loads_forwarded, 0);
}

#[test]
fn unknown_store_address_blocks_younger_loads() {
    // The store's address comes out of the multiplier; the load targets a
    // different word but still has to wait for it.
    let prog = program([
        &prologue(),
        &[
            I::new().mul(6, 5, 1).build(),
            I::new().addi(7, 0, 99).build(),
            I::new().sw(6, 7, 8).build(),
            I::new().lw(10, 5, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog).poke(DATA_BASE, 5);
    assert_eq!(ctx.run(), 5);
    assert!(ctx.core.stats().disambiguation_stalls > 0);
    assert_eq!(ctx.read_word(DATA_BASE + 8), 99);
}

#[test]
fn loads_without_older_stores_never_stall() {
    let prog = program([
        &prologue(),
        &[I::new().lw(6, 5, 0).build(), I::new().lw(7, 5, 4).build(), I::new().add(10, 6, 7).build()],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog).poke(DATA_BASE, 40).poke(DATA_BASE + 4, 2);
    assert_eq!(ctx.run(), 42);
    assert_eq!(ctx.core.stats().disambiguation_stalls, 0);
}
