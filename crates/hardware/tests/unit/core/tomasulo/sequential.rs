//! # Sequential Semantics
//!
//! Straight-line and looping programs whose committed results must match
//! in-order execution regardless of how the engine reorders them.

use pretty_assertions::assert_eq;

use crate::common::TestContext;
use crate::common::builder::instruction::{InstructionBuilder as I, exit, li};
use crate::common::harness::{CODE_BASE, DATA_BASE, program};

// ══════════════════════════════════════════════════════════
// 1. Integer arithmetic
// ══════════════════════════════════════════════════════════

#[test]
fn register_arithmetic() {
    let prog = program([
        &[
            I::new().addi(1, 0, 5).build(),
            I::new().addi(2, 0, 7).build(),
            I::new().add(3, 1, 2).build(),
            I::new().sub(4, 1, 2).build(),
            I::new().xor(5, 1, 2).build(),
            I::new().sll(6, 1, 2).build(),
            I::new().addi(7, 0, -64).build(),
            I::new().srai(8, 7, 3).build(),
            I::new().slt(9, 4, 1).build(),
            I::new().sltu(11, 4, 1).build(),
            I::new().add(10, 3, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 12);
    assert_eq!(ctx.reg(3), 12);
    assert_eq!(ctx.reg(4), -2i32 as u32);
    assert_eq!(ctx.reg(5), 2);
    assert_eq!(ctx.reg(6), 5 << 7);
    assert_eq!(ctx.reg(8), -8i32 as u32);
    assert_eq!(ctx.reg(9), 1);
    assert_eq!(ctx.reg(11), 0);
}

#[test]
fn multiply_and_divide() {
    let prog = program([
        &li(1, 0x8000_0000),
        &[
            I::new().addi(2, 0, -3).build(),
            I::new().mul(3, 2, 2).build(),
            I::new().mulh(4, 1, 2).build(),
            I::new().mulhu(5, 1, 2).build(),
            I::new().addi(6, 0, 100).build(),
            I::new().addi(7, 0, 7).build(),
            I::new().div(8, 2, 7).build(),
            I::new().rem(9, 6, 7).build(),
            I::new().divu(10, 6, 7).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 14);
    assert_eq!(ctx.reg(3), 9);
    // (-2^31) * -3 = 3 * 2^31; high word is 1.
    assert_eq!(ctx.reg(4), 1);
    // 2^31 * (2^32 - 3) >> 32 = 2^31 - 2
    assert_eq!(ctx.reg(5), 0x7FFF_FFFE);
    assert_eq!(ctx.reg(8), 0);
    assert_eq!(ctx.reg(9), 2);
}

#[test]
fn upper_immediates() {
    let prog = program([
        &[I::new().lui(1, 0x12345).build(), I::new().auipc(2, 1).build()],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    let _ = ctx.run();
    assert_eq!(ctx.reg(1), 0x1234_5000);
    assert_eq!(ctx.reg(2), CODE_BASE + 4 + 0x1000);
}

// ══════════════════════════════════════════════════════════
// 2. Register hazards
// ══════════════════════════════════════════════════════════

#[test]
fn raw_chain() {
    let mut prog = vec![I::new().addi(1, 0, 1).build()];
    prog.extend((0..5).map(|_| I::new().add(1, 1, 1).build()));
    prog.push(I::new().add(10, 1, 0).build());
    prog.extend(exit());
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 32);
}

#[test]
fn waw_keeps_youngest() {
    let prog = program([
        &[
            I::new().addi(1, 0, 1).build(),
            I::new().mul(1, 1, 1).build(),
            I::new().addi(1, 0, 2).build(),
            I::new().add(10, 1, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 2);
}

#[test]
fn war_reads_old_value() {
    let prog = program([
        &[
            I::new().addi(1, 0, 3).build(),
            I::new().add(2, 1, 1).build(),
            I::new().addi(1, 0, 10).build(),
            I::new().add(10, 2, 1).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 16);
}

#[test]
fn x0_is_never_written() {
    let prog = program([
        &[
            I::new().addi(0, 0, 5).build(),
            I::new().mul(0, 0, 0).build(),
            I::new().add(10, 0, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 0);
    assert_eq!(ctx.reg(0), 0);
}

// ══════════════════════════════════════════════════════════
// 3. Control flow
// ══════════════════════════════════════════════════════════

#[test]
fn counted_loop() {
    // sum = 0; for i in (1..=10).rev() { sum += i }
    let prog = program([
        &[
            I::new().addi(5, 0, 10).build(),
            I::new().addi(10, 0, 0).build(),
            I::new().add(10, 10, 5).build(),
            I::new().addi(5, 5, -1).build(),
            I::new().bne(5, 0, -8).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 55);
    assert_eq!(ctx.core.stats().inst_branch, 10);
}

#[test]
fn call_and_return() {
    let prog = program([
        &[
            // 0x1000: call 0x100C
            I::new().jal(1, 12).build(),
            // 0x1004: return lands here
            I::new().addi(10, 10, 100).build(),
            // 0x1008: skip the callee
            I::new().jal(0, 12).build(),
            // 0x100C: callee
            I::new().addi(10, 0, 7).build(),
            I::new().jalr(0, 1, 0).build(),
        ],
        // 0x1014
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 107);
    assert_eq!(ctx.reg(1), CODE_BASE + 4);
    assert_eq!(ctx.core.stats().inst_jump, 3);
    assert_eq!(ctx.core.stats().branch_mispredictions, 0);
}

#[test]
fn jalr_clears_low_bit() {
    let prog = program([
        &[
            // x1 = 0x100D; jalr to (x1 + 0) & !1 = 0x100C
            I::new().auipc(1, 0).build(),
            I::new().addi(1, 1, 13).build(),
            I::new().jalr(2, 1, 0).build(),
            I::new().addi(10, 0, 1).build(),
            // 0x1010
            I::new().addi(10, 10, 40).build(),
        ],
        &exit(),
    ]);
    // A target of 0x100D would fetch a misaligned word.
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 41);
    assert_eq!(ctx.reg(2), CODE_BASE + 12);
}

// ══════════════════════════════════════════════════════════
// 4. Loads and stores
// ══════════════════════════════════════════════════════════

#[test]
fn load_widths_and_extension() {
    let prog = program([
        &[I::new().lui(5, DATA_BASE >> 12).build()],
        &[
            I::new().lb(1, 5, 0).build(),
            I::new().lbu(2, 5, 0).build(),
            I::new().lh(3, 5, 2).build(),
            I::new().lhu(4, 5, 2).build(),
            I::new().lw(6, 5, 0).build(),
            I::new().lb(10, 5, 1).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog).poke(DATA_BASE, 0x8081_7FF0);
    assert_eq!(ctx.run(), 0x7F);
    assert_eq!(ctx.reg(1), 0xFFFF_FFF0);
    assert_eq!(ctx.reg(2), 0xF0);
    assert_eq!(ctx.reg(3), 0xFFFF_8081);
    assert_eq!(ctx.reg(4), 0x8081);
    assert_eq!(ctx.reg(6), 0x8081_7FF0);
}

#[test]
fn store_widths() {
    let prog = program([
        &[I::new().lui(5, DATA_BASE >> 12).build()],
        &li(6, 0xAABB_CCDD),
        &[
            I::new().sw(5, 6, 0).build(),
            I::new().sh(5, 6, 4).build(),
            I::new().sb(5, 6, 10).build(),
            I::new().sb(5, 0, 1).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog)
        .poke(DATA_BASE + 4, 0x1111_1111)
        .poke(DATA_BASE + 8, 0x2222_2222);
    let _ = ctx.run();
    assert_eq!(ctx.read_word(DATA_BASE), 0xAABB_00DD);
    assert_eq!(ctx.read_word(DATA_BASE + 4), 0x1111_CCDD);
    assert_eq!(ctx.read_word(DATA_BASE + 8), 0x22DD_2222);
}

#[test]
fn negative_offsets_and_stack() {
    let prog = program([
        &[
            I::new().addi(6, 0, 77).build(),
            I::new().sw(2, 6, -4).build(),
            I::new().addi(2, 2, -4).build(),
            I::new().lw(10, 2, 0).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 77);
}

// ══════════════════════════════════════════════════════════
// 5. Instructions that retire without effect
// ══════════════════════════════════════════════════════════

#[test]
fn fence_ebreak_and_float_are_no_ops() {
    let prog = program([
        &[
            I::new().addi(10, 0, 9).build(),
            I::new().fence().build(),
            I::new().ebreak().build(),
            // fadd.s f1, f2, f3
            0x0031_00D3,
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 9);
    assert_eq!(ctx.core.stats().fp_suppressed, 1);
    assert_eq!(ctx.core.stats().instructions_retired, 6);
}

#[test]
fn machine_drains_after_exit() {
    let prog = program([&[I::new().addi(10, 0, 1).build()], &exit()]);
    let mut ctx = TestContext::new(&prog);
    let _ = ctx.run();
    assert!(ctx.core.occupancy().is_drained());
    assert_eq!(ctx.core.exit_code(), Some(1));
}
