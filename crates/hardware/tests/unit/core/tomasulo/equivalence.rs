//! # Equivalence With In-Order Execution
//!
//! Random programs of ALU, M, load/store, AMO, and short forward branches run
//! on randomly configured cores (latencies, issue interval, retire width,
//! predictor) and must commit exactly the state a one-instruction-at-a-time
//! interpreter produces.

use proptest::prelude::*;
use rvsim_tomasulo_core::config::{BranchPredictor, Config};

use crate::common::TestContext;
use crate::common::builder::instruction::{InstructionBuilder as I, exit};
use crate::common::harness::{DATA_BASE, STACK_TOP};

/// Bytes of data memory the programs touch.
const WINDOW: usize = 32;
/// `x5` points at the window, `x4` at its upper half, `x3` is divide scratch.
const BASE: u32 = 5;
const UPPER: u32 = 4;
const SCRATCH: u32 = 3;

#[derive(Clone, Copy, Debug)]
enum RegOp {
    Add,
    Sub,
    Xor,
    Or,
    And,
    Sll,
    Srl,
    Sra,
    Slt,
    Sltu,
    Mul,
    Mulh,
    Mulhu,
    Divu,
    Remu,
}

#[derive(Clone, Copy, Debug)]
enum ImmOp {
    Addi,
    Xori,
    Andi,
    Slli,
    Srai,
}

#[derive(Clone, Copy, Debug)]
enum Width {
    B,
    Bu,
    H,
    Hu,
    W,
}

impl Width {
    const fn bytes(self) -> u32 {
        match self {
            Self::B | Self::Bu => 1,
            Self::H | Self::Hu => 2,
            Self::W => 4,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum AmoOp {
    Swap,
    Add,
    Xor,
    And,
    Or,
    Min,
    Max,
    Minu,
    Maxu,
    Lr,
    Sc,
}

#[derive(Clone, Copy, Debug)]
enum Cond {
    Eq,
    Ne,
    Lt,
    Geu,
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Reg(RegOp, u32, u32, u32),
    Imm(ImmOp, u32, u32, i32),
    /// `rd`, byte offset from `x5`.
    Load(Width, u32, u32),
    /// `rs2`, byte offset from `x5`.
    Store(Width, u32, u32),
    /// `rd`, `rs2`, upper half of the window.
    Amo(AmoOp, u32, u32, bool),
    /// Skip the next op when the condition holds.
    Skip(Cond, u32, u32),
}

const fn aligned(width: Width, offset: u32) -> u32 {
    offset & !(width.bytes() - 1)
}

const fn amo_offset(upper: bool) -> u32 {
    if upper { 16 } else { 0 }
}

// ══════════════════════════════════════════════════════════
// Reference interpreter
// ══════════════════════════════════════════════════════════

struct Golden {
    regs: [u32; 32],
    mem: [u8; WINDOW],
}

impl Golden {
    fn new(init: &[u32; WINDOW / 4]) -> Self {
        let mut regs = [0; 32];
        regs[2] = STACK_TOP;
        regs[BASE as usize] = DATA_BASE;
        regs[UPPER as usize] = DATA_BASE + 16;
        let mut mem = [0; WINDOW];
        for (chunk, word) in mem.chunks_exact_mut(4).zip(init) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Self { regs, mem }
    }

    fn get(&self, r: u32) -> u32 {
        self.regs[r as usize]
    }

    fn set(&mut self, r: u32, value: u32) {
        if r != 0 {
            self.regs[r as usize] = value;
        }
    }

    fn read(&self, offset: u32, bytes: u32) -> u32 {
        let mut word = [0u8; 4];
        let off = offset as usize;
        word[..bytes as usize].copy_from_slice(&self.mem[off..off + bytes as usize]);
        u32::from_le_bytes(word)
    }

    fn write(&mut self, offset: u32, bytes: u32, value: u32) {
        let off = offset as usize;
        self.mem[off..off + bytes as usize].copy_from_slice(&value.to_le_bytes()[..bytes as usize]);
    }

    fn run(&mut self, ops: &[Op]) {
        let mut idx = 0;
        while idx < ops.len() {
            idx += if self.step(ops[idx]) { 2 } else { 1 };
        }
        self.set(17, 93);
    }

    /// Executes one op; returns `true` if the next op is skipped.
    fn step(&mut self, op: Op) -> bool {
        match op {
            Op::Reg(f, rd, rs1, rs2) => {
                let (a, b) = (self.get(rs1), self.get(rs2));
                let value = match f {
                    RegOp::Add => a.wrapping_add(b),
                    RegOp::Sub => a.wrapping_sub(b),
                    RegOp::Xor => a ^ b,
                    RegOp::Or => a | b,
                    RegOp::And => a & b,
                    RegOp::Sll => a << (b & 31),
                    RegOp::Srl => a >> (b & 31),
                    RegOp::Sra => ((a as i32) >> (b & 31)) as u32,
                    RegOp::Slt => u32::from((a as i32) < (b as i32)),
                    RegOp::Sltu => u32::from(a < b),
                    RegOp::Mul => a.wrapping_mul(b),
                    RegOp::Mulh => ((i64::from(a as i32) * i64::from(b as i32)) >> 32) as u32,
                    RegOp::Mulhu => ((u64::from(a) * u64::from(b)) >> 32) as u32,
                    RegOp::Divu | RegOp::Remu => {
                        let divisor = b | 1;
                        self.set(SCRATCH, divisor);
                        if matches!(f, RegOp::Divu) { a / divisor } else { a % divisor }
                    }
                };
                self.set(rd, value);
            }
            Op::Imm(f, rd, rs1, imm) => {
                let a = self.get(rs1);
                let value = match f {
                    ImmOp::Addi => a.wrapping_add(imm as u32),
                    ImmOp::Xori => a ^ imm as u32,
                    ImmOp::Andi => a & imm as u32,
                    ImmOp::Slli => a << (imm & 31),
                    ImmOp::Srai => ((a as i32) >> (imm & 31)) as u32,
                };
                self.set(rd, value);
            }
            Op::Load(w, rd, offset) => {
                let raw = self.read(aligned(w, offset), w.bytes());
                let value = match w {
                    Width::B => raw as u8 as i8 as i32 as u32,
                    Width::H => raw as u16 as i16 as i32 as u32,
                    Width::Bu | Width::Hu | Width::W => raw,
                };
                self.set(rd, value);
            }
            Op::Store(w, rs2, offset) => {
                let value = self.get(rs2);
                self.write(aligned(w, offset), w.bytes(), value);
            }
            Op::Amo(f, rd, rs2, upper) => {
                let offset = amo_offset(upper);
                let old = self.read(offset, 4);
                let src = self.get(rs2);
                let (s, o) = (src as i32, old as i32);
                let (new, result) = match f {
                    AmoOp::Lr => (None, old),
                    AmoOp::Sc => (Some(src), 0),
                    AmoOp::Swap => (Some(src), old),
                    AmoOp::Add => (Some(old.wrapping_add(src)), old),
                    AmoOp::Xor => (Some(old ^ src), old),
                    AmoOp::And => (Some(old & src), old),
                    AmoOp::Or => (Some(old | src), old),
                    AmoOp::Min => (Some(o.min(s) as u32), old),
                    AmoOp::Max => (Some(o.max(s) as u32), old),
                    AmoOp::Minu => (Some(old.min(src)), old),
                    AmoOp::Maxu => (Some(old.max(src)), old),
                };
                if let Some(new) = new {
                    self.write(offset, 4, new);
                }
                self.set(rd, result);
            }
            Op::Skip(c, rs1, rs2) => {
                let (a, b) = (self.get(rs1), self.get(rs2));
                return match c {
                    Cond::Eq => a == b,
                    Cond::Ne => a != b,
                    Cond::Lt => (a as i32) < (b as i32),
                    Cond::Geu => a >= b,
                };
            }
        }
        false
    }
}

// ══════════════════════════════════════════════════════════
// Encoding
// ══════════════════════════════════════════════════════════

fn encode(op: Op) -> Vec<u32> {
    let i = I::new();
    let word = match op {
        Op::Reg(f, rd, a, b) => match f {
            RegOp::Add => i.add(rd, a, b),
            RegOp::Sub => i.sub(rd, a, b),
            RegOp::Xor => i.xor(rd, a, b),
            RegOp::Or => i.or(rd, a, b),
            RegOp::And => i.and(rd, a, b),
            RegOp::Sll => i.sll(rd, a, b),
            RegOp::Srl => i.srl(rd, a, b),
            RegOp::Sra => i.sra(rd, a, b),
            RegOp::Slt => i.slt(rd, a, b),
            RegOp::Sltu => i.sltu(rd, a, b),
            RegOp::Mul => i.mul(rd, a, b),
            RegOp::Mulh => i.mulh(rd, a, b),
            RegOp::Mulhu => i.mulhu(rd, a, b),
            RegOp::Divu | RegOp::Remu => {
                let div = if matches!(f, RegOp::Divu) {
                    I::new().divu(rd, a, SCRATCH)
                } else {
                    I::new().remu(rd, a, SCRATCH)
                };
                return vec![i.ori(SCRATCH, b, 1).build(), div.build()];
            }
        },
        Op::Imm(f, rd, a, imm) => match f {
            ImmOp::Addi => i.addi(rd, a, imm),
            ImmOp::Xori => i.xori(rd, a, imm),
            ImmOp::Andi => i.andi(rd, a, imm),
            ImmOp::Slli => i.slli(rd, a, (imm & 31) as u32),
            ImmOp::Srai => i.srai(rd, a, (imm & 31) as u32),
        },
        Op::Load(w, rd, offset) => {
            let off = aligned(w, offset) as i32;
            match w {
                Width::B => i.lb(rd, BASE, off),
                Width::Bu => i.lbu(rd, BASE, off),
                Width::H => i.lh(rd, BASE, off),
                Width::Hu => i.lhu(rd, BASE, off),
                Width::W => i.lw(rd, BASE, off),
            }
        }
        Op::Store(w, rs2, offset) => {
            let off = aligned(w, offset) as i32;
            match w {
                Width::B | Width::Bu => i.sb(BASE, rs2, off),
                Width::H | Width::Hu => i.sh(BASE, rs2, off),
                Width::W => i.sw(BASE, rs2, off),
            }
        }
        Op::Amo(f, rd, rs2, upper) => {
            let addr = if upper { UPPER } else { BASE };
            match f {
                AmoOp::Swap => i.amoswap_w(rd, addr, rs2),
                AmoOp::Add => i.amoadd_w(rd, addr, rs2),
                AmoOp::Xor => i.amoxor_w(rd, addr, rs2),
                AmoOp::And => i.amoand_w(rd, addr, rs2),
                AmoOp::Or => i.amoor_w(rd, addr, rs2),
                AmoOp::Min => i.amomin_w(rd, addr, rs2),
                AmoOp::Max => i.amomax_w(rd, addr, rs2),
                AmoOp::Minu => i.amominu_w(rd, addr, rs2),
                AmoOp::Maxu => i.amomaxu_w(rd, addr, rs2),
                AmoOp::Lr => i.lr_w(rd, addr),
                AmoOp::Sc => i.sc_w(rd, addr, rs2),
            }
        }
        Op::Skip(c, a, b) => branch(c, a, b, 8),
    };
    vec![word.build()]
}

fn branch(c: Cond, a: u32, b: u32, imm: i32) -> I {
    let i = I::new();
    match c {
        Cond::Eq => i.beq(a, b, imm),
        Cond::Ne => i.bne(a, b, imm),
        Cond::Lt => i.blt(a, b, imm),
        Cond::Geu => i.bgeu(a, b, imm),
    }
}

fn assemble(ops: &[Op]) -> Vec<u32> {
    let mut words = vec![
        I::new().lui(BASE, DATA_BASE >> 12).build(),
        I::new().addi(UPPER, BASE, 16).build(),
    ];
    for (idx, op) in ops.iter().enumerate() {
        if let Op::Skip(c, a, b) = *op {
            let next = ops.get(idx + 1).map_or(0, |n| encode(*n).len());
            words.push(branch(c, a, b, 4 + 4 * next as i32).build());
        } else {
            words.extend(encode(*op));
        }
    }
    words.extend(exit());
    words
}

// ══════════════════════════════════════════════════════════
// Strategies
// ══════════════════════════════════════════════════════════

fn dest() -> impl Strategy<Value = u32> {
    6u32..=16
}

fn src() -> impl Strategy<Value = u32> {
    prop_oneof![1 => Just(0u32), 6 => 6u32..=16]
}

fn op() -> impl Strategy<Value = Op> {
    use prop::sample::select;
    let reg_ops = vec![
        RegOp::Add,
        RegOp::Sub,
        RegOp::Xor,
        RegOp::Or,
        RegOp::And,
        RegOp::Sll,
        RegOp::Srl,
        RegOp::Sra,
        RegOp::Slt,
        RegOp::Sltu,
        RegOp::Mul,
        RegOp::Mulh,
        RegOp::Mulhu,
        RegOp::Divu,
        RegOp::Remu,
    ];
    let imm_ops = vec![ImmOp::Addi, ImmOp::Xori, ImmOp::Andi, ImmOp::Slli, ImmOp::Srai];
    let widths = vec![Width::B, Width::Bu, Width::H, Width::Hu, Width::W];
    let amo_ops = vec![
        AmoOp::Swap,
        AmoOp::Add,
        AmoOp::Xor,
        AmoOp::And,
        AmoOp::Or,
        AmoOp::Min,
        AmoOp::Max,
        AmoOp::Minu,
        AmoOp::Maxu,
        AmoOp::Lr,
        AmoOp::Sc,
    ];
    let conds = vec![Cond::Eq, Cond::Ne, Cond::Lt, Cond::Geu];

    prop_oneof![
        4 => (select(reg_ops), dest(), src(), src()).prop_map(|(f, d, a, b)| Op::Reg(f, d, a, b)),
        4 => (select(imm_ops), dest(), src(), -2048i32..2048)
            .prop_map(|(f, d, a, imm)| Op::Imm(f, d, a, imm)),
        3 => (select(widths.clone()), dest(), 0u32..WINDOW as u32)
            .prop_map(|(w, d, off)| Op::Load(w, d, off)),
        3 => (select(widths), src(), 0u32..WINDOW as u32)
            .prop_map(|(w, s, off)| Op::Store(w, s, off)),
        1 => (select(amo_ops), dest(), src(), any::<bool>())
            .prop_map(|(f, d, s, upper)| Op::Amo(f, d, s, upper)),
        2 => (select(conds), src(), src()).prop_map(|(c, a, b)| Op::Skip(c, a, b)),
    ]
}

fn machine() -> impl Strategy<Value = Config> {
    (1u32..=3, 1u32..=6, 1u32..=10, 1u32..=12, 0usize..=3, any::<bool>()).prop_map(
        |(issue, mul, div, cache, retire, two_bit)| {
            let mut config = Config::default();
            config.pipeline.issue_interval = issue;
            config.pipeline.mul_latency = mul;
            config.pipeline.div_latency = div;
            config.pipeline.cache_latency = cache;
            config.pipeline.retire_width = retire;
            config.pipeline.branch_predictor = if two_bit {
                BranchPredictor::TwoBit
            } else {
                BranchPredictor::Static
            };
            config
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn matches_in_order_execution(
        ops in prop::collection::vec(op(), 1..40),
        init in prop::array::uniform8(any::<u32>()),
        config in machine(),
    ) {
        let mut golden = Golden::new(&init);
        golden.run(&ops);

        let mut ctx = TestContext::with_config(&assemble(&ops), &config);
        for (idx, word) in init.iter().enumerate() {
            ctx = ctx.poke(DATA_BASE + 4 * idx as u32, *word);
        }
        let code = ctx.run();

        prop_assert_eq!(code, golden.regs[10] as i32);
        prop_assert_eq!(ctx.core.regs().snapshot(), golden.regs);
        let mem = ctx.core.memory().slice(DATA_BASE, WINDOW as u32).unwrap().to_vec();
        prop_assert_eq!(mem, golden.mem.to_vec());
        prop_assert!(ctx.core.occupancy().is_drained());
    }
}
