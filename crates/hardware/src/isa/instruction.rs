//! Instruction encoding and the decoded instruction model.
//!
//! Provides bit extraction functions for raw 32-bit encodings and the
//! `Instruction` structure that flows from fetch through the reorder buffer.

use std::fmt;

use crate::common::constants::NOP;

/// Bit mask for extracting the opcode field (bits 0-6).
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit mask for extracting a register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;
/// Bit mask for extracting the CSR address field (bits 20-31).
pub const CSR_MASK: u32 = 0xFFF;

/// Trait for extracting instruction fields from encoded instructions.
///
/// Provides methods to extract all standard RISC-V instruction fields
/// from a 32-bit instruction encoding.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    ///
    /// Register 0 (x0) is hardwired to zero and writes are ignored.
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    ///
    /// Used to distinguish between different operations within the same opcode.
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    ///
    /// Distinguishes ADD from SUB, SRL from SRA, and base ops from the M extension.
    fn funct7(&self) -> u32;

    /// Extracts the funct5 field (bits 27-31) selecting the atomic operation.
    fn funct5(&self) -> u32;

    /// Extracts the CSR address field (bits 20-31).
    fn csr(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }

    #[inline(always)]
    fn funct5(&self) -> u32 {
        self >> 27
    }

    #[inline(always)]
    fn csr(&self) -> u32 {
        (self >> 20) & CSR_MASK
    }
}

/// Major opcode class of a decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Load upper immediate.
    Lui,
    /// Add upper immediate to pc.
    Auipc,
    /// Jump and link.
    Jal,
    /// Jump and link register.
    Jalr,
    /// Conditional branch.
    Branch,
    /// Integer load.
    Load,
    /// Integer store.
    Store,
    /// Register-immediate arithmetic.
    OpImm,
    /// Register-register arithmetic (including M).
    Op,
    /// FENCE / FENCE.I.
    MiscMem,
    /// Atomic memory operation.
    Amo,
    /// ECALL / EBREAK.
    System,
    /// Any floating-point load, store, or arithmetic; never executed.
    Float,
}

/// Operation performed by a decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Function {
    Lui,
    Auipc,
    Jal,
    Jalr,

    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,

    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,

    Sb,
    Sh,
    Sw,

    Addi,
    Slti,
    Sltiu,
    Xori,
    Ori,
    Andi,
    Slli,
    Srli,
    Srai,

    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,

    Mul,
    Mulh,
    Mulhsu,
    Mulhu,
    Div,
    Divu,
    Rem,
    Remu,

    Fence,
    FenceI,
    Ecall,
    Ebreak,

    LrW,
    ScW,
    AmoswapW,
    AmoaddW,
    AmoxorW,
    AmoandW,
    AmoorW,
    AmominW,
    AmomaxW,
    AmominuW,
    AmomaxuW,

    /// Floating-point operation, suppressed by fetch.
    Float,
}

impl Function {
    /// Returns `true` for MUL, MULH, MULHSU and MULHU.
    pub const fn is_multiply(self) -> bool {
        matches!(self, Self::Mul | Self::Mulh | Self::Mulhsu | Self::Mulhu)
    }

    /// Returns `true` for DIV, DIVU, REM and REMU.
    pub const fn is_divide(self) -> bool {
        matches!(self, Self::Div | Self::Divu | Self::Rem | Self::Remu)
    }

    /// Assembly mnemonic, lower case.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Lui => "lui",
            Self::Auipc => "auipc",
            Self::Jal => "jal",
            Self::Jalr => "jalr",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Blt => "blt",
            Self::Bge => "bge",
            Self::Bltu => "bltu",
            Self::Bgeu => "bgeu",
            Self::Lb => "lb",
            Self::Lh => "lh",
            Self::Lw => "lw",
            Self::Lbu => "lbu",
            Self::Lhu => "lhu",
            Self::Sb => "sb",
            Self::Sh => "sh",
            Self::Sw => "sw",
            Self::Addi => "addi",
            Self::Slti => "slti",
            Self::Sltiu => "sltiu",
            Self::Xori => "xori",
            Self::Ori => "ori",
            Self::Andi => "andi",
            Self::Slli => "slli",
            Self::Srli => "srli",
            Self::Srai => "srai",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Sll => "sll",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
            Self::Xor => "xor",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Or => "or",
            Self::And => "and",
            Self::Mul => "mul",
            Self::Mulh => "mulh",
            Self::Mulhsu => "mulhsu",
            Self::Mulhu => "mulhu",
            Self::Div => "div",
            Self::Divu => "divu",
            Self::Rem => "rem",
            Self::Remu => "remu",
            Self::Fence => "fence",
            Self::FenceI => "fence.i",
            Self::Ecall => "ecall",
            Self::Ebreak => "ebreak",
            Self::LrW => "lr.w",
            Self::ScW => "sc.w",
            Self::AmoswapW => "amoswap.w",
            Self::AmoaddW => "amoadd.w",
            Self::AmoxorW => "amoxor.w",
            Self::AmoandW => "amoand.w",
            Self::AmoorW => "amoor.w",
            Self::AmominW => "amomin.w",
            Self::AmomaxW => "amomax.w",
            Self::AmominuW => "amominu.w",
            Self::AmomaxuW => "amomaxu.w",
            Self::Float => "<fp>",
        }
    }
}

/// A decoded instruction as it travels from fetch to commit.
///
/// S- and B-type instructions carry `rd = 0`, so the rename stage never claims
/// a destination for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Raw 32-bit encoding.
    pub raw: u32,
    /// Address the instruction was fetched from.
    pub pc: u32,
    /// Major opcode class.
    pub opcode: Opcode,
    /// Operation.
    pub function: Function,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Sign-extended immediate (already shifted for U-type).
    pub imm: u32,
    /// Direction fetch predicted (always `true` for jumps).
    pub predicted_taken: bool,
    /// Address fetch continued at after this instruction.
    pub next_pc: u32,
}

impl Instruction {
    /// Returns the canonical no-op (`addi x0, x0, 0`) placed at `pc`.
    pub const fn nop(pc: u32) -> Self {
        Self {
            raw: NOP,
            pc,
            opcode: Opcode::OpImm,
            function: Function::Addi,
            rd: 0,
            rs1: 0,
            rs2: 0,
            imm: 0,
            predicted_taken: false,
            next_pc: 0,
        }
    }

    /// Returns `true` for instructions that write memory at commit: stores and
    /// every AMO except LR.
    pub fn is_store_class(&self) -> bool {
        self.opcode == Opcode::Store
            || (self.opcode == Opcode::Amo && self.function != Function::LrW)
    }

    /// Target of a taken branch or JAL.
    pub const fn branch_target(&self) -> u32 {
        self.pc.wrapping_add(self.imm)
    }

    /// Address of the next sequential instruction.
    pub const fn fall_through(&self) -> u32 {
        self.pc.wrapping_add(crate::common::constants::INSTRUCTION_SIZE)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.function.mnemonic();
        let imm = self.imm as i32;
        match self.opcode {
            Opcode::Lui | Opcode::Auipc => write!(f, "{m} x{}, {:#x}", self.rd, self.imm >> 12),
            Opcode::Jal => write!(f, "{m} x{}, {imm}", self.rd),
            Opcode::Jalr | Opcode::Load => write!(f, "{m} x{}, {imm}(x{})", self.rd, self.rs1),
            Opcode::Store => write!(f, "{m} x{}, {imm}(x{})", self.rs2, self.rs1),
            Opcode::Branch => write!(f, "{m} x{}, x{}, {imm}", self.rs1, self.rs2),
            Opcode::OpImm => write!(f, "{m} x{}, x{}, {imm}", self.rd, self.rs1),
            Opcode::Op => write!(f, "{m} x{}, x{}, x{}", self.rd, self.rs1, self.rs2),
            Opcode::Amo => write!(f, "{m} x{}, x{}, (x{})", self.rd, self.rs2, self.rs1),
            Opcode::MiscMem | Opcode::System | Opcode::Float => f.write_str(m),
        }
    }
}
