//! RISC-V Instruction Decoder.
//!
//! This module turns 32-bit RV32IMA encodings into the structured `Instruction`
//! format. It extracts opcodes, register indices, and function codes, and
//! sign-extends immediates for all instruction formats (R, I, S, B, U, J).
//!
//! A few encodings are deliberately tolerated rather than rejected:
//! 1. **Zero Word:** Decodes as a no-op.
//! 2. **FP CSRs:** Reads and writes of `fflags`, `frm` and `fcsr` decode as no-ops.
//! 3. **FP Instructions:** Decode to `Opcode::Float` so fetch can suppress them.

use crate::common::{Result, SimError};
use crate::isa::instruction::{Function, Instruction, InstructionBits, Opcode};
use crate::isa::rv32a::{self, funct5};
use crate::isa::rv32f;
use crate::isa::rv32i::{funct3, funct7, opcodes};
use crate::isa::rv32m::funct3 as m_funct3;

/// Bit shift for the I-Type immediate (bits 20-31, sign-extended).
const I_IMM_SHIFT: u32 = 20;

/// Bit shift for the S-Type immediate high field (bits 25-31).
const S_IMM_HIGH_SHIFT: u32 = 25;

/// Bit shift for the S-Type immediate low field (bits 7-11).
const S_IMM_LOW_SHIFT: u32 = 7;

/// Mask for 5-bit immediate fragments.
const IMM_5_MASK: u32 = 0x1F;

/// Mask for the U-Type immediate (bits 12-31, not shifted).
const U_IMM_MASK: u32 = 0xFFFF_F000;

/// Mask for J-Type immediate bits 19-12, which sit in place in the encoding.
const J_IMM_19_12_MASK: u32 = 0x000F_F000;

/// Immediate of the ECALL encoding.
const ECALL_IMM: u32 = 0;

/// Immediate of the EBREAK encoding.
const EBREAK_IMM: u32 = 1;

#[inline]
const fn imm_i(raw: u32) -> u32 {
    ((raw as i32) >> I_IMM_SHIFT) as u32
}

#[inline]
const fn imm_s(raw: u32) -> u32 {
    ((((raw as i32) >> S_IMM_HIGH_SHIFT) << 5) as u32) | ((raw >> S_IMM_LOW_SHIFT) & IMM_5_MASK)
}

#[inline]
const fn imm_b(raw: u32) -> u32 {
    ((((raw as i32) >> 31) << 12) as u32)
        | (((raw >> 7) & 0x1) << 11)
        | (((raw >> 25) & 0x3F) << 5)
        | (((raw >> 8) & 0xF) << 1)
}

#[inline]
const fn imm_u(raw: u32) -> u32 {
    raw & U_IMM_MASK
}

#[inline]
const fn imm_j(raw: u32) -> u32 {
    ((((raw as i32) >> 31) << 20) as u32)
        | (raw & J_IMM_19_12_MASK)
        | (((raw >> 20) & 0x1) << 11)
        | (((raw >> 21) & 0x3FF) << 1)
}

/// Decodes a RISC-V instruction into its component fields.
///
/// # Arguments
///
/// * `raw` - The 32-bit instruction encoding to decode.
/// * `pc` - Address the word was fetched from, recorded on the instruction.
///
/// # Returns
///
/// The decoded `Instruction`, or `SimError::IllegalInstruction` for encodings
/// outside RV32IMA.
pub fn decode(raw: u32, pc: u32) -> Result<Instruction> {
    if raw == 0 {
        return Ok(Instruction::nop(pc));
    }

    let illegal = || SimError::IllegalInstruction { raw, pc };
    let f3 = raw.funct3();
    let f7 = raw.funct7();

    let (opcode, function, imm) = match raw.opcode() {
        opcodes::OP_LUI => (Opcode::Lui, Function::Lui, imm_u(raw)),
        opcodes::OP_AUIPC => (Opcode::Auipc, Function::Auipc, imm_u(raw)),
        opcodes::OP_JAL => (Opcode::Jal, Function::Jal, imm_j(raw)),
        opcodes::OP_JALR => (Opcode::Jalr, Function::Jalr, imm_i(raw)),
        opcodes::OP_BRANCH => {
            let function = match f3 {
                funct3::BEQ => Function::Beq,
                funct3::BNE => Function::Bne,
                funct3::BLT => Function::Blt,
                funct3::BGE => Function::Bge,
                funct3::BLTU => Function::Bltu,
                funct3::BGEU => Function::Bgeu,
                _ => return Err(illegal()),
            };
            (Opcode::Branch, function, imm_b(raw))
        }
        opcodes::OP_LOAD => {
            let function = match f3 {
                funct3::LB => Function::Lb,
                funct3::LH => Function::Lh,
                funct3::LW => Function::Lw,
                funct3::LBU => Function::Lbu,
                funct3::LHU => Function::Lhu,
                _ => return Err(illegal()),
            };
            (Opcode::Load, function, imm_i(raw))
        }
        opcodes::OP_STORE => {
            let function = match f3 {
                funct3::SB => Function::Sb,
                funct3::SH => Function::Sh,
                funct3::SW => Function::Sw,
                _ => return Err(illegal()),
            };
            (Opcode::Store, function, imm_s(raw))
        }
        opcodes::OP_IMM => {
            let function = match (f3, f7) {
                (funct3::ADD_SUB, _) => Function::Addi,
                (funct3::SLT, _) => Function::Slti,
                (funct3::SLTU, _) => Function::Sltiu,
                (funct3::XOR, _) => Function::Xori,
                (funct3::OR, _) => Function::Ori,
                (funct3::AND, _) => Function::Andi,
                (funct3::SLL, funct7::DEFAULT) => Function::Slli,
                (funct3::SRL_SRA, funct7::DEFAULT) => Function::Srli,
                (funct3::SRL_SRA, funct7::SUB_SRA) => Function::Srai,
                _ => return Err(illegal()),
            };
            (Opcode::OpImm, function, imm_i(raw))
        }
        opcodes::OP_REG => {
            let function = match (f7, f3) {
                (funct7::DEFAULT, funct3::ADD_SUB) => Function::Add,
                (funct7::SUB_SRA, funct3::ADD_SUB) => Function::Sub,
                (funct7::DEFAULT, funct3::SLL) => Function::Sll,
                (funct7::DEFAULT, funct3::SLT) => Function::Slt,
                (funct7::DEFAULT, funct3::SLTU) => Function::Sltu,
                (funct7::DEFAULT, funct3::XOR) => Function::Xor,
                (funct7::DEFAULT, funct3::SRL_SRA) => Function::Srl,
                (funct7::SUB_SRA, funct3::SRL_SRA) => Function::Sra,
                (funct7::DEFAULT, funct3::OR) => Function::Or,
                (funct7::DEFAULT, funct3::AND) => Function::And,
                (funct7::M_EXTENSION, m_funct3::MUL) => Function::Mul,
                (funct7::M_EXTENSION, m_funct3::MULH) => Function::Mulh,
                (funct7::M_EXTENSION, m_funct3::MULHSU) => Function::Mulhsu,
                (funct7::M_EXTENSION, m_funct3::MULHU) => Function::Mulhu,
                (funct7::M_EXTENSION, m_funct3::DIV) => Function::Div,
                (funct7::M_EXTENSION, m_funct3::DIVU) => Function::Divu,
                (funct7::M_EXTENSION, m_funct3::REM) => Function::Rem,
                (funct7::M_EXTENSION, m_funct3::REMU) => Function::Remu,
                _ => return Err(illegal()),
            };
            (Opcode::Op, function, 0)
        }
        opcodes::OP_MISC_MEM => {
            let function = match f3 {
                funct3::FENCE => Function::Fence,
                funct3::FENCE_I => Function::FenceI,
                _ => return Err(illegal()),
            };
            (Opcode::MiscMem, function, imm_i(raw))
        }
        opcodes::OP_AMO => {
            if f3 != rv32a::WIDTH_W {
                return Err(illegal());
            }
            let function = match raw.funct5() {
                funct5::LR => Function::LrW,
                funct5::SC => Function::ScW,
                funct5::AMOSWAP => Function::AmoswapW,
                funct5::AMOADD => Function::AmoaddW,
                funct5::AMOXOR => Function::AmoxorW,
                funct5::AMOAND => Function::AmoandW,
                funct5::AMOOR => Function::AmoorW,
                funct5::AMOMIN => Function::AmominW,
                funct5::AMOMAX => Function::AmomaxW,
                funct5::AMOMINU => Function::AmominuW,
                funct5::AMOMAXU => Function::AmomaxuW,
                _ => return Err(illegal()),
            };
            (Opcode::Amo, function, 0)
        }
        opcodes::OP_SYSTEM => {
            if f3 != funct3::PRIV {
                return match raw.csr() {
                    rv32f::CSR_FFLAGS | rv32f::CSR_FRM | rv32f::CSR_FCSR => {
                        Ok(Instruction::nop(pc))
                    }
                    _ => Err(illegal()),
                };
            }
            let function = match imm_i(raw) {
                ECALL_IMM => Function::Ecall,
                EBREAK_IMM => Function::Ebreak,
                _ => return Err(illegal()),
            };
            (Opcode::System, function, 0)
        }
        rv32f::OP_LOAD_FP
        | rv32f::OP_STORE_FP
        | rv32f::OP_FMADD
        | rv32f::OP_FMSUB
        | rv32f::OP_FNMSUB
        | rv32f::OP_FNMADD
        | rv32f::OP_FP => {
            return Ok(Instruction {
                raw,
                opcode: Opcode::Float,
                function: Function::Float,
                ..Instruction::nop(pc)
            });
        }
        _ => return Err(illegal()),
    };

    // S- and B-type encodings reuse bits 7-11 for the immediate.
    let rd = match opcode {
        Opcode::Store | Opcode::Branch => 0,
        _ => raw.rd(),
    };

    Ok(Instruction {
        raw,
        pc,
        opcode,
        function,
        rd,
        rs1: raw.rs1(),
        rs2: raw.rs2(),
        imm,
        predicted_taken: false,
        next_pc: 0,
    })
}
