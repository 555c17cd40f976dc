//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the single-cycle integer unit behind the ALU
//! reservation stations. It handles arithmetic, logical operations, shifts,
//! and branch condition evaluation.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub
//! - [`logic`]:      Or, And, Xor, Slt, Sltu, and branch comparisons
//! - [`shifts`]:     Sll, Srl, Sra

/// Integer add and subtract.
pub mod arithmetic;

/// Bitwise logical and comparison operations.
pub mod logic;

/// Shift operations (sll, srl, sra).
pub mod shifts;

use crate::isa::Function;

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Alu;

impl Alu {
    /// Executes an ALU operation on two resolved operands.
    ///
    /// Register-immediate forms behave like their register-register
    /// counterparts with the immediate already placed in `b`. Any function
    /// without a dedicated rule falls back to addition, which is how link
    /// values (`pc + 4`), LUI, AUIPC, and the ECALL return address are produced.
    ///
    /// # Arguments
    ///
    /// * `function` - The decoded operation
    /// * `a`        - First operand
    /// * `b`        - Second operand (also the shift amount)
    ///
    /// # Returns
    ///
    /// The 32-bit result. Branches return 1 when taken and 0 otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use rvsim_tomasulo_core::core::units::alu::Alu;
    /// use rvsim_tomasulo_core::isa::Function;
    ///
    /// assert_eq!(Alu::execute(Function::Sub, 5, 7), (-2i32) as u32);
    /// assert_eq!(Alu::execute(Function::Srai, 0x8000_0000, 4), 0xF800_0000);
    /// assert_eq!(Alu::execute(Function::Blt, (-1i32) as u32, 0), 1);
    /// assert_eq!(Alu::execute(Function::Jal, 0x1000, 4), 0x1004);
    /// ```
    pub fn execute(function: Function, a: u32, b: u32) -> u32 {
        match function {
            Function::Sub => arithmetic::sub(a, b),
            Function::Sll | Function::Slli => shifts::sll(a, b),
            Function::Srl | Function::Srli => shifts::srl(a, b),
            Function::Sra | Function::Srai => shifts::sra(a, b),
            Function::Xor | Function::Xori => logic::xor(a, b),
            Function::Or | Function::Ori => logic::or(a, b),
            Function::And | Function::Andi => logic::and(a, b),
            Function::Slt | Function::Slti => logic::slt(a, b),
            Function::Sltu | Function::Sltiu => logic::sltu(a, b),
            Function::Beq
            | Function::Bne
            | Function::Blt
            | Function::Bge
            | Function::Bltu
            | Function::Bgeu => u32::from(logic::branch_taken(function, a, b)),
            _ => arithmetic::add(a, b),
        }
    }
}
