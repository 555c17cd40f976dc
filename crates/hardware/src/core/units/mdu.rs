//! Multiply/Divide Unit (MDU).
//!
//! Implements the M extension behind the MULDIV reservation stations. Results
//! become available once a station's progress counter reaches the operation's
//! latency.
//!
//! Division is plain truncating division: there is no RISC-V divide-by-zero or
//! overflow convention. Inputs that would fault a native divide (a zero divisor,
//! or `i32::MIN / -1`) are reported as `SimError::DivideFault`.

use crate::common::{Result, SimError};
use crate::config::PipelineConfig;
use crate::isa::Function;

/// Multiply/Divide Unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mdu;

impl Mdu {
    /// Cycles `function` must spend in the unit before its result is ready.
    pub const fn latency(function: Function, config: &PipelineConfig) -> u32 {
        if function.is_divide() {
            config.div_latency
        } else {
            config.mul_latency
        }
    }

    /// Computes a multiply, divide, or remainder.
    ///
    /// # Arguments
    ///
    /// * `function` - One of the eight M-extension operations
    /// * `a`        - Dividend / multiplicand (rs1)
    /// * `b`        - Divisor / multiplier (rs2)
    /// * `pc`       - Address of the instruction, for fault reporting
    pub fn execute(function: Function, a: u32, b: u32, pc: u32) -> Result<u32> {
        let fault = || SimError::DivideFault { pc };
        Ok(match function {
            Function::Mul => a.wrapping_mul(b),
            Function::Mulh => ((i64::from(a as i32) * i64::from(b as i32)) >> 32) as u32,
            Function::Mulhsu => ((i64::from(a as i32) * i64::from(b)) >> 32) as u32,
            Function::Mulhu => ((u64::from(a) * u64::from(b)) >> 32) as u32,
            Function::Div => (a as i32).checked_div(b as i32).ok_or_else(fault)? as u32,
            Function::Divu => a.checked_div(b).ok_or_else(fault)?,
            Function::Rem => (a as i32).checked_rem(b as i32).ok_or_else(fault)? as u32,
            Function::Remu => a.checked_rem(b).ok_or_else(fault)?,
            _ => a.wrapping_mul(b),
        })
    }
}
