//! Sharp SM83 (LR35902) instruction engine.
//!
//! The CPU is generic over [`Bus`]: the real machine plugs in
//! `GameBoyBus`, tests plug in a flat 64 KiB memory. Every memory access
//! and internal M-cycle is charged through the bus as it happens, so
//! [`Cpu::step`] returns the documented cycle cost of each instruction
//! and peripherals see time advance in the same order the hardware does.

use serde::{Deserialize, Serialize};

mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;

pub use bus::Bus;
pub use regs::{Flag, Registers};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    pub halted: bool,
    /// STOP low-power state. The CPU does nothing until a joypad press
    /// clears it.
    pub stopped: bool,
    /// Set by EI; becomes IME at the top of the following step.
    ime_enable_pending: bool,
    /// T-cycles charged so far by the step in progress.
    #[serde(skip)]
    step_cycles: u32,
}

impl Cpu {
    #[inline]
    pub fn ime_enable_pending(&self) -> bool {
        self.ime_enable_pending
    }
}
