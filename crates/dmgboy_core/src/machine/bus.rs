use serde::{Deserialize, Serialize};

use super::cartridge::Cartridge;
use super::interrupts::{Interrupt, InterruptController};
use crate::cpu::Bus;
use crate::error::Fault;

mod apu;
mod dma;
mod init;
mod joypad;
mod mmio;
mod ppu;

pub use apu::Apu;
pub use joypad::{Joypad, JoypadState};
pub use ppu::{LcdControl, LcdStat, Ppu, PpuMode};

pub(crate) const WRAM_SIZE: usize = 0x2000;
pub(crate) const HRAM_SIZE: usize = 0x7F;
pub(crate) const VRAM_SIZE: usize = 0x2000;
pub(crate) const OAM_SIZE: usize = 0xA0;

/// Console-side hardware: internal RAM plus every memory-mapped peripheral.
///
/// The cartridge is not part of this record; it is owned by the session
/// and lent to the bus for the duration of each step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hardware {
    pub(crate) wram: Vec<u8>,
    pub(crate) hram: Vec<u8>,
    pub(crate) vram: Vec<u8>,
    pub(crate) oam: Vec<u8>,
    pub(crate) interrupts: InterruptController,
    pub(crate) ppu: Ppu,
    pub(crate) apu: Apu,
    pub(crate) joypad: Joypad,
    /// Last value written to 0xFF46.
    pub(crate) dma_source: u8,
}

impl Hardware {
    /// Advance every clocked peripheral by `cycles` T-cycles.
    pub(crate) fn tick(&mut self, cycles: u32) {
        self.interrupts.tick(cycles);
        let raised = self.ppu.tick(cycles, &self.vram);
        if raised.vblank {
            self.interrupts.request(Interrupt::VBlank);
        }
        if raised.lcd_stat {
            self.interrupts.request(Interrupt::LcdStat);
        }
        self.apu.tick(cycles);
    }

    /// Latch a new joypad state, raising the joypad interrupt on any newly
    /// low selected line. Returns true if any button went from released to
    /// pressed.
    pub(crate) fn update_input(&mut self, state: JoypadState) -> bool {
        let outcome = self.joypad.update(state);
        if outcome.interrupt {
            self.interrupts.request(Interrupt::Joypad);
        }
        outcome.pressed
    }
}

/// Per-step view that routes CPU accesses to the hardware and cartridge.
pub(crate) struct GameBoyBus<'a> {
    pub(crate) hw: &'a mut Hardware,
    pub(crate) cart: &'a mut Cartridge,
    stall_cycles: u32,
    fault: Option<Fault>,
}

impl<'a> GameBoyBus<'a> {
    pub(crate) fn new(hw: &'a mut Hardware, cart: &'a mut Cartridge) -> Self {
        Self {
            hw,
            cart,
            stall_cycles: 0,
            fault: None,
        }
    }

    /// Cartridge read that latches the first fault instead of returning it,
    /// so the CPU can finish the access and report at the step boundary.
    fn read_cart(&mut self, addr: u16) -> u8 {
        match self.cart.read(addr) {
            Ok(value) => value,
            Err(fault) => {
                self.fault.get_or_insert(fault);
                0xFF
            }
        }
    }
}

impl Bus for GameBoyBus<'_> {
    fn read8(&mut self, addr: u16) -> u8 {
        self.read8_mmio(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.write8_mmio(addr, value);
    }

    fn tick(&mut self, cycles: u32) {
        self.hw.tick(cycles);
    }

    fn take_stall_cycles(&mut self) -> u32 {
        std::mem::take(&mut self.stall_cycles)
    }

    fn take_fault(&mut self) -> Option<Fault> {
        self.fault.take()
    }
}
