use serde::{Deserialize, Serialize};

use super::{ram_enable_pattern, rom_byte};
use crate::error::Fault;

/// MBC2: 4-bit ROM bank register and 512 built-in RAM nibbles.
///
/// 0x0000-0x3FFF address bit 8 picks the register: clear is the RAM gate,
/// set is the ROM bank. RAM repeats every 512 bytes across 0xA000-0xBFFF
/// and reads back with the upper nibble high.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mbc2 {
    ram_enabled: bool,
    rom_bank: u8,
}

impl Default for Mbc2 {
    fn default() -> Self {
        Self {
            ram_enabled: false,
            rom_bank: 1,
        }
    }
}

const RAM_MASK: usize = 0x1FF;

impl Mbc2 {
    pub fn rom_bank(&self) -> u16 {
        self.rom_bank as u16
    }

    pub(super) fn read_rom(&self, rom: &[u8], addr: u16) -> Result<u8, Fault> {
        let bank = if addr < 0x4000 { 0 } else { self.rom_bank() };
        rom_byte(rom, bank, addr)
    }

    pub(super) fn write_control(&mut self, addr: u16, value: u8) {
        if addr >= 0x4000 {
            return;
        }
        if addr & 0x0100 != 0 {
            self.rom_bank = match value & 0x0F {
                0 => 1,
                n => n,
            };
            log::trace!("GB MBC2: rom bank -> {}", self.rom_bank);
        } else {
            self.ram_enabled = ram_enable_pattern(value);
        }
    }

    pub(super) fn read_ram(&self, ram: &[u8], addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        ram.get(addr as usize & RAM_MASK)
            .map_or(0xFF, |nibble| 0xF0 | nibble & 0x0F)
    }

    pub(super) fn write_ram(&self, ram: &mut [u8], addr: u16, value: u8) {
        if !self.ram_enabled {
            return;
        }
        if let Some(cell) = ram.get_mut(addr as usize & RAM_MASK) {
            *cell = value & 0x0F;
        }
    }
}
