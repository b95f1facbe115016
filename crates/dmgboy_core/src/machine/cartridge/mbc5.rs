use serde::{Deserialize, Serialize};

use super::{ram_enable_pattern, ram_index, rom_byte};
use crate::error::Fault;

/// MBC5: 9-bit ROM bank (bank 0 is selectable) and up to 16 RAM banks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mbc5 {
    ram_enabled: bool,
    rom_bank: u16,
    ram_bank: u8,
}

impl Default for Mbc5 {
    fn default() -> Self {
        Self {
            ram_enabled: false,
            rom_bank: 1,
            ram_bank: 0,
        }
    }
}

impl Mbc5 {
    pub fn rom_bank(&self) -> u16 {
        self.rom_bank
    }

    pub(super) fn read_rom(&self, rom: &[u8], addr: u16) -> Result<u8, Fault> {
        let bank = if addr < 0x4000 { 0 } else { self.rom_bank };
        rom_byte(rom, bank, addr)
    }

    pub(super) fn write_control(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = ram_enable_pattern(value),
            0x2000..=0x2FFF => {
                self.rom_bank = (self.rom_bank & 0x100) | value as u16;
                log::trace!("GB MBC5: rom bank -> {}", self.rom_bank);
            }
            0x3000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0xFF) | ((value as u16 & 0x01) << 8);
            }
            0x4000..=0x5FFF => self.ram_bank = value & 0x0F,
            _ => {}
        }
    }

    pub(super) fn read_ram(&self, ram: &[u8], addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        ram.get(ram_index(self.ram_bank, addr))
            .copied()
            .unwrap_or(0xFF)
    }

    pub(super) fn write_ram(&self, ram: &mut [u8], addr: u16, value: u8) {
        if !self.ram_enabled {
            return;
        }
        if let Some(cell) = ram.get_mut(ram_index(self.ram_bank, addr)) {
            *cell = value;
        }
    }
}
