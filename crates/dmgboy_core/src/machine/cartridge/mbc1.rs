use serde::{Deserialize, Serialize};

use super::{ram_enable_pattern, ram_index, rom_byte, ROM_BANK_SIZE};
use crate::error::Fault;

/// MBC1 controller registers.
///
/// The switchable ROM bank is `low5 | high2 << 5`, with a zero `low5`
/// coerced to 1 (so 0x20/0x40/0x60 map to 0x21/0x41/0x61). In mode 1 the
/// two high bits also select the RAM bank and remap 0x0000-0x3FFF.
///
/// Bank numbers keep only the bits the ROM has address lines for, so a
/// small ROM ignores the high bits it uses as RAM bank bits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mbc1 {
    ram_enabled: bool,
    bank_low5: u8,
    bank_high2: u8,
    advanced_mode: bool,
    rom_bank_mask: u16,
}

impl Mbc1 {
    pub fn new(rom_size: usize) -> Self {
        let banks = (rom_size / ROM_BANK_SIZE).max(2).next_power_of_two();
        Self {
            ram_enabled: false,
            bank_low5: 1,
            bank_high2: 0,
            advanced_mode: false,
            rom_bank_mask: (banks - 1) as u16,
        }
    }

    pub fn rom_bank(&self) -> u16 {
        let low = match self.bank_low5 {
            0 => 1,
            n => n,
        };
        (low | self.bank_high2 << 5) as u16 & self.rom_bank_mask
    }

    fn zero_bank(&self) -> u16 {
        if self.advanced_mode {
            (self.bank_high2 << 5) as u16 & self.rom_bank_mask
        } else {
            0
        }
    }

    fn ram_bank(&self) -> u8 {
        if self.advanced_mode {
            self.bank_high2
        } else {
            0
        }
    }

    pub(super) fn read_rom(&self, rom: &[u8], addr: u16) -> Result<u8, Fault> {
        let bank = if addr < 0x4000 {
            self.zero_bank()
        } else {
            self.rom_bank()
        };
        rom_byte(rom, bank, addr)
    }

    pub(super) fn write_control(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = ram_enable_pattern(value),
            0x2000..=0x3FFF => {
                self.bank_low5 = value & 0x1F;
                log::trace!("GB MBC1: rom bank -> {}", self.rom_bank());
            }
            0x4000..=0x5FFF => self.bank_high2 = value & 0x03,
            _ => self.advanced_mode = value & 0x01 != 0,
        }
    }

    pub(super) fn read_ram(&self, ram: &[u8], addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        ram.get(ram_index(self.ram_bank(), addr))
            .copied()
            .unwrap_or(0xFF)
    }

    pub(super) fn write_ram(&self, ram: &mut [u8], addr: u16, value: u8) {
        if !self.ram_enabled {
            return;
        }
        if let Some(cell) = ram.get_mut(ram_index(self.ram_bank(), addr)) {
            *cell = value;
        }
    }
}
