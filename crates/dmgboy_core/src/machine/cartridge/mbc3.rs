use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::rtc::Rtc;
use super::{ram_enable_pattern, ram_index, rom_byte};
use crate::error::Fault;

/// MBC3 with optional real-time clock.
///
/// 0x4000-0x5FFF selects either a RAM bank (0x00-0x03) or an RTC register
/// (0x08-0x0C) for the 0xA000-0xBFFF window. Writing 0x00 then 0x01 to
/// 0x6000-0x7FFF latches the clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mbc3 {
    ram_enabled: bool,
    rom_bank: u8,
    select: u8,
    latch_armed: bool,
    rtc: Option<Rtc>,
}

impl Mbc3 {
    pub fn new(has_rtc: bool) -> Self {
        Self {
            ram_enabled: false,
            rom_bank: 1,
            select: 0,
            latch_armed: false,
            rtc: has_rtc.then(|| Rtc::new(SystemTime::now())),
        }
    }

    pub fn rom_bank(&self) -> u16 {
        self.rom_bank as u16
    }

    pub fn rtc(&self) -> Option<&Rtc> {
        self.rtc.as_ref()
    }

    pub(super) fn read_rom(&self, rom: &[u8], addr: u16) -> Result<u8, Fault> {
        let bank = if addr < 0x4000 { 0 } else { self.rom_bank() };
        rom_byte(rom, bank, addr)
    }

    pub(super) fn write_control(&mut self, addr: u16, value: u8) {
        self.write_control_at(addr, value, SystemTime::now());
    }

    pub(super) fn write_control_at(&mut self, addr: u16, value: u8, now: SystemTime) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = ram_enable_pattern(value),
            0x2000..=0x3FFF => {
                self.rom_bank = match value & 0x7F {
                    0 => 1,
                    n => n,
                };
                log::trace!("GB MBC3: rom bank -> {}", self.rom_bank);
            }
            0x4000..=0x5FFF => self.select = value & 0x0F,
            _ => {
                if self.latch_armed && value == 0x01 {
                    if let Some(rtc) = self.rtc.as_mut() {
                        rtc.latch(now);
                    }
                }
                self.latch_armed = value == 0x00;
            }
        }
    }

    pub(super) fn read_ram(&self, ram: &[u8], addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        match self.select {
            0x00..=0x03 => ram
                .get(ram_index(self.select, addr))
                .copied()
                .unwrap_or(0xFF),
            0x08..=0x0C => self.rtc.as_ref().map_or(0xFF, |rtc| rtc.read(self.select)),
            _ => 0xFF,
        }
    }

    pub(super) fn write_ram(&mut self, ram: &mut [u8], addr: u16, value: u8) {
        self.write_ram_at(ram, addr, value, SystemTime::now());
    }

    pub(super) fn write_ram_at(&mut self, ram: &mut [u8], addr: u16, value: u8, now: SystemTime) {
        if !self.ram_enabled {
            return;
        }
        match self.select {
            0x00..=0x03 => {
                if let Some(cell) = ram.get_mut(ram_index(self.select, addr)) {
                    *cell = value;
                }
            }
            0x08..=0x0C => {
                if let Some(rtc) = self.rtc.as_mut() {
                    rtc.write(self.select, value, now);
                }
            }
            _ => {}
        }
    }
}
