//! Interrupt and timing controller.
//!
//! Owns the IE/IF register pair, the divider/timer unit, the serial stub
//! and the free-running cycle counter. The bus advances it once per
//! charged CPU access.

use serde::{Deserialize, Serialize};

use super::serial::Serial;
use super::timer::Timer;
use crate::bits::bit_register;

bit_register! {
    /// Layout shared by IE (0xFFFF) and IF (0xFF0F).
    pub struct InterruptFlags {
        0 => vblank,
        1 => lcd_stat,
        2 => timer,
        3 => serial,
        4 => joypad,
    }
}

/// Interrupt sources in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    /// Bit in IE/IF.
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }

    pub const fn vector(self) -> u16 {
        0x0040 + 8 * self as u16
    }

    /// Highest-priority source in a raw IE & IF mask.
    pub fn highest(pending: u8) -> Option<Interrupt> {
        Interrupt::ALL
            .into_iter()
            .find(|source| pending & source.mask() != 0)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Interrupt::VBlank => "VBlank",
            Interrupt::LcdStat => "LCD STAT",
            Interrupt::Timer => "Timer",
            Interrupt::Serial => "Serial",
            Interrupt::Joypad => "Joypad",
        }
    }
}

impl InterruptFlags {
    pub fn get(&self, source: Interrupt) -> bool {
        match source {
            Interrupt::VBlank => self.vblank,
            Interrupt::LcdStat => self.lcd_stat,
            Interrupt::Timer => self.timer,
            Interrupt::Serial => self.serial,
            Interrupt::Joypad => self.joypad,
        }
    }

    pub fn set(&mut self, source: Interrupt, value: bool) {
        let slot = match source {
            Interrupt::VBlank => &mut self.vblank,
            Interrupt::LcdStat => &mut self.lcd_stat,
            Interrupt::Timer => &mut self.timer,
            Interrupt::Serial => &mut self.serial,
            Interrupt::Joypad => &mut self.joypad,
        };
        *slot = value;
    }
}

/// IE and IF only implement the low five bits.
const UNUSED_BITS: u8 = 0xE0;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InterruptController {
    pub enable: InterruptFlags,
    pub request: InterruptFlags,
    pub timer: Timer,
    pub serial: Serial,
    /// T-cycles elapsed since power-on.
    pub cycles: u64,
}

impl InterruptController {
    pub fn request(&mut self, source: Interrupt) {
        self.request.set(source, true);
    }

    /// Highest-priority source that is both enabled and requested.
    pub fn candidate(&self) -> Option<Interrupt> {
        Interrupt::highest(self.enable.to_byte() & self.request.to_byte())
    }

    pub fn read_if(&self) -> u8 {
        self.request.to_byte() | UNUSED_BITS
    }

    pub fn write_if(&mut self, value: u8) {
        self.request = InterruptFlags::from_byte(value);
    }

    pub fn read_ie(&self) -> u8 {
        self.enable.to_byte() | UNUSED_BITS
    }

    pub fn write_ie(&mut self, value: u8) {
        self.enable = InterruptFlags::from_byte(value);
    }

    /// Advance the timer and serial port, latching any requests they raise.
    pub fn tick(&mut self, cycles: u32) {
        self.cycles += cycles as u64;
        if self.timer.tick(cycles) {
            self.request(Interrupt::Timer);
        }
        if self.serial.tick(cycles) {
            self.request(Interrupt::Serial);
        }
    }
}
