/// Timer / divider unit.
///
/// A 16-bit system counter advances every T-cycle and DIV exposes its top
/// byte. TIMA increments on the falling edge of the counter bit selected by
/// TAC (bit 9, 3, 5 or 7, i.e. every 1024, 16, 64 or 256 cycles) while the
/// timer is enabled.
mod io;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    /// Hidden system counter; DIV is bits 15:8.
    pub(super) counter: u16,
    pub(super) tima: u8,
    pub(super) tma: u8,
    /// TAC raw value (lower 3 bits meaningful).
    pub(super) tac: u8,
}

impl Timer {
    /// DIV reads 0xAB when the boot ROM hands over to the cartridge.
    pub(super) fn init_dmg(&mut self) {
        *self = Self {
            counter: 0xABCC,
            tima: 0x00,
            tma: 0x00,
            tac: 0x00,
        };
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Counter bit whose falling edge clocks TIMA.
    #[inline]
    fn input_mask(&self) -> u16 {
        match self.tac & 0x03 {
            0x00 => 1 << 9,
            0x01 => 1 << 3,
            0x02 => 1 << 5,
            _ => 1 << 7,
        }
    }

    /// TIMA period in T-cycles for the current TAC selector.
    pub fn period(&self) -> u32 {
        (self.input_mask() as u32) << 1
    }

    /// Advance by `cycles` T-cycles. Returns true if TIMA overflowed (and
    /// was reloaded from TMA) at least once.
    pub(super) fn tick(&mut self, cycles: u32) -> bool {
        let mut overflowed = false;
        for _ in 0..cycles {
            let mask = self.input_mask();
            let before = self.counter & mask != 0;
            self.counter = self.counter.wrapping_add(1);
            let after = self.counter & mask != 0;
            if self.enabled() && before && !after {
                overflowed |= self.increment_tima();
            }
        }
        overflowed
    }

    fn increment_tima(&mut self) -> bool {
        let (next, overflow) = self.tima.overflowing_add(1);
        self.tima = if overflow { self.tma } else { next };
        overflow
    }
}
