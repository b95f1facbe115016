use serde::{Deserialize, Serialize};

/// T-cycles per bit at the internal 8192 Hz shift clock.
const CYCLES_PER_BIT: u32 = 512;

/// Serial port with no link partner attached.
///
/// An internally clocked transfer shifts in a 1 every 512 cycles, so after
/// eight bits SB reads 0xFF (the disconnected-cable pattern), SC bit 7
/// clears and the serial interrupt is requested. With the external clock
/// selected no clock edges ever arrive and the transfer never finishes.
///
/// Every byte the game starts sending on the internal clock is also
/// appended to `output`, which test ROMs use as a console.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Serial {
    pub(crate) sb: u8,
    pub(crate) sc: u8,
    /// Bits still to shift and cycles until the next one, while an
    /// internally clocked transfer is running.
    transfer: Option<(u8, u32)>,
    pub(crate) output: Vec<u8>,
}

impl Serial {
    pub(super) fn init_dmg(&mut self) {
        self.sb = 0x00;
        self.sc = 0x00;
        self.transfer = None;
    }

    pub(super) fn read_sc(&self) -> u8 {
        self.sc | 0x7E
    }

    pub(super) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    pub(super) fn write_sc(&mut self, value: u8) {
        self.sc = value & 0x81;
        self.transfer = None;
        if self.sc & 0x81 == 0x81 {
            self.output.push(self.sb);
            self.transfer = Some((8, CYCLES_PER_BIT));
        }
    }

    pub fn transfer_active(&self) -> bool {
        self.transfer.is_some()
    }

    /// Advance the shift clock. Returns true when a transfer completes.
    pub(super) fn tick(&mut self, cycles: u32) -> bool {
        let Some((mut bits, mut remaining)) = self.transfer else {
            return false;
        };

        let mut available = cycles;
        while available >= remaining {
            available -= remaining;
            self.sb = (self.sb << 1) | 0x01;
            bits -= 1;
            if bits == 0 {
                self.transfer = None;
                self.sc &= !0x80;
                return true;
            }
            remaining = CYCLES_PER_BIT;
        }
        self.transfer = Some((bits, remaining - available));
        false
    }
}
