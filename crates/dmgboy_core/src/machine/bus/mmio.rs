mod read;
mod write;

use super::GameBoyBus;

/// Echo RAM at 0xE000-0xFDFF folds onto the 8 KiB work RAM window.
#[inline]
pub(super) fn wram_index(addr: u16) -> usize {
    (addr.wrapping_sub(0xC000) & 0x1FFF) as usize
}

impl GameBoyBus<'_> {
    pub(super) fn read8_mmio(&mut self, addr: u16) -> u8 {
        self.read8_mmio_impl(addr)
    }

    pub(super) fn write8_mmio(&mut self, addr: u16, value: u8) {
        self.write8_mmio_impl(addr, value)
    }
}
