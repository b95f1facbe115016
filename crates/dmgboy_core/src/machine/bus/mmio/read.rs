use super::super::GameBoyBus;
use super::wram_index;

impl GameBoyBus<'_> {
    pub(super) fn read8_mmio_impl(&mut self, addr: u16) -> u8 {
        match addr {
            // Cartridge ROM and external RAM both go through the MBC.
            0x0000..=0x7FFF | 0xA000..=0xBFFF => self.read_cart(addr),

            0x8000..=0x9FFF => self.hw.vram[(addr - 0x8000) as usize],

            // Work RAM and its echo.
            0xC000..=0xFDFF => self.hw.wram[wram_index(addr)],

            0xFE00..=0xFE9F => self.hw.oam[(addr - 0xFE00) as usize],

            // Unusable area.
            0xFEA0..=0xFEFF => 0xFF,

            0xFF00 => self.hw.joypad.read(),

            0xFF01 => self.hw.interrupts.serial.sb,
            0xFF02 => self.hw.interrupts.serial.read_sc(),

            0xFF04 => self.hw.interrupts.timer.read_div(),
            0xFF05 => self.hw.interrupts.timer.read_tima(),
            0xFF06 => self.hw.interrupts.timer.read_tma(),
            0xFF07 => self.hw.interrupts.timer.read_tac(),

            0xFF0F => self.hw.interrupts.read_if(),

            0xFF10..=0xFF3F => self.hw.apu.read(addr),

            0xFF46 => self.hw.dma_source,
            0xFF40..=0xFF4B => self.hw.ppu.read(addr),

            0xFF80..=0xFFFE => self.hw.hram[(addr - 0xFF80) as usize],

            0xFFFF => self.hw.interrupts.read_ie(),

            // Unmapped I/O (including every CGB-only register).
            _ => 0xFF,
        }
    }
}
