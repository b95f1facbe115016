use super::{GameBoyBus, OAM_SIZE};

/// One M-cycle per transferred byte.
const DMA_STALL_CYCLES: u32 = OAM_SIZE as u32 * 4;

impl GameBoyBus<'_> {
    /// OAM DMA: copy 160 bytes from XX00-XX9F into FE00-FE9F.
    ///
    /// The copy happens at once through the normal read path. Its bus time
    /// is charged as a CPU stall that the step applies after the current
    /// instruction completes.
    pub(super) fn start_oam_dma(&mut self, value: u8) {
        self.hw.dma_source = value;
        let base = (value as u16) << 8;
        for i in 0..OAM_SIZE as u16 {
            let byte = self.read8_mmio(base.wrapping_add(i));
            self.hw.oam[i as usize] = byte;
        }
        self.stall_cycles += DMA_STALL_CYCLES;
        log::trace!("GB DMA: OAM <- 0x{:04X}", base);
    }
}
