use super::{Ppu, PpuMode};
use crate::machine::interrupts::InterruptFlags;
use crate::machine::video;

pub(super) const LINE_CYCLES: u32 = 456;
pub(super) const LINES_PER_FRAME: u32 = 154;
const FRAME_CYCLES: u32 = LINE_CYCLES * LINES_PER_FRAME;
const VBLANK_LINE: u8 = 144;
const OAM_SCAN_CYCLES: u32 = 80;
const TRANSFER_CYCLES: u32 = 172;

impl Ppu {
    /// Advance the LCD by `cycles` T-cycles, returning the interrupts it
    /// raised.
    pub(in crate::machine) fn tick(&mut self, cycles: u32, vram: &[u8]) -> InterruptFlags {
        let mut raised = InterruptFlags::default();
        if !self.lcdc.lcd_enable {
            // LY stays at 0 and line timing restarts while the LCD is off.
            self.frame_cycle = 0;
            self.ly = 0;
            self.stat_line = false;
            self.update_status(&mut raised);
            return raised;
        }

        for _ in 0..cycles {
            let old_ly = self.ly;
            self.frame_cycle = (self.frame_cycle + 1) % FRAME_CYCLES;
            self.ly = (self.frame_cycle / LINE_CYCLES) as u8;

            if old_ly < VBLANK_LINE && self.ly >= VBLANK_LINE {
                raised.vblank = true;
                // DMG quirk: the mode-2 select also fires at VBlank start.
                if self.stat.oam_select {
                    raised.lcd_stat = true;
                }
                let mut frame = std::mem::take(&mut self.framebuffer);
                video::render_background(self, vram, &mut frame);
                self.framebuffer = frame;
                self.flip = true;
                self.frames += 1;
                log::debug!(
                    "GB PPU: VBlank edge (LY {}->{}), STAT=0x{:02X}",
                    old_ly,
                    self.ly,
                    self.read_stat(),
                );
            }

            self.update_status(&mut raised);
        }
        raised
    }

    fn current_mode(&self) -> PpuMode {
        if !self.lcdc.lcd_enable {
            return PpuMode::HBlank;
        }
        if self.ly >= VBLANK_LINE {
            return PpuMode::VBlank;
        }
        match self.frame_cycle % LINE_CYCLES {
            c if c < OAM_SCAN_CYCLES => PpuMode::OamScan,
            c if c < OAM_SCAN_CYCLES + TRANSFER_CYCLES => PpuMode::Transfer,
            _ => PpuMode::HBlank,
        }
    }

    /// Recompute mode and LYC coincidence, raising STAT on a rising edge of
    /// the ORed enabled sources.
    pub(super) fn update_status(&mut self, raised: &mut InterruptFlags) {
        self.mode = self.current_mode();
        self.stat.coincidence = self.ly == self.lyc;

        if !self.lcdc.lcd_enable {
            self.stat_line = false;
            return;
        }

        let line = (self.stat.lyc_select && self.stat.coincidence)
            || (self.stat.oam_select && self.mode == PpuMode::OamScan)
            || (self.stat.vblank_select && self.mode == PpuMode::VBlank)
            || (self.stat.hblank_select && self.mode == PpuMode::HBlank);

        let rising = line && !self.stat_line;
        self.stat_line = line;
        if rising {
            raised.lcd_stat = true;
            log::trace!(
                "GB PPU: STAT IRQ rising edge (STAT=0x{:02X} LY={} mode={:?})",
                self.read_stat(),
                self.ly,
                self.mode,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::bus::VRAM_SIZE;

    fn lcd_on() -> Ppu {
        let mut ppu = Ppu::default();
        ppu.lcdc.lcd_enable = true;
        ppu
    }

    #[test]
    fn line_modes_follow_dot_position() {
        let vram = vec![0; VRAM_SIZE];
        let mut ppu = lcd_on();
        ppu.tick(1, &vram);
        assert_eq!(ppu.mode, PpuMode::OamScan);
        ppu.tick(OAM_SCAN_CYCLES - 1, &vram);
        assert_eq!(ppu.mode, PpuMode::Transfer);
        ppu.tick(TRANSFER_CYCLES, &vram);
        assert_eq!(ppu.mode, PpuMode::HBlank);
        ppu.tick(LINE_CYCLES - OAM_SCAN_CYCLES - TRANSFER_CYCLES, &vram);
        assert_eq!(ppu.ly, 1);
        assert_eq!(ppu.mode, PpuMode::OamScan);
    }

    #[test]
    fn vblank_raised_once_per_frame_with_flip() {
        let vram = vec![0; VRAM_SIZE];
        let mut ppu = lcd_on();
        let mut vblanks = 0;
        for _ in 0..FRAME_CYCLES / 4 {
            if ppu.tick(4, &vram).vblank {
                vblanks += 1;
            }
        }
        assert_eq!(vblanks, 1);
        assert!(ppu.take_flip());
        assert!(!ppu.take_flip());
        assert_eq!(ppu.ly, 0, "wrapped back to the top");
    }

    #[test]
    fn lyc_match_raises_stat_on_edge_only() {
        let vram = vec![0; VRAM_SIZE];
        let mut ppu = lcd_on();
        ppu.lyc = 2;
        ppu.stat.lyc_select = true;

        let mut raised = 0;
        for _ in 0..LINE_CYCLES * 4 {
            if ppu.tick(1, &vram).lcd_stat {
                raised += 1;
            }
        }
        assert_eq!(raised, 1);
    }

    #[test]
    fn ly_holds_zero_while_lcd_off() {
        let vram = vec![0; VRAM_SIZE];
        let mut ppu = Ppu::default();
        ppu.tick(LINE_CYCLES * 10, &vram);
        assert_eq!(ppu.ly, 0);
        assert_eq!(ppu.mode, PpuMode::HBlank);
    }
}
