use super::{LcdControl, LcdStat, Ppu, STAT_WRITABLE};
use crate::machine::interrupts::InterruptFlags;

impl Ppu {
    pub(in crate::machine) fn read_stat(&self) -> u8 {
        0x80 | self.stat.to_byte() | self.mode as u8
    }

    pub(in crate::machine) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.lcdc.to_byte(),
            0xFF41 => self.read_stat(),
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF47 => self.bgp,
            0xFF48 => self.obp0,
            0xFF49 => self.obp1,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            _ => 0xFF,
        }
    }

    /// Register write. LCDC, STAT, LY and LYC can change the STAT line, so
    /// the returned flags may carry a STAT request.
    pub(in crate::machine) fn write(&mut self, addr: u16, value: u8) -> InterruptFlags {
        let mut raised = InterruptFlags::default();
        match addr {
            0xFF40 => self.write_lcdc(value, &mut raised),
            0xFF41 => {
                let kept = self.stat.to_byte() & !STAT_WRITABLE;
                self.stat = LcdStat::from_byte(kept | (value & STAT_WRITABLE));
                self.update_status(&mut raised);
            }
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            0xFF44 => {
                // Writing LY restarts the frame.
                self.ly = 0;
                self.frame_cycle = 0;
                self.stat_line = false;
                self.update_status(&mut raised);
            }
            0xFF45 => {
                self.lyc = value;
                self.update_status(&mut raised);
            }
            0xFF47 => self.bgp = value,
            0xFF48 => self.obp0 = value,
            0xFF49 => self.obp1 = value,
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            _ => {}
        }
        raised
    }

    fn write_lcdc(&mut self, value: u8, raised: &mut InterruptFlags) {
        let was_enabled = self.lcdc.lcd_enable;
        self.lcdc = LcdControl::from_byte(value);

        if was_enabled != self.lcdc.lcd_enable {
            // Switching the LCD either way restarts from the top of the frame.
            self.frame_cycle = 0;
            self.ly = 0;
            self.stat_line = false;
            log::debug!("GB PPU: LCD {}", if self.lcdc.lcd_enable { "on" } else { "off" });
        }
        self.update_status(raised);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_keeps_read_only_bits() {
        let mut ppu = Ppu::default();
        ppu.init_dmg();
        assert_eq!(ppu.read(0xFF41), 0x85);

        // Writing zeros cannot clear the coincidence or mode bits.
        ppu.write(0xFF41, 0x00);
        assert_eq!(ppu.read(0xFF41) & 0x87, 0x84 | ppu.mode as u8);

        ppu.write(0xFF41, 0xFF);
        assert_eq!(ppu.read(0xFF41) & 0x78, 0x78);
    }

    #[test]
    fn lcd_off_resets_ly() {
        let mut ppu = Ppu::default();
        ppu.init_dmg();
        ppu.ly = 99;
        ppu.write(0xFF40, 0x11);
        assert_eq!(ppu.read(0xFF44), 0);
        assert_eq!(ppu.read(0xFF41) & 0x03, 0);
    }

    #[test]
    fn lyc_write_can_raise_stat() {
        let mut ppu = Ppu::default();
        ppu.init_dmg();
        ppu.write(0xFF41, 0x40);
        ppu.ly = 7;
        assert!(!ppu.write(0xFF45, 3).lcd_stat);
        assert!(ppu.write(0xFF45, 7).lcd_stat);
    }
}
