use super::super::GameBoyBus;
use super::wram_index;
use crate::machine::interrupts::Interrupt;

impl GameBoyBus<'_> {
    pub(super) fn write8_mmio_impl(&mut self, addr: u16, value: u8) {
        match addr {
            // MBC control registers and external RAM.
            0x0000..=0x7FFF | 0xA000..=0xBFFF => self.cart.write(addr, value),

            0x8000..=0x9FFF => self.hw.vram[(addr - 0x8000) as usize] = value,

            0xC000..=0xFDFF => self.hw.wram[wram_index(addr)] = value,

            0xFE00..=0xFE9F => self.hw.oam[(addr - 0xFE00) as usize] = value,

            0xFEA0..=0xFEFF => {}

            0xFF00 => {
                if self.hw.joypad.write_select(value) {
                    self.hw.interrupts.request(Interrupt::Joypad);
                }
            }

            0xFF01 => self.hw.interrupts.serial.write_sb(value),
            0xFF02 => self.hw.interrupts.serial.write_sc(value),

            0xFF04..=0xFF07 => self.write_timer_register(addr, value),

            0xFF0F => self.hw.interrupts.write_if(value),

            0xFF10..=0xFF3F => self.hw.apu.write(addr, value),

            0xFF46 => self.start_oam_dma(value),
            0xFF40..=0xFF4B => {
                let raised = self.hw.ppu.write(addr, value);
                if raised.lcd_stat {
                    self.hw.interrupts.request(Interrupt::LcdStat);
                }
            }

            0xFF80..=0xFFFE => self.hw.hram[(addr - 0xFF80) as usize] = value,

            0xFFFF => self.hw.interrupts.write_ie(value),

            _ => {}
        }
    }

    fn write_timer_register(&mut self, addr: u16, value: u8) {
        let timer = &mut self.hw.interrupts.timer;
        let overflowed = match addr {
            0xFF04 => timer.write_div(),
            0xFF05 => {
                timer.write_tima(value);
                false
            }
            0xFF06 => {
                timer.write_tma(value);
                false
            }
            _ => timer.write_tac(value),
        };
        if overflowed {
            self.hw.interrupts.request(Interrupt::Timer);
        }
    }
}
