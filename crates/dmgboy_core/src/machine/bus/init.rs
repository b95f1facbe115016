use super::{Apu, Hardware, Joypad, Ppu, HRAM_SIZE, OAM_SIZE, VRAM_SIZE, WRAM_SIZE};
use crate::config::GameBoyConfig;
use crate::machine::interrupts::InterruptController;

impl Hardware {
    /// Hardware in the DMG post-boot-ROM state.
    pub(crate) fn new(config: &GameBoyConfig) -> Self {
        let mut hw = Self {
            wram: vec![0; WRAM_SIZE],
            hram: vec![0; HRAM_SIZE],
            vram: vec![0; VRAM_SIZE],
            oam: vec![0; OAM_SIZE],
            interrupts: InterruptController::default(),
            ppu: Ppu::default(),
            apu: Apu::new(config.sample_rate, config.audio_capacity),
            joypad: Joypad::default(),
            dma_source: 0xFF,
        };
        if config.randomize_ram {
            hw.randomize_internal_ram();
        }
        hw.apply_dmg_initial_io_state();
        hw
    }

    /// Initialize I/O registers to match the DMG/MGB power-on state.
    fn apply_dmg_initial_io_state(&mut self) {
        self.joypad.init_dmg();
        self.interrupts.serial.init_dmg();
        self.interrupts.timer.init_dmg();

        // IF has VBlank already requested at PC=0x0100; reads as 0xE1.
        self.interrupts.write_if(0x01);
        self.interrupts.write_ie(0x00);

        self.apu.init_dmg();
        self.ppu.init_dmg();
    }

    /// Fill internal WRAM and HRAM with pseudo-random bytes.
    ///
    /// Power-on contents are undefined on hardware. A fixed-seed xorshift
    /// keeps runs reproducible while software still cannot rely on zeroes.
    fn randomize_internal_ram(&mut self) {
        let mut x: u32 = 0xC0DE_1234;
        let mut next_byte = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        };

        for byte in self.wram.iter_mut().chain(self.hram.iter_mut()) {
            *byte = next_byte();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn randomized_ram_is_reproducible_and_not_blank() {
        let config = GameBoyConfig::default();
        let a = Hardware::new(&config);
        let b = Hardware::new(&config);
        assert_eq!(a.wram, b.wram);
        assert_eq!(a.hram, b.hram);
        assert!(a.wram.iter().any(|&byte| byte != 0));
    }

    #[test]
    fn zeroed_ram_when_randomization_is_off() {
        let config = GameBoyConfig::builder().randomize_ram(false).build();
        let hw = Hardware::new(&config);
        assert!(hw.wram.iter().all(|&byte| byte == 0));
        assert!(hw.hram.iter().all(|&byte| byte == 0));
    }
}
