use super::{Cpu, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in the state the DMG boot ROM leaves it in at 0x0100.
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            ime: false,
            halted: false,
            stopped: false,
            ime_enable_pending: false,
            step_cycles: 0,
        };
        cpu.apply_dmg_boot_state();
        cpu
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Register values the DMG boot ROM hands over to cartridge code, as
    /// documented in Pan Docs. IME is clear; the game enables interrupts
    /// itself.
    fn apply_dmg_boot_state(&mut self) {
        self.regs = Registers {
            a: 0x01,
            f: 0xB0,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            sp: 0xFFFE,
            pc: 0x0100,
        };
        self.ime = false;
    }
}
