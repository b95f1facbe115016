use crate::cpu::{Bus, Cpu};

/// Divider register; STOP clears it.
const DIV: u16 = 0xFF04;

impl Cpu {
    /// HALT always enters halt mode. The IME=0 pending-interrupt PC glitch
    /// is not modelled: a pending interrupt simply wakes the CPU on the
    /// next step.
    pub(super) fn exec_halt(&mut self) {
        self.halted = true;
    }

    /// STOP is a 2-byte instruction whose padding byte is skipped without
    /// a bus access. The CPU stays stopped until a joypad press wakes it.
    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.regs.pc.wrapping_add(1);
        bus.write8(DIV, 0);
        self.stopped = true;
        self.halted = false;
        log::debug!("GB CPU STOP at PC=0x{:04X}", self.regs.pc.wrapping_sub(2));
    }

    pub(super) fn exec_di(&mut self) {
        self.ime = false;
        self.ime_enable_pending = false;
    }

    pub(super) fn exec_ei(&mut self) {
        // IME becomes 1 after the *next* instruction completes.
        self.ime_enable_pending = true;
    }
}
