use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// JR e / JR cc,e. The displacement is relative to the byte after the
    /// operand; a taken branch costs one extra internal cycle.
    pub(super) fn exec_jr<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let offset = self.fetch8(bus) as i8;
        if taken {
            self.idle_cycle(bus);
            self.regs.pc = self.regs.pc.wrapping_add_signed(offset as i16);
        }
    }

    pub(super) fn exec_jp<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let addr = self.fetch16(bus);
        if taken {
            self.idle_cycle(bus);
            self.regs.pc = addr;
        }
    }

    pub(super) fn exec_call<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let addr = self.fetch16(bus);
        if taken {
            self.idle_cycle(bus);
            self.push_u16(bus, self.regs.pc);
            self.regs.pc = addr;
        }
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_u16(bus);
        self.idle_cycle(bus);
    }

    /// RET cc spends an internal cycle on the condition check even when
    /// the branch is not taken.
    pub(super) fn exec_ret_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        self.idle_cycle(bus);
        if self.condition(opcode >> 3) {
            self.exec_ret(bus);
        }
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        self.idle_cycle(bus);
        self.push_u16(bus, self.regs.pc);
        self.regs.pc = (opcode & 0x38) as u16;
    }
}
