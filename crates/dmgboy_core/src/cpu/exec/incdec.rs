use crate::cpu::alu;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let reg = opcode >> 3;
        let value = self.read_reg8(bus, reg);
        let (result, flags) = alu::inc8(value, self.regs.f);
        self.write_reg8(bus, reg, result);
        self.set_flags(flags);
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let reg = opcode >> 3;
        let value = self.read_reg8(bus, reg);
        let (result, flags) = alu::dec8(value, self.regs.f);
        self.write_reg8(bus, reg, result);
        self.set_flags(flags);
    }

    // 16-bit INC/DEC leave the flags alone and spend one internal cycle.

    pub(super) fn exec_inc16<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let rp = opcode >> 4;
        self.write_rp(rp, self.read_rp(rp).wrapping_add(1));
        self.idle_cycle(bus);
    }

    pub(super) fn exec_dec16<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let rp = opcode >> 4;
        self.write_rp(rp, self.read_rp(rp).wrapping_sub(1));
        self.idle_cycle(bus);
    }
}
