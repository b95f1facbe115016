use crate::cpu::alu::{self, AluOp};
use crate::cpu::{Bus, Cpu, Flag};

impl Cpu {
    pub(in crate::cpu) fn alu(&mut self, op: AluOp, value: u8) {
        let (result, flags) = op.apply(self.regs.a, value, self.regs.f);
        self.regs.a = result;
        self.set_flags(flags);
    }

    pub(super) fn exec_alu_imm<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert_eq!(opcode & 0xC7, 0xC6);
        let value = self.fetch8(bus);
        self.alu(AluOp::from_bits(opcode >> 3), value);
    }

    /// RLCA, RRCA, RLA, RRA: the CB shifts on A with Z forced clear.
    pub(super) fn exec_rotate_a(&mut self, opcode: u8) {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));
        let (result, flags) = alu::shift(opcode >> 3, self.regs.a, self.regs.f);
        self.regs.a = result;
        self.set_flags(flags & !Flag::Z.mask());
    }

    pub(super) fn exec_daa(&mut self) {
        let (result, flags) = alu::daa(self.regs.a, self.regs.f);
        self.regs.a = result;
        self.set_flags(flags);
    }

    pub(super) fn exec_cpl(&mut self) {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
    }

    pub(super) fn exec_scf(&mut self) {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
    }

    pub(super) fn exec_ccf(&mut self) {
        let carry = self.get_flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
    }

    pub(super) fn exec_add_hl_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let value = self.read_rp(opcode >> 4);
        let (result, flags) = alu::add16(self.regs.hl(), value, self.regs.f);
        self.idle_cycle(bus);
        self.regs.set_hl(result);
        self.set_flags(flags);
    }

    pub(super) fn exec_add_sp_e<B: Bus>(&mut self, bus: &mut B) {
        let offset = self.fetch8(bus);
        let (result, flags) = alu::add_sp_offset(self.regs.sp, offset);
        self.idle_cycle(bus);
        self.idle_cycle(bus);
        self.regs.sp = result;
        self.set_flags(flags);
    }

    pub(super) fn exec_ld_hl_sp_e<B: Bus>(&mut self, bus: &mut B) {
        let offset = self.fetch8(bus);
        let (result, flags) = alu::add_sp_offset(self.regs.sp, offset);
        self.idle_cycle(bus);
        self.regs.set_hl(result);
        self.set_flags(flags);
    }
}
