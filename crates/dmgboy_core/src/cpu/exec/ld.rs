use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));
        let value = self.fetch16(bus);
        self.write_rp(opcode >> 4, value);
    }

    pub(super) fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let value = self.fetch8(bus);
        self.write_reg8(bus, opcode >> 3, value);
    }

    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.fetch16(bus);
        let [lo, hi] = self.regs.sp.to_le_bytes();
        self.write_cycle(bus, addr, lo);
        self.write_cycle(bus, addr.wrapping_add(1), hi);
    }

    /// Address for `LD (rr),A` / `LD A,(rr)`: BC, DE, HL+, HL-.
    fn indirect_address(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let addr = self.indirect_address(opcode);
        self.write_cycle(bus, addr, self.regs.a);
    }

    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let addr = self.indirect_address(opcode);
        self.regs.a = self.read_cycle(bus, addr);
    }

    pub(super) fn exec_ldh_a8<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let addr = 0xFF00 | self.fetch8(bus) as u16;
        if opcode == 0xE0 {
            self.write_cycle(bus, addr, self.regs.a);
        } else {
            self.regs.a = self.read_cycle(bus, addr);
        }
    }

    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let addr = 0xFF00 | self.regs.c as u16;
        if opcode == 0xE2 {
            self.write_cycle(bus, addr, self.regs.a);
        } else {
            self.regs.a = self.read_cycle(bus, addr);
        }
    }

    pub(super) fn exec_ld_a16_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let addr = self.fetch16(bus);
        if opcode == 0xEA {
            self.write_cycle(bus, addr, self.regs.a);
        } else {
            self.regs.a = self.read_cycle(bus, addr);
        }
    }

    pub(super) fn exec_ld_sp_hl<B: Bus>(&mut self, bus: &mut B) {
        self.idle_cycle(bus);
        self.regs.sp = self.regs.hl();
    }
}
