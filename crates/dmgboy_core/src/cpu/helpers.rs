use super::{Bus, Cpu, Flag};

/// T-cycles in one machine cycle; every bus access costs exactly one.
pub(super) const M_CYCLE: u32 = 4;

impl Cpu {
    /// Perform a bus read and advance the rest of the machine by one
    /// M-cycle.
    #[inline]
    pub(super) fn read_cycle<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        let value = bus.read8(addr);
        self.idle_cycle(bus);
        value
    }

    /// Perform a bus write and advance the rest of the machine by one
    /// M-cycle.
    #[inline]
    pub(super) fn write_cycle<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u8) {
        bus.write8(addr, value);
        self.idle_cycle(bus);
    }

    /// One M-cycle of internal ALU latency without a memory access.
    #[inline]
    pub(super) fn idle_cycle<B: Bus>(&mut self, bus: &mut B) {
        bus.tick(M_CYCLE);
        self.step_cycles += M_CYCLE;
    }

    /// Read an 8-bit register or (HL) by index.
    ///
    /// The encoding matches the standard opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8<B: Bus>(&mut self, bus: &mut B, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => {
                let addr = self.regs.hl();
                self.read_cycle(bus, addr)
            }
            _ => self.regs.a,
        }
    }

    /// Write an 8-bit register or (HL) by index; see [`Cpu::read_reg8`].
    #[inline]
    pub(super) fn write_reg8<B: Bus>(&mut self, bus: &mut B, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => {
                let addr = self.regs.hl();
                self.write_cycle(bus, addr, value);
            }
            _ => self.regs.a = value,
        }
    }

    /// 16-bit register pair for the `rp` table: BC, DE, HL, SP.
    #[inline]
    pub(super) fn read_rp(&self, index: u8) -> u16 {
        match index & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_rp(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    /// 16-bit register pair for the `rp2` table used by PUSH/POP: BC, DE,
    /// HL, AF.
    #[inline]
    pub(super) fn read_rp2(&self, index: u8) -> u16 {
        match index & 0x03 {
            3 => self.regs.af(),
            other => self.read_rp(other),
        }
    }

    #[inline]
    pub(super) fn write_rp2(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            3 => self.regs.set_af(value),
            other => self.write_rp(other, value),
        }
    }

    /// Branch condition encoded in bits 3-4: NZ, Z, NC, C.
    #[inline]
    pub(super) fn condition(&self, cc: u8) -> bool {
        match cc & 0x03 {
            0 => !self.get_flag(Flag::Z),
            1 => self.get_flag(Flag::Z),
            2 => !self.get_flag(Flag::C),
            _ => self.get_flag(Flag::C),
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let pc = self.regs.pc;
        self.regs.pc = pc.wrapping_add(1);
        self.read_cycle(bus, pc)
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Push a 16-bit value: high byte at SP-1, low byte at SP-2.
    ///
    /// Only the two write cycles are charged; callers add the internal
    /// cycle that precedes the push on hardware.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write_cycle(bus, self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write_cycle(bus, self.regs.sp, lo);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.read_cycle(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = self.read_cycle(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }
}
