use super::alu;
use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Handle CB-prefixed instructions (bit operations, shifts, and rotates).
    ///
    /// The second byte decodes as `x y z`: `x` picks the group, `y` the
    /// shift kind or bit number, `z` the operand via the usual register
    /// index (6 = (HL)).
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) {
        let cb = self.fetch8(bus);
        let x = cb >> 6;
        let y = (cb >> 3) & 0x07;
        let z = cb & 0x07;

        let value = self.read_reg8(bus, z);
        match x {
            0 => {
                let (result, flags) = alu::shift(y, value, self.regs.f);
                self.write_reg8(bus, z, result);
                self.set_flags(flags);
            }
            1 => {
                // BIT b,r: C preserved, H set, N cleared. No write-back.
                self.set_flag(Flag::Z, value & (1 << y) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
            }
            2 => self.write_reg8(bus, z, value & !(1 << y)),
            _ => self.write_reg8(bus, z, value | (1 << y)),
        }
    }
}
