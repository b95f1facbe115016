use super::super::{Bus, Cpu};
use super::IF_ADDR;
use crate::machine::Interrupt;

impl Cpu {
    /// Dispatch `source` through its vector.
    ///
    /// The entry sequence is five M-cycles: two internal cycles, the two
    /// writes of the PC push, and a final internal cycle while the vector
    /// is loaded. IME and the source's request bit are cleared before the
    /// push.
    pub(in crate::cpu) fn dispatch_interrupt<B: Bus>(&mut self, bus: &mut B, source: Interrupt) {
        let vector = source.vector();
        let pc = self.regs.pc;

        self.ime = false;
        self.halted = false;
        let iflags = bus.read8(IF_ADDR);
        bus.write8(IF_ADDR, iflags & !source.mask());

        self.idle_cycle(bus);
        self.idle_cycle(bus);
        self.push_u16(bus, pc);
        self.idle_cycle(bus);
        self.regs.pc = vector;

        log::debug!(
            "GB CPU interrupt: {} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X} IF=0x{:02X}",
            source.name(),
            vector,
            pc,
            self.regs.sp,
            iflags & 0x1F,
        );
    }
}
