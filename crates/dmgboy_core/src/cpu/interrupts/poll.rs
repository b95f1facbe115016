use super::super::{Bus, Cpu};
use super::{IE_ADDR, IF_ADDR};

impl Cpu {
    /// Sources that are both enabled and requested, as a 5-bit mask.
    ///
    /// These reads are bookkeeping, not CPU bus cycles, so they are not
    /// charged.
    pub(in crate::cpu) fn pending_interrupts<B: Bus>(&self, bus: &mut B) -> u8 {
        let ie = bus.read8(IE_ADDR);
        let iflags = bus.read8(IF_ADDR);
        ie & iflags & 0x1F
    }
}
