use crate::error::Fault;

/// Abstraction over the Game Boy bus (memory and IO) as seen by the CPU.
///
/// The CPU charges every access itself: after each read, write or internal
/// M-cycle it calls [`Bus::tick`] with 4 T-cycles, so peripherals observe
/// time passing in step with the accesses that produce it.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Advance bus-side peripherals by a given number of T-cycles.
    ///
    /// Default implementation does nothing; system buses override this to
    /// drive the timer, serial port, PPU and APU.
    fn tick(&mut self, _cycles: u32) {}

    /// T-cycles the CPU must spend idle once the current instruction
    /// finishes (e.g. after an OAM DMA transfer was started). Reading the
    /// value clears it.
    fn take_stall_cycles(&mut self) -> u32 {
        0
    }

    /// Emulation-fatal condition raised by an access since the last call.
    ///
    /// Buses cannot fail an individual access, so a bad cartridge read
    /// returns open-bus data and latches the fault here for the CPU to
    /// report at the end of the instruction.
    fn take_fault(&mut self) -> Option<Fault> {
        None
    }
}
