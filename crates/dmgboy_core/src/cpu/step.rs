use crate::error::Fault;
use crate::machine::Interrupt;

use super::helpers::M_CYCLE;
use super::{Bus, Cpu};

impl Cpu {
    /// Execute one instruction, one interrupt dispatch, or one idle
    /// halted/stopped M-cycle, returning the T-cycles consumed.
    ///
    /// After an interrupt dispatch the handler's first instruction runs on
    /// the next call.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, Fault> {
        self.step_cycles = 0;

        // STOP freezes the system clock: nothing on the bus advances until
        // a joypad press clears `stopped`.
        if self.stopped {
            return Ok(M_CYCLE);
        }

        let pending = self.pending_interrupts(bus);
        if let Some(source) = Interrupt::highest(pending) {
            if self.ime {
                self.dispatch_interrupt(bus, source);
                return self.finish_step(bus);
            }
            // A request wakes HALT even with IME clear; execution continues
            // after the HALT without taking the vector.
            self.halted = false;
        }

        self.apply_ime_delay();

        if self.halted {
            self.idle_cycle(bus);
            return self.finish_step(bus);
        }

        let opcode = self.fetch8(bus);
        self.exec_opcode(bus, opcode)?;
        self.finish_step(bus)
    }

    fn finish_step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, Fault> {
        let stall = bus.take_stall_cycles();
        if stall > 0 {
            bus.tick(stall);
            self.step_cycles += stall;
        }
        match bus.take_fault() {
            Some(fault) => Err(fault),
            None => Ok(self.step_cycles),
        }
    }
}
