use super::Timer;

impl Timer {
    #[inline]
    pub fn read_div(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    /// Writing any value to DIV clears the whole system counter. If the
    /// selected input bit was high, the reset is a falling edge and clocks
    /// TIMA once. Returns true on a resulting overflow.
    pub(in crate::machine) fn write_div(&mut self) -> bool {
        let edge = self.enabled() && self.counter & self.input_mask() != 0;
        self.counter = 0;
        edge && self.increment_tima()
    }

    #[inline]
    pub fn read_tima(&self) -> u8 {
        self.tima
    }

    pub(in crate::machine) fn write_tima(&mut self, value: u8) {
        self.tima = value;
    }

    #[inline]
    pub fn read_tma(&self) -> u8 {
        self.tma
    }

    pub(in crate::machine) fn write_tma(&mut self, value: u8) {
        self.tma = value;
    }

    #[inline]
    pub fn read_tac(&self) -> u8 {
        self.tac | 0b1111_1000
    }

    /// Disabling the timer or switching the selector while the selected
    /// bit is high also clocks TIMA once.
    pub(in crate::machine) fn write_tac(&mut self, value: u8) -> bool {
        let old_bit = self.enabled() && self.counter & self.input_mask() != 0;
        self.tac = value & 0x07;
        let new_bit = self.enabled() && self.counter & self.input_mask() != 0;
        old_bit && !new_bit && self.increment_tima()
    }
}
