use super::super::Cpu;

impl Cpu {
    /// Promote a pending EI to IME.
    ///
    /// Called at the top of the step that follows EI, after the interrupt
    /// check has already run with the old IME value, so exactly one more
    /// instruction executes before a dispatch can happen.
    #[inline]
    pub(in crate::cpu) fn apply_ime_delay(&mut self) {
        if self.ime_enable_pending {
            self.ime_enable_pending = false;
            self.ime = true;
        }
    }
}
