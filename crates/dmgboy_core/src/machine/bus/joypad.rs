use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Buttons currently held by the host. A set bit means pressed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct JoypadState: u8 {
        const RIGHT  = 1 << 0;
        const LEFT   = 1 << 1;
        const UP     = 1 << 2;
        const DOWN   = 1 << 3;
        const A      = 1 << 4;
        const B      = 1 << 5;
        const SELECT = 1 << 6;
        const START  = 1 << 7;
    }
}

/// P1 bit 4 low selects the d-pad, bit 5 low selects the buttons.
const SELECT_DPAD: u8 = 0x10;
const SELECT_BUTTONS: u8 = 0x20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct InputChange {
    /// A selected input line fell from 1 to 0.
    pub interrupt: bool,
    /// Some button went from released to pressed.
    pub pressed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joypad {
    /// P1 bits 5-4 as last written.
    select: u8,
    state: JoypadState,
}

impl Joypad {
    pub(super) fn init_dmg(&mut self) {
        self.select = 0x00;
        self.state = JoypadState::empty();
    }

    pub fn state(&self) -> JoypadState {
        self.state
    }

    /// Low nibble of P1: active-low lines of every selected group.
    fn lines(&self) -> u8 {
        let held = self.state.bits();
        let mut low = 0x0F;
        if self.select & SELECT_DPAD == 0 {
            low &= !held & 0x0F;
        }
        if self.select & SELECT_BUTTONS == 0 {
            low &= !(held >> 4) & 0x0F;
        }
        low
    }

    pub(super) fn read(&self) -> u8 {
        0xC0 | self.select | self.lines()
    }

    /// Returns true if the new selection pulls a line low.
    pub(super) fn write_select(&mut self, value: u8) -> bool {
        let before = self.lines();
        self.select = value & (SELECT_DPAD | SELECT_BUTTONS);
        before & !self.lines() != 0
    }

    pub(super) fn update(&mut self, state: JoypadState) -> InputChange {
        let before = self.lines();
        let newly_pressed = state & !self.state;
        self.state = state;
        InputChange {
            interrupt: before & !self.lines() != 0,
            pressed: !newly_pressed.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_value_selects_both_groups() {
        let mut joypad = Joypad::default();
        joypad.init_dmg();
        assert_eq!(joypad.read(), 0xCF);
    }

    #[test]
    fn selected_group_reads_active_low() {
        let mut joypad = Joypad::default();
        joypad.write_select(SELECT_DPAD);
        joypad.update(JoypadState::A | JoypadState::LEFT);
        assert_eq!(joypad.read(), 0xC0 | SELECT_DPAD | 0x0E, "buttons only");

        joypad.write_select(SELECT_BUTTONS);
        assert_eq!(joypad.read(), 0xC0 | SELECT_BUTTONS | 0x0D, "d-pad only");

        joypad.write_select(0x30);
        assert_eq!(joypad.read(), 0xFF);
    }

    #[test]
    fn only_selected_falling_edges_interrupt() {
        let mut joypad = Joypad::default();
        joypad.write_select(SELECT_DPAD);

        // D-pad is deselected, so its line never falls.
        let change = joypad.update(JoypadState::UP);
        assert!(!change.interrupt);
        assert!(change.pressed);

        let change = joypad.update(JoypadState::UP | JoypadState::START);
        assert!(change.interrupt);

        // Releasing is a rising edge.
        let change = joypad.update(JoypadState::UP);
        assert!(!change.interrupt);
        assert!(!change.pressed);

        // Selecting the d-pad while UP is held pulls its line low.
        assert!(joypad.write_select(0x00));
    }
}
