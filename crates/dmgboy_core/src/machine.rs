mod bus;
mod cartridge;
mod gameboy;
mod interrupts;
mod serial;
mod snapshot;
mod timer;
mod video;

pub use bus::{Apu, Hardware, Joypad, JoypadState, LcdControl, LcdStat, Ppu, PpuMode};
pub use cartridge::{
    Cartridge, CartridgeHeader, Mbc, Mbc1, Mbc2, Mbc3, Mbc5, MbcKind, NoMbc, Rtc, RtcRegisters,
};
pub use gameboy::{GameBoy, CYCLES_PER_FRAME};
pub use interrupts::{Interrupt, InterruptController, InterruptFlags};
pub use serial::Serial;
pub use snapshot::SNAPSHOT_VERSION;
pub use timer::Timer;

#[cfg(test)]
mod tests;
