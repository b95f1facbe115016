//! DMG Game Boy emulation core.
//!
//! [`GameBoy`] is the session facade: build one from a ROM image, call
//! [`GameBoy::step`] in a loop, and read back the framebuffer, audio queue
//! and battery RAM between steps.

mod bits;
pub mod config;
pub mod cpu;
pub mod debugger;
pub mod error;
pub mod gbs;
pub mod machine;

pub use config::GameBoyConfig;
pub use error::{Abort, Error, Fault, GbsError, HeaderError, SnapshotError};
pub use machine::{GameBoy, JoypadState};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
