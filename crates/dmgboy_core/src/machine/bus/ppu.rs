//! Video controller register state and line timing.
//!
//! Pixel output is limited to the background layer, composed once per
//! frame when VBlank begins (see `machine::video`).

mod mmio;
mod timing;

use serde::{Deserialize, Serialize};

use crate::bits::bit_register;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

bit_register! {
    /// LCDC (0xFF40).
    pub struct LcdControl {
        0 => bg_enable,
        1 => obj_enable,
        2 => obj_tall,
        3 => bg_map_high,
        4 => tile_data_unsigned,
        5 => window_enable,
        6 => window_map_high,
        7 => lcd_enable,
    }
}

bit_register! {
    /// STAT (0xFF41) flag bits. The mode lives in bits 1-0 and is tracked
    /// separately as [`PpuMode`].
    pub struct LcdStat {
        2 => coincidence,
        3 => hblank_select,
        4 => vblank_select,
        5 => oam_select,
        6 => lyc_select,
    }
}

/// STAT bits that the CPU may write.
const STAT_WRITABLE: u8 = 0x78;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PpuMode {
    #[default]
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Transfer = 3,
}

/// RGBA bytes in one frame.
pub(crate) const FRAMEBUFFER_LEN: usize = SCREEN_WIDTH * SCREEN_HEIGHT * 4;

fn blank_frame() -> Vec<u8> {
    vec![0xFF; FRAMEBUFFER_LEN]
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ppu {
    pub lcdc: LcdControl,
    pub stat: LcdStat,
    pub mode: PpuMode,
    pub scy: u8,
    pub scx: u8,
    pub ly: u8,
    pub lyc: u8,
    pub bgp: u8,
    pub obp0: u8,
    pub obp1: u8,
    pub wy: u8,
    pub wx: u8,
    /// T-cycle position inside the current frame.
    frame_cycle: u32,
    /// ORed level of the enabled STAT sources at the last update.
    stat_line: bool,
    #[serde(skip, default = "blank_frame")]
    framebuffer: Vec<u8>,
    flip: bool,
    /// VBlank entries since power-on.
    frames: u64,
}

impl Default for Ppu {
    fn default() -> Self {
        Self {
            lcdc: LcdControl::default(),
            stat: LcdStat::default(),
            mode: PpuMode::HBlank,
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0,
            obp0: 0,
            obp1: 0,
            wy: 0,
            wx: 0,
            frame_cycle: 0,
            stat_line: false,
            framebuffer: blank_frame(),
            flip: false,
            frames: 0,
        }
    }
}

impl Ppu {
    pub(super) fn init_dmg(&mut self) {
        *self = Self {
            lcdc: LcdControl::from_byte(0x91),
            stat: LcdStat::from_byte(0x04),
            mode: PpuMode::VBlank,
            bgp: 0xFC,
            ..Self::default()
        };
    }

    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    pub fn flip_pending(&self) -> bool {
        self.flip
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// True once per completed frame; reading clears it.
    pub fn take_flip(&mut self) -> bool {
        std::mem::take(&mut self.flip)
    }
}
