use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// DMG master clock in Hz.
const CPU_HZ: u64 = 4_194_304;

const NR10: u16 = 0xFF10;
const NR52: u16 = 0xFF26;
const WAVE_START: u16 = 0xFF30;

/// Bits that read back as 1 for each register from NR10 to NR52.
const READ_MASKS: [u8; 0x17] = [
    0x80, 0x3F, 0x00, 0xFF, 0xBF, // NR10-NR14
    0xFF, 0x3F, 0x00, 0xFF, 0xBF, // (unused), NR21-NR24
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
    0xFF, 0xFF, 0x00, 0x00, 0xBF, // (unused), NR41-NR44
    0x00, 0x00, 0x70, // NR50, NR51, NR52
];

/// Trigger registers (NRx4) in channel order.
const TRIGGERS: [u16; 4] = [0xFF14, 0xFF19, 0xFF1E, 0xFF23];

/// Sound register file and output sample clock.
///
/// Channels are not synthesised here: the register file behaves as games
/// observe it, and the sample clock emits silent stereo frames at the
/// host rate for an external mixer to replace.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Apu {
    regs: Vec<u8>,
    wave: [u8; 16],
    /// NR52 bits 3-0.
    channels_on: u8,
    sample_rate: u32,
    capacity: usize,
    /// Fractional sample position, in units of 1/CPU_HZ samples.
    phase: u64,
    #[serde(skip)]
    samples: VecDeque<[i16; 2]>,
}

impl Apu {
    pub fn new(sample_rate: u32, capacity: usize) -> Self {
        Self {
            regs: vec![0; READ_MASKS.len()],
            wave: [0; 16],
            channels_on: 0,
            sample_rate,
            capacity,
            phase: 0,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub(super) fn init_dmg(&mut self) {
        const BOOT: [u8; 0x17] = [
            0x80, 0xBF, 0xF3, 0xFF, 0xBF, // NR10-NR14
            0x00, 0x3F, 0x00, 0xFF, 0xBF, // NR21-NR24
            0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
            0x00, 0xFF, 0x00, 0x00, 0xBF, // NR41-NR44
            0x77, 0xF3, 0x80, // NR50-NR52
        ];
        self.regs.copy_from_slice(&BOOT);
        // The boot chime leaves channel 1 flagged as playing.
        self.channels_on = 0x01;
    }

    #[inline]
    pub fn powered(&self) -> bool {
        self.regs[(NR52 - NR10) as usize] & 0x80 != 0
    }

    pub(super) fn read(&self, addr: u16) -> u8 {
        match addr {
            NR10..=NR52 => {
                let index = (addr - NR10) as usize;
                let value = self.regs[index] | READ_MASKS[index];
                if addr == NR52 {
                    value | self.channels_on
                } else {
                    value
                }
            }
            WAVE_START..=0xFF3F => self.wave[(addr - WAVE_START) as usize],
            _ => 0xFF,
        }
    }

    pub(super) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            NR52 => self.write_nr52(value),
            // Registers are read-only while the APU is powered off.
            NR10..=0xFF25 if self.powered() => {
                self.regs[(addr - NR10) as usize] = value;
                if let Some(channel) = TRIGGERS.iter().position(|&t| t == addr) {
                    if value & 0x80 != 0 {
                        self.channels_on |= 1 << channel;
                    }
                }
            }
            WAVE_START..=0xFF3F => self.wave[(addr - WAVE_START) as usize] = value,
            _ => {}
        }
    }

    fn write_nr52(&mut self, value: u8) {
        let was_on = self.powered();
        let now_on = value & 0x80 != 0;
        if was_on && !now_on {
            self.regs.fill(0);
            self.channels_on = 0;
            log::debug!("GB APU: powered off");
        }
        self.regs[(NR52 - NR10) as usize] = value & 0x80;
    }

    /// Advance the output sample clock.
    pub(in crate::machine) fn tick(&mut self, cycles: u32) {
        self.phase += cycles as u64 * self.sample_rate as u64;
        while self.phase >= CPU_HZ {
            self.phase -= CPU_HZ;
            while self.samples.len() >= self.capacity.max(1) {
                self.samples.pop_front();
            }
            self.samples.push_back([0, 0]);
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn buffered_frames(&self) -> usize {
        self.samples.len()
    }

    /// Drain as many 16-bit little-endian stereo frames as fit into `out`,
    /// returning the filled prefix.
    pub fn read_audio<'b>(&mut self, out: &'b mut [u8]) -> &'b [u8] {
        let frames = (out.len() / 4).min(self.samples.len());
        for (chunk, [left, right]) in out.chunks_exact_mut(4).zip(self.samples.drain(..frames)) {
            chunk[..2].copy_from_slice(&left.to_le_bytes());
            chunk[2..].copy_from_slice(&right.to_le_bytes());
        }
        &out[..frames * 4]
    }
}
