//! GBS (Game Boy Sound) music files.
//!
//! A GBS file is a 0x70-byte header followed by a tune's code and data.
//! [`GbsPlayer`] builds a small MBC5 cartridge image around the data and
//! runs it on an ordinary [`GameBoy`]: a stub calls the init routine once,
//! then sleeps in HALT while VBlank (or the timer) calls the play routine.

use crate::config::GameBoyConfig;
use crate::error::{Abort, Error, GbsError};
use crate::machine::GameBoy;

pub const GBS_HEADER_LEN: usize = 0x70;

/// Entry stub location, just past the cartridge header.
const STUB_ADDR: u16 = 0x0150;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GbsHeader {
    pub version: u8,
    pub song_count: u8,
    /// 1-based, as stored in the file.
    pub first_song: u8,
    pub load_addr: u16,
    pub init_addr: u16,
    pub play_addr: u16,
    pub stack_pointer: u16,
    pub timer_modulo: u8,
    pub timer_control: u8,
    pub title: String,
    pub author: String,
    pub copyright: String,
}

fn le16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn text_field(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

impl GbsHeader {
    pub fn parse(file: &[u8]) -> Result<Self, GbsError> {
        if file.len() < 3 || &file[..3] != b"GBS" {
            return Err(GbsError::BadMagic);
        }
        if file.len() <= GBS_HEADER_LEN {
            return Err(GbsError::InvalidHeader("file truncated before tune data"));
        }

        let version = file[0x03];
        if version != 1 {
            return Err(GbsError::UnsupportedVersion(version));
        }

        let header = Self {
            version,
            song_count: file[0x04],
            first_song: file[0x05],
            load_addr: le16(file, 0x06),
            init_addr: le16(file, 0x08),
            play_addr: le16(file, 0x0A),
            stack_pointer: le16(file, 0x0C),
            timer_modulo: file[0x0E],
            timer_control: file[0x0F],
            title: text_field(&file[0x10..0x30]),
            author: text_field(&file[0x30..0x50]),
            copyright: text_field(&file[0x50..0x70]),
        };

        if header.song_count == 0 {
            return Err(GbsError::InvalidHeader("song count is zero"));
        }
        if header.load_addr < 0x0400 || header.load_addr >= 0x8000 {
            return Err(GbsError::InvalidHeader("load address outside 0x0400-0x7FFF"));
        }
        if header.init_addr < header.load_addr || header.play_addr < header.load_addr {
            return Err(GbsError::InvalidHeader("routine below load address"));
        }
        Ok(header)
    }

    /// Play is driven by the timer interrupt instead of VBlank.
    pub fn uses_timer(&self) -> bool {
        self.timer_control & 0x04 != 0
    }

    /// Default song as a 0-based index.
    pub fn first_song_index(&self) -> u8 {
        self.first_song.saturating_sub(1)
    }
}

/// Lay the tune out as an MBC5 cartridge with RST/interrupt trampolines and
/// an entry stub.
fn build_rom(header: &GbsHeader, data: &[u8]) -> Result<Vec<u8>, GbsError> {
    let load = header.load_addr as usize;
    let banks = (load + data.len()).div_ceil(0x4000).max(2).next_power_of_two();
    if banks > 512 {
        return Err(GbsError::InvalidHeader("tune data exceeds 8 MiB"));
    }
    let mut rom = vec![0u8; banks * 0x4000];

    // RST n -> load + n.
    for n in (0..0x40).step_by(8) {
        let [lo, hi] = (header.load_addr + n as u16).to_le_bytes();
        rom[n..n + 3].copy_from_slice(&[0xC3, lo, hi]);
    }

    // Interrupt vectors: every one returns, except the one that plays.
    for vector in (0x40..=0x60).step_by(8) {
        rom[vector] = 0xD9;
    }
    let play_vector = if header.uses_timer() { 0x50 } else { 0x40 };
    let [lo, hi] = header.play_addr.to_le_bytes();
    rom[play_vector..play_vector + 4].copy_from_slice(&[0xCD, lo, hi, 0xD9]);

    // 0x0100: JP stub.
    let [lo, hi] = STUB_ADDR.to_le_bytes();
    rom[0x100..0x103].copy_from_slice(&[0xC3, lo, hi]);

    // Header: title, MBC5+RAM, ROM size code, 8 KiB RAM.
    let title = header.title.as_bytes();
    let title_len = title.len().min(15);
    rom[0x134..0x134 + title_len].copy_from_slice(&title[..title_len]);
    rom[0x147] = 0x1A;
    rom[0x148] = (banks / 2).trailing_zeros() as u8;
    rom[0x149] = 0x02;

    // Stub: CALL init; EI; HALT; JR -3 (back to HALT).
    let stub = STUB_ADDR as usize;
    let [lo, hi] = header.init_addr.to_le_bytes();
    rom[stub..stub + 7].copy_from_slice(&[0xCD, lo, hi, 0xFB, 0x76, 0x18, 0xFD]);

    rom[load..load + data.len()].copy_from_slice(data);
    Ok(rom)
}

/// Plays the songs of one GBS file on a private session.
pub struct GbsPlayer {
    header: GbsHeader,
    rom: Vec<u8>,
    config: GameBoyConfig,
    gb: GameBoy,
    song: u8,
}

impl GbsPlayer {
    /// Parse `file` and start its default song.
    pub fn new(file: &[u8], config: GameBoyConfig) -> Result<Self, Error> {
        let header = GbsHeader::parse(file)?;
        let rom = build_rom(&header, &file[GBS_HEADER_LEN..])?;
        log::info!(
            "GB GBS: \"{}\" by {} ({} songs, load=0x{:04X} init=0x{:04X} play=0x{:04X}, {})",
            header.title,
            header.author,
            header.song_count,
            header.load_addr,
            header.init_addr,
            header.play_addr,
            if header.uses_timer() { "timer" } else { "vblank" },
        );

        let gb = GameBoy::with_config(rom.clone(), config.clone())?;
        let mut player = Self {
            song: header.first_song_index(),
            header,
            rom,
            config,
            gb,
        };
        player.start_song(player.song)?;
        Ok(player)
    }

    pub fn header(&self) -> &GbsHeader {
        &self.header
    }

    pub fn song(&self) -> u8 {
        self.song
    }

    pub fn session(&self) -> &GameBoy {
        &self.gb
    }

    /// Reset the machine and run song `song` (0-based) from its init call.
    pub fn start_song(&mut self, song: u8) -> Result<(), Error> {
        if song >= self.header.song_count {
            return Err(GbsError::SongOutOfRange {
                song,
                count: self.header.song_count,
            }
            .into());
        }

        let mut gb = GameBoy::with_config(self.rom.clone(), self.config.clone())?;
        gb.cpu.regs.a = song;
        gb.cpu.regs.sp = self.header.stack_pointer;
        gb.cpu.ime = false;

        // Open cartridge RAM for tunes that keep state there.
        gb.poke(0x0000, 0x0A);
        if self.header.uses_timer() {
            gb.poke(0xFF06, self.header.timer_modulo);
            gb.poke(0xFF07, self.header.timer_control & 0x07);
            gb.poke(0xFFFF, 0x04);
        } else {
            gb.poke(0xFFFF, 0x01);
        }
        gb.poke(0xFF0F, 0x00);

        self.gb = gb;
        self.song = song;
        log::debug!("GB GBS: start song {}/{}", song + 1, self.header.song_count);
        Ok(())
    }

    pub fn step(&mut self) -> Result<u32, Abort> {
        self.gb.step()
    }

    pub fn step_frame(&mut self) -> Result<u32, Abort> {
        self.gb.step_frame()
    }

    pub fn read_audio<'b>(&mut self, out: &'b mut [u8]) -> &'b [u8] {
        self.gb.read_audio(out)
    }
}
