use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HeaderError;

/// Cartridge chip family selected by the header's cartridge-type byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MbcKind {
    None,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
}

impl fmt::Display for MbcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MbcKind::None => "ROM-only",
            MbcKind::Mbc1 => "MBC1",
            MbcKind::Mbc2 => "MBC2",
            MbcKind::Mbc3 => "MBC3",
            MbcKind::Mbc5 => "MBC5",
        };
        f.write_str(name)
    }
}

/// Fields read from the fixed header area at 0x0100-0x014F.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    /// Four-character manufacturer code (only present on CGB-era headers).
    pub manufacturer: Option<String>,
    pub cgb_flag: u8,
    /// Two-character licensee code, used when `old_licensee == 0x33`.
    pub new_licensee: Option<String>,
    pub sgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub destination: u8,
    pub old_licensee: u8,
    pub mask_rom_version: u8,
    pub mbc: MbcKind,
    pub rom_size: usize,
    pub ram_size: usize,
    pub battery: bool,
    pub rtc: bool,
}

pub(crate) const HEADER_END: usize = 0x150;

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self, HeaderError> {
        if rom.len() < HEADER_END {
            return Err(HeaderError::TooSmall(rom.len()));
        }

        let cgb_flag = rom[0x143];
        let extended = cgb_flag >= 0x80;
        let title_bytes = if extended {
            &rom[0x134..0x13F]
        } else {
            &rom[0x134..0x144]
        };
        let manufacturer = extended.then(|| ascii_field(&rom[0x13F..0x143]));

        let old_licensee = rom[0x14B];
        let new_licensee = (old_licensee == 0x33).then(|| ascii_field(&rom[0x144..0x146]));

        let cartridge_type = rom[0x147];
        let (mbc, battery, rtc) = decode_cartridge_type(cartridge_type)?;

        let rom_size_code = rom[0x148];
        let rom_size = match rom_size_code {
            0x00..=0x08 => 0x8000usize << rom_size_code,
            0x52 => 72 * 0x4000,
            0x53 => 80 * 0x4000,
            0x54 => 96 * 0x4000,
            other => return Err(HeaderError::UnknownRomSize(other)),
        };

        let ram_size_code = rom[0x149];
        let ram_size = match ram_size_code {
            0x00 => 0,
            0x01 => 0x800,
            0x02 => 0x2000,
            0x03 => 0x8000,
            0x04 => 0x2_0000,
            0x05 => 0x1_0000,
            other => return Err(HeaderError::UnknownRamSize(other)),
        };

        Ok(Self {
            title: ascii_field(title_bytes),
            manufacturer,
            cgb_flag,
            new_licensee,
            sgb_flag: rom[0x146],
            cartridge_type,
            rom_size_code,
            ram_size_code,
            destination: rom[0x14A],
            old_licensee,
            mask_rom_version: rom[0x14C],
            mbc,
            rom_size,
            ram_size,
            battery,
            rtc,
        })
    }

    /// Number of bytes of cartridge RAM the session must allocate.
    ///
    /// MBC2 carries 512 half-byte cells on the chip itself regardless of the
    /// header's RAM-size code.
    pub fn cart_ram_len(&self) -> usize {
        match self.mbc {
            MbcKind::Mbc2 => 0x200,
            _ => self.ram_size,
        }
    }
}

fn decode_cartridge_type(code: u8) -> Result<(MbcKind, bool, bool), HeaderError> {
    let decoded = match code {
        0x00 | 0x08 => (MbcKind::None, false, false),
        0x09 => (MbcKind::None, true, false),
        0x01 | 0x02 => (MbcKind::Mbc1, false, false),
        0x03 => (MbcKind::Mbc1, true, false),
        0x05 => (MbcKind::Mbc2, false, false),
        0x06 => (MbcKind::Mbc2, true, false),
        0x0F | 0x10 => (MbcKind::Mbc3, true, true),
        0x11 | 0x12 => (MbcKind::Mbc3, false, false),
        0x13 => (MbcKind::Mbc3, true, false),
        0x19 | 0x1A | 0x1C | 0x1D => (MbcKind::Mbc5, false, false),
        0x1B | 0x1E => (MbcKind::Mbc5, true, false),
        other => return Err(HeaderError::UnknownCartridgeType(other)),
    };
    Ok(decoded)
}

/// Decode a fixed-width header string, dropping trailing NUL padding.
fn ascii_field(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    bytes[..end]
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
        .collect()
}
