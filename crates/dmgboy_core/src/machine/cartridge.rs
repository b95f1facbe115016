mod header;
mod mbc1;
mod mbc2;
mod mbc3;
mod mbc5;
mod rtc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Fault, HeaderError, SnapshotError};

pub use header::{CartridgeHeader, MbcKind};
pub use mbc1::Mbc1;
pub use mbc2::Mbc2;
pub use mbc3::Mbc3;
pub use mbc5::Mbc5;
pub use rtc::{Rtc, RtcRegisters};

pub(crate) const ROM_BANK_SIZE: usize = 0x4000;
pub(crate) const RAM_BANK_SIZE: usize = 0x2000;

/// Read one byte of ROM through `bank`, failing instead of wrapping when
/// the bank lies past the end of the image.
pub(crate) fn rom_byte(rom: &[u8], bank: u16, addr: u16) -> Result<u8, Fault> {
    let index = bank as usize * ROM_BANK_SIZE + (addr as usize & (ROM_BANK_SIZE - 1));
    rom.get(index).copied().ok_or(Fault::RomOutOfBounds {
        address: addr,
        bank,
        rom_len: rom.len(),
    })
}

#[inline]
pub(crate) fn ram_index(bank: u8, addr: u16) -> usize {
    bank as usize * RAM_BANK_SIZE + (addr as usize & (RAM_BANK_SIZE - 1))
}

/// MBC RAM gates open iff the low nibble of the write is 0xA.
#[inline]
pub(crate) fn ram_enable_pattern(value: u8) -> bool {
    value & 0x0F == 0x0A
}

/// Plain 32 KiB ROM with optional unbanked RAM.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoMbc;

/// Cartridge chip state, one variant per supported controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mbc {
    None(NoMbc),
    Mbc1(Mbc1),
    Mbc2(Mbc2),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

impl Mbc {
    pub fn new(header: &CartridgeHeader) -> Self {
        match header.mbc {
            MbcKind::None => Mbc::None(NoMbc),
            MbcKind::Mbc1 => Mbc::Mbc1(Mbc1::new(header.rom_size)),
            MbcKind::Mbc2 => Mbc::Mbc2(Mbc2::default()),
            MbcKind::Mbc3 => Mbc::Mbc3(Mbc3::new(header.rtc)),
            MbcKind::Mbc5 => Mbc::Mbc5(Mbc5::default()),
        }
    }

    pub fn kind(&self) -> MbcKind {
        match self {
            Mbc::None(_) => MbcKind::None,
            Mbc::Mbc1(_) => MbcKind::Mbc1,
            Mbc::Mbc2(_) => MbcKind::Mbc2,
            Mbc::Mbc3(_) => MbcKind::Mbc3,
            Mbc::Mbc5(_) => MbcKind::Mbc5,
        }
    }

    /// Read from 0x0000-0x7FFF or 0xA000-0xBFFF.
    pub fn read(&mut self, rom: &[u8], ram: &[u8], addr: u16) -> Result<u8, Fault> {
        match addr {
            0x0000..=0x7FFF => match self {
                Mbc::None(_) => rom_byte(rom, addr >> 14, addr),
                Mbc::Mbc1(m) => m.read_rom(rom, addr),
                Mbc::Mbc2(m) => m.read_rom(rom, addr),
                Mbc::Mbc3(m) => m.read_rom(rom, addr),
                Mbc::Mbc5(m) => m.read_rom(rom, addr),
            },
            0xA000..=0xBFFF => Ok(match self {
                Mbc::None(_) => ram.get(ram_index(0, addr)).copied().unwrap_or(0xFF),
                Mbc::Mbc1(m) => m.read_ram(ram, addr),
                Mbc::Mbc2(m) => m.read_ram(ram, addr),
                Mbc::Mbc3(m) => m.read_ram(ram, addr),
                Mbc::Mbc5(m) => m.read_ram(ram, addr),
            }),
            _ => Ok(0xFF),
        }
    }

    /// Write to a control register (0x0000-0x7FFF) or cartridge RAM.
    pub fn write(&mut self, ram: &mut [u8], addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => match self {
                Mbc::None(_) => {}
                Mbc::Mbc1(m) => m.write_control(addr, value),
                Mbc::Mbc2(m) => m.write_control(addr, value),
                Mbc::Mbc3(m) => m.write_control(addr, value),
                Mbc::Mbc5(m) => m.write_control(addr, value),
            },
            0xA000..=0xBFFF => match self {
                Mbc::None(_) => {
                    if let Some(cell) = ram.get_mut(ram_index(0, addr)) {
                        *cell = value;
                    }
                }
                Mbc::Mbc1(m) => m.write_ram(ram, addr, value),
                Mbc::Mbc2(m) => m.write_ram(ram, addr, value),
                Mbc::Mbc3(m) => m.write_ram(ram, addr, value),
                Mbc::Mbc5(m) => m.write_ram(ram, addr, value),
            },
            _ => {}
        }
    }

    /// Bank currently mapped at 0x4000-0x7FFF. Diagnostic only.
    pub fn current_rom_bank(&self) -> u16 {
        match self {
            Mbc::None(_) => 1,
            Mbc::Mbc1(m) => m.rom_bank(),
            Mbc::Mbc2(m) => m.rom_bank(),
            Mbc::Mbc3(m) => m.rom_bank(),
            Mbc::Mbc5(m) => m.rom_bank(),
        }
    }

    /// Serialize the chip's own registers (including RTC state).
    pub fn marshal(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn unmarshal(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// A loaded cartridge: the ROM image, its battery RAM and the controller
/// that maps both into the address space.
#[derive(Clone, Debug)]
pub struct Cartridge {
    header: CartridgeHeader,
    rom: Vec<u8>,
    ram: Vec<u8>,
    mbc: Mbc,
}

impl Cartridge {
    pub fn new(rom: Vec<u8>) -> Result<Self, HeaderError> {
        let header = CartridgeHeader::parse(&rom)?;
        let ram = vec![0xFF; header.cart_ram_len()];
        let mbc = Mbc::new(&header);
        log::info!(
            "GB cartridge: \"{}\" {} type=0x{:02X} rom={} bytes (header {}), ram={} bytes",
            header.title,
            header.mbc,
            header.cartridge_type,
            rom.len(),
            header.rom_size,
            ram.len(),
        );
        if rom.len() != header.rom_size {
            log::warn!(
                "GB cartridge: image is {} bytes but header declares {}",
                rom.len(),
                header.rom_size
            );
        }
        Ok(Self {
            header,
            rom,
            ram,
            mbc,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    pub fn mbc(&self) -> &Mbc {
        &self.mbc
    }

    #[inline]
    pub fn read(&mut self, addr: u16) -> Result<u8, Fault> {
        self.mbc.read(&self.rom, &self.ram, addr)
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.mbc.write(&mut self.ram, addr, value);
    }

    pub fn current_rom_bank(&self) -> u16 {
        self.mbc.current_rom_bank()
    }

    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Replace cartridge RAM with a save image of exactly the same size.
    pub fn load_ram(&mut self, data: &[u8]) -> Result<(), Error> {
        if data.len() != self.ram.len() {
            return Err(Error::CartRamSize {
                expected: self.ram.len(),
                actual: data.len(),
            });
        }
        self.ram.copy_from_slice(data);
        Ok(())
    }

    pub(crate) fn marshal_mbc(&self) -> Result<Vec<u8>, serde_json::Error> {
        self.mbc.marshal()
    }

    /// Re-attach controller state from a snapshot. The snapshot must have
    /// been taken with the same kind of chip this ROM declares.
    pub(crate) fn restore_mbc(&mut self, bytes: &[u8]) -> Result<(), SnapshotError> {
        let mbc = Mbc::unmarshal(bytes)?;
        if mbc.kind() != self.header.mbc {
            return Err(SnapshotError::MbcMismatch {
                snapshot: mbc.kind().to_string(),
                rom: self.header.mbc.to_string(),
            });
        }
        self.mbc = mbc;
        Ok(())
    }

    pub(crate) fn restore_ram(&mut self, ram: Vec<u8>) -> Result<(), Error> {
        self.load_ram(&ram)
    }
}
