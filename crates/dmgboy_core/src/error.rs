use thiserror::Error;

/// Host-facing, recoverable errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid cartridge header: {0}")]
    Header(#[from] HeaderError),

    #[error("cartridge RAM size mismatch: cartridge has {expected} bytes, got {actual}")]
    CartRamSize { expected: usize, actual: usize },

    #[error("snapshot rejected: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("GBS file rejected: {0}")]
    Gbs(#[from] GbsError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("ROM image is {0} bytes, too small to contain a header")]
    TooSmall(usize),

    #[error("unsupported cartridge type 0x{0:02X}")]
    UnknownCartridgeType(u8),

    #[error("unknown RAM size code 0x{0:02X}")]
    UnknownRamSize(u8),

    #[error("unknown ROM size code 0x{0:02X}")]
    UnknownRomSize(u8),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("corrupt snapshot envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("snapshot was taken with a {snapshot} cartridge but the ROM is {rom}")]
    MbcMismatch { snapshot: String, rom: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GbsError {
    #[error("missing \"GBS\" magic")]
    BadMagic,

    #[error("unsupported GBS version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid GBS header: {0}")]
    InvalidHeader(&'static str),

    #[error("song {song} out of range (file has {count} songs)")]
    SongOutOfRange { song: u8, count: u8 },
}

/// Emulation-fatal condition raised while stepping.
///
/// These are not meant to be recovered from: the session stops and reports
/// an [`Abort`] carrying the machine state at the point of failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("illegal opcode 0x{opcode:02X} at 0x{pc:04X}")]
    IllegalOpcode { opcode: u8, pc: u16 },

    #[error("ROM read at 0x{address:04X} (bank {bank}) past end of {rom_len}-byte image")]
    RomOutOfBounds { address: u16, bank: u16, rom_len: usize },
}

/// A fault plus the diagnostic line captured when it happened.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("emulation aborted: {fault} [{diagnostic}]")]
pub struct Abort {
    pub fault: Fault,
    pub diagnostic: String,
}
