//! Save states.
//!
//! A snapshot is a JSON envelope holding the session record plus the
//! cartridge controller's own marshalled state. ROM bytes are never
//! included; the host supplies the same image again on load.

use serde::{Deserialize, Serialize};

use super::bus::Hardware;
use super::cartridge::Cartridge;
use super::gameboy::GameBoy;
use crate::config::GameBoyConfig;
use crate::cpu::Cpu;
use crate::error::{Error, SnapshotError};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SessionState {
    cpu: Cpu,
    hw: Hardware,
    cart_ram: Vec<u8>,
    steps: u64,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    info: String,
    state: SessionState,
    mbc: Vec<u8>,
}

/// Read the version alone so a newer layout is reported as a version
/// mismatch rather than a parse error.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl GameBoy {
    pub fn make_snapshot(&self) -> Result<Vec<u8>, Error> {
        let envelope = Envelope {
            version: SNAPSHOT_VERSION,
            info: self.config.snapshot_info.clone(),
            state: SessionState {
                cpu: self.cpu.clone(),
                hw: self.hw.clone(),
                cart_ram: self.cart.ram().to_vec(),
                steps: self.steps,
            },
            mbc: self.cart.marshal_mbc().map_err(SnapshotError::from)?,
        };
        let bytes = serde_json::to_vec(&envelope).map_err(SnapshotError::from)?;
        log::debug!(
            "GB snapshot: {} bytes at {} cycles",
            bytes.len(),
            self.hw.interrupts.cycles
        );
        Ok(bytes)
    }

    /// Rebuild a session from `snapshot`, re-attaching `rom`.
    pub fn load_snapshot(rom: Vec<u8>, snapshot: &[u8]) -> Result<Self, Error> {
        let probe: VersionProbe = serde_json::from_slice(snapshot).map_err(SnapshotError::from)?;
        if probe.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: probe.version,
                expected: SNAPSHOT_VERSION,
            }
            .into());
        }

        let envelope: Envelope = serde_json::from_slice(snapshot).map_err(SnapshotError::from)?;
        let mut cart = Cartridge::new(rom)?;
        cart.restore_mbc(&envelope.mbc)?;
        cart.restore_ram(envelope.state.cart_ram)?;

        let config = GameBoyConfig::builder()
            .sample_rate(envelope.state.hw.apu.sample_rate())
            .audio_capacity(envelope.state.hw.apu.capacity())
            .snapshot_info(envelope.info)
            .build();
        log::info!("GB snapshot: restored \"{}\"", config.snapshot_info);
        Ok(GameBoy::from_parts(
            envelope.state.cpu,
            envelope.state.hw,
            cart,
            config,
            envelope.state.steps,
        ))
    }
}
