use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dmgboy_core::debugger::Debugger;
use dmgboy_core::gbs::GbsPlayer;
use dmgboy_core::machine::CYCLES_PER_FRAME;
use dmgboy_core::{GameBoy, GameBoyConfig};

/// Frames between progress lines in the log.
const STATS_INTERVAL: u64 = 600;

#[derive(Debug, typed_builder::TypedBuilder)]
pub struct RunOptions {
    pub rom: PathBuf,
    #[builder(default = 600)]
    pub frames: u64,
    /// Battery save file; loaded before the run and written after it.
    #[builder(default, setter(strip_option))]
    pub save: Option<PathBuf>,
    #[builder(default, setter(strip_option))]
    pub snapshot_in: Option<PathBuf>,
    #[builder(default, setter(strip_option))]
    pub snapshot_out: Option<PathBuf>,
}

#[derive(Debug, typed_builder::TypedBuilder)]
pub struct GbsOptions {
    pub file: PathBuf,
    /// 1-based; the file's default song when absent.
    #[builder(default, setter(strip_option))]
    pub song: Option<u8>,
    #[builder(default = 30)]
    pub seconds: u64,
}

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {what} '{}'", path.display()))
}

fn write_file(path: &Path, what: &str, data: &[u8]) -> Result<()> {
    std::fs::write(path, data)
        .with_context(|| format!("failed to write {what} '{}'", path.display()))
}

/// Run a cartridge headless for a fixed number of frames.
pub fn run(options: &RunOptions) -> Result<()> {
    let rom = read_file(&options.rom, "ROM")?;

    let mut gb = match &options.snapshot_in {
        Some(path) => {
            let snapshot = read_file(path, "snapshot")?;
            log::info!("Restoring snapshot '{}'", path.display());
            GameBoy::load_snapshot(rom, &snapshot)?
        }
        None => GameBoy::with_config(rom, GameBoyConfig::default())?,
    };

    if let Some(path) = &options.save {
        if path.exists() && gb.header().battery {
            let data = read_file(path, "save file")?;
            gb.set_cart_ram(&data)
                .with_context(|| format!("save file '{}' does not fit", path.display()))?;
            log::info!("Loaded {} bytes of cartridge RAM", data.len());
        }
    }

    let mut audio = vec![0u8; 4 * 2048];
    for frame in 1..=options.frames {
        if let Err(abort) = gb.step_frame() {
            bail!(abort);
        }
        gb.read_audio(&mut audio);
        if frame % STATS_INTERVAL == 0 {
            log::info!(
                "frame {frame}: {} steps, {} cycles, bank {}",
                gb.steps(),
                gb.cycles(),
                gb.current_rom_bank()
            );
        }
    }

    let serial = gb.serial_output();
    if !serial.is_empty() {
        log::info!("Serial output: {}", String::from_utf8_lossy(serial));
    }

    if let Some(path) = &options.save {
        if gb.header().battery && !gb.cart_ram().is_empty() {
            write_file(path, "save file", gb.cart_ram())?;
        }
    }
    if let Some(path) = &options.snapshot_out {
        write_file(path, "snapshot", &gb.make_snapshot()?)?;
        log::info!("Snapshot written to '{}'", path.display());
    }
    Ok(())
}

/// Play one song of a GBS file for a fixed time, discarding the audio.
pub fn run_gbs(options: &GbsOptions) -> Result<()> {
    let data = read_file(&options.file, "GBS file")?;
    let mut player = GbsPlayer::new(&data, GameBoyConfig::default())?;
    if let Some(song) = options.song {
        player.start_song(song.saturating_sub(1))?;
    }

    let mut audio = vec![0u8; 4 * 2048];
    let mut bytes = 0usize;
    let frames = options.seconds * 4_194_304 / CYCLES_PER_FRAME as u64;
    for _ in 0..frames {
        if let Err(abort) = player.step_frame() {
            bail!(abort);
        }
        bytes += player.read_audio(&mut audio).len();
    }
    log::info!(
        "Played song {}/{} of \"{}\": {} audio bytes",
        player.song() + 1,
        player.header().song_count,
        player.header().title,
        bytes
    );
    Ok(())
}

/// Interactive debugger on stdin/stdout.
pub fn run_debugger(rom_path: &Path) -> Result<()> {
    let rom = read_file(rom_path, "ROM")?;
    let mut gb = GameBoy::new(rom)?;
    let mut debugger = Debugger::new();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if matches!(line, "quit" | "exit") {
            break;
        }
        match debugger.execute(&mut gb, line) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => writeln!(stdout, "{output}")?,
            Err(err) => writeln!(stdout, "error: {err}")?,
        }
    }
    Ok(())
}
