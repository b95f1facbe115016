use super::*;
use crate::config::GameBoyConfig;
use crate::error::{Error, Fault, SnapshotError};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Synthetic ROM image: header fields plus `program` at the entry point.
fn rom_with_program(cart_type: u8, rom_code: u8, ram_code: u8, program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000 << rom_code];
    rom[0x134..0x138].copy_from_slice(b"TEST");
    rom[0x147] = cart_type;
    rom[0x148] = rom_code;
    rom[0x149] = ram_code;
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom
}

fn session(rom: Vec<u8>) -> GameBoy {
    let config = GameBoyConfig::builder().randomize_ram(false).build();
    GameBoy::with_config(rom, config).expect("synthetic ROM should load")
}

fn step(gb: &mut GameBoy) -> u32 {
    gb.step().expect("step should not abort")
}

#[test]
fn store_then_halt_scenario() {
    // LD A,0x42; LD (0xC000),A; HALT
    let program = [0x3E, 0x42, 0xEA, 0x00, 0xC0, 0x76];
    let mut gb = session(rom_with_program(0x00, 0, 0, &program));

    let costs: Vec<u32> = (0..3).map(|_| step(&mut gb)).collect();
    assert_eq!(costs, [8, 16, 4]);
    assert_eq!(gb.cycles(), 28);
    assert_eq!(gb.cpu.regs.a, 0x42);
    assert_eq!(gb.peek(0xC000), 0x42);
    assert!(gb.cpu.halted);
    assert_eq!(gb.steps(), 3);
}

#[test]
fn boot_io_state() {
    let mut gb = session(rom_with_program(0x00, 0, 0, &[]));
    assert_eq!(gb.peek(0xFF00), 0xCF);
    assert_eq!(gb.peek(0xFF04), 0xAB);
    assert_eq!(gb.peek(0xFF0F), 0xE1);
    assert_eq!(gb.peek(0xFF40), 0x91);
    assert_eq!(gb.peek(0xFF41), 0x85);
    assert_eq!(gb.peek(0xFF47), 0xFC);
    assert_eq!(gb.peek(0xFF26), 0xF1);
    assert_eq!(gb.peek(0xFFFF), 0xE0);
}

#[test]
fn unused_bits_read_as_ones() {
    let mut gb = session(rom_with_program(0x00, 0, 0, &[]));
    gb.poke(0xFF0F, 0x00);
    assert_eq!(gb.peek(0xFF0F), 0xE0);
    gb.poke(0xFF07, 0x00);
    assert_eq!(gb.peek(0xFF07), 0xF8);
    gb.poke(0xFF02, 0x00);
    assert_eq!(gb.peek(0xFF02), 0x7E);
    gb.poke(0xFF00, 0x30);
    assert_eq!(gb.peek(0xFF00), 0xFF);
    gb.poke(0xFF41, 0x00);
    assert_eq!(gb.peek(0xFF41) & 0x80, 0x80);

    // Unmapped and CGB-only registers.
    for addr in [0xFF03, 0xFF08, 0xFF27, 0xFF4C, 0xFF4D, 0xFF4F, 0xFF70, 0xFF7F] {
        assert_eq!(gb.peek(addr), 0xFF, "0x{addr:04X}");
    }
    gb.poke(0xFEA0, 0x12);
    assert_eq!(gb.peek(0xFEA0), 0xFF);
}

#[test]
fn echo_ram_mirrors_work_ram() {
    let mut gb = session(rom_with_program(0x00, 0, 0, &[]));
    gb.poke(0xC123, 0x05);
    assert_eq!(gb.peek(0xE123), 0x05);
    gb.poke(0xFDFF, 0x07);
    assert_eq!(gb.peek(0xDDFF), 0x07);
}

#[test]
fn joypad_press_raises_interrupt_once() {
    let mut gb = session(rom_with_program(0x00, 0, 0, &[]));
    // Select the button half only.
    gb.poke(0xFF00, 0x10);
    gb.poke(0xFF0F, 0x00);

    gb.update_input(JoypadState::A);
    assert!(gb.interrupts().request.joypad);
    assert_eq!(gb.peek(0xFF00) & 0x0F, 0x0E);

    gb.poke(0xFF0F, 0x00);
    gb.update_input(JoypadState::A);
    assert!(!gb.interrupts().request.joypad);

    // D-pad lines are not selected.
    gb.update_input(JoypadState::A | JoypadState::RIGHT);
    assert!(!gb.interrupts().request.joypad);
}

#[test]
fn timer_overflows_after_two_periods() {
    let mut gb = session(rom_with_program(0x00, 0, 0, &[]));
    gb.poke(0xFF05, 0xFE);
    gb.poke(0xFF06, 0xFE);
    gb.poke(0xFF04, 0x00);
    gb.poke(0xFF07, 0x07);
    gb.poke(0xFF0F, 0x00);

    gb.hw.tick(256 * 2 - 1);
    assert!(!gb.interrupts().request.timer);
    gb.hw.tick(1);
    assert!(gb.interrupts().request.timer);
    assert_eq!(gb.peek(0xFF05), 0xFE);
}

#[test]
fn bank_zero_write_selects_bank_one() {
    let mut mbc1 = session(rom_with_program(0x01, 2, 0, &[]));
    mbc1.poke(0x2000, 0x00);
    assert_eq!(mbc1.current_rom_bank(), 1);

    let mut mbc2 = session(rom_with_program(0x05, 2, 0, &[]));
    mbc2.poke(0x2100, 0x00);
    assert_eq!(mbc2.current_rom_bank(), 1);
}

#[test]
fn illegal_opcode_aborts_permanently() {
    let mut gb = session(rom_with_program(0x00, 0, 0, &[0xD3]));
    let abort = gb.step().unwrap_err();
    assert_eq!(
        abort.fault,
        Fault::IllegalOpcode {
            opcode: 0xD3,
            pc: 0x0100
        }
    );
    assert!(abort.diagnostic.contains("PC=0x0101"));
    assert!(abort.diagnostic.contains("bank=1"));
    assert_eq!(gb.step().unwrap_err(), abort);
    assert_eq!(gb.abort(), Some(&abort));
}

#[test]
fn reading_a_bank_past_the_image_aborts() {
    // LD A,8; LD (0x2000),A; LD A,(0x4000)
    let program = [0x3E, 0x08, 0xEA, 0x00, 0x20, 0xFA, 0x00, 0x40];
    let mut gb = session(rom_with_program(0x19, 1, 0, &program));
    step(&mut gb);
    step(&mut gb);
    let abort = gb.step().unwrap_err();
    assert_eq!(
        abort.fault,
        Fault::RomOutOfBounds {
            address: 0x4000,
            bank: 8,
            rom_len: 0x1_0000,
        }
    );
}

#[test]
fn oam_dma_copies_and_stalls() {
    // LD A,0xC0; LDH (0x46),A
    let program = [0x3E, 0xC0, 0xE0, 0x46];
    let mut gb = session(rom_with_program(0x00, 0, 0, &program));
    for i in 0..0xA0u16 {
        gb.poke(0xC000 + i, i as u8 ^ 0x5A);
    }

    step(&mut gb);
    assert_eq!(step(&mut gb), 12 + 640);
    for i in 0..0xA0u16 {
        assert_eq!(gb.peek(0xFE00 + i), i as u8 ^ 0x5A);
    }
    assert_eq!(gb.peek(0xFF46), 0xC0);
}

#[test]
fn serial_bytes_are_captured() {
    // LD A,'H'; LDH (0x01),A; LD A,0x81; LDH (0x02),A
    let program = [0x3E, b'H', 0xE0, 0x01, 0x3E, 0x81, 0xE0, 0x02];
    let mut gb = session(rom_with_program(0x00, 0, 0, &program));
    gb.poke(0xFF0F, 0x00);
    for _ in 0..4 {
        step(&mut gb);
    }
    assert_eq!(gb.serial_output(), b"H");

    gb.hw.tick(8 * 512);
    assert!(gb.interrupts().request.serial);
    assert_eq!(gb.peek(0xFF01), 0xFF);
    assert_eq!(gb.peek(0xFF02) & 0x80, 0);
}

#[test]
fn stop_freezes_clock_until_button_press() {
    let mut gb = session(rom_with_program(0x00, 0, 0, &[0x10, 0x00, 0x00]));
    assert_eq!(step(&mut gb), 4);
    assert!(gb.cpu.stopped);
    assert_eq!(gb.peek(0xFF04), 0);

    let cycles = gb.cycles();
    for _ in 0..10 {
        assert_eq!(step(&mut gb), 4);
    }
    assert_eq!(gb.cycles(), cycles);

    gb.update_input(JoypadState::START);
    assert!(!gb.cpu.stopped);
    step(&mut gb);
    assert_eq!(gb.cpu.regs.pc, 0x0103);
}

#[test]
fn halt_wakes_into_vblank_handler() {
    // LD A,1; LDH (0xFF),A; XOR A; LDH (0x0F),A; EI; HALT
    let program = [0x3E, 0x01, 0xE0, 0xFF, 0xAF, 0xE0, 0x0F, 0xFB, 0x76];
    let mut rom = rom_with_program(0x00, 0, 0, &program);
    rom[0x40] = 0xD9;
    let mut gb = session(rom);

    let reached = (0..20_000).any(|_| {
        step(&mut gb);
        gb.cpu.regs.pc == 0x0040
    });
    assert!(reached);
    assert!(!gb.cpu.halted);
    assert!(!gb.cpu.ime);
    assert!(!gb.interrupts().request.vblank);
    assert!(gb.cycles() >= 144 * 456);

    assert!(gb.flip_requested());
    assert!(!gb.flip_requested());
    assert_eq!(gb.read_framebuffer().len(), SCREEN_WIDTH * SCREEN_HEIGHT * 4);
}

#[test]
fn frame_stepping_produces_audio() {
    // JR -2
    let mut gb = session(rom_with_program(0x00, 0, 0, &[0x18, 0xFE]));
    let cycles = gb.step_frame().unwrap();
    assert!(cycles <= CYCLES_PER_FRAME + 24);
    assert!(gb.flip_requested());

    let mut out = vec![0u8; 4 * 100];
    assert_eq!(gb.read_audio(&mut out).len(), 400);
    assert!(gb.apu().buffered_frames() > 0);
}

#[test]
fn cart_ram_round_trip_and_size_check() {
    let mut gb = session(rom_with_program(0x03, 1, 2, &[]));
    assert_eq!(gb.cart_ram().len(), 0x2000);
    assert!(matches!(
        gb.set_cart_ram(&[0; 100]),
        Err(Error::CartRamSize {
            expected: 0x2000,
            actual: 100
        })
    ));

    let mut save = vec![0u8; 0x2000];
    save[0x10] = 0x99;
    gb.set_cart_ram(&save).unwrap();
    gb.poke(0x0000, 0x0A);
    assert_eq!(gb.peek(0xA010), 0x99);
}

fn latched_rtc(gb: &GameBoy) -> RtcRegisters {
    match gb.cartridge().mbc() {
        Mbc::Mbc3(mbc3) => *mbc3.rtc().expect("cartridge has an RTC").latched(),
        other => panic!("expected MBC3, got {:?}", other.kind()),
    }
}

#[test]
fn mbc3_snapshot_round_trip_keeps_latched_clock() {
    let rom = rom_with_program(0x10, 2, 3, &[0x00, 0x00, 0x00]);
    let mut gb = session(rom.clone());

    gb.poke(0x0000, 0x0A);
    gb.poke(0x4000, 0x01);
    gb.poke(0xA007, 0x3C);
    gb.poke(0x4000, 0x09);
    gb.poke(0xA000, 17);
    gb.poke(0x4000, 0x0A);
    gb.poke(0xA000, 5);
    gb.poke(0x6000, 0x00);
    gb.poke(0x6000, 0x01);
    gb.poke(0x2000, 0x03);
    gb.poke(0xFF0F, 0x05);
    step(&mut gb);
    gb.cpu.regs.b = 0x77;

    let before = latched_rtc(&gb);
    assert_eq!(before.minutes, 17);
    assert_eq!(before.hours, 5);

    let bytes = gb.make_snapshot().unwrap();
    let restored = GameBoy::load_snapshot(rom, &bytes).unwrap();

    assert_eq!(restored.cpu.regs, gb.cpu.regs);
    assert_eq!(restored.cpu.ime, gb.cpu.ime);
    assert_eq!(restored.interrupts().read_if(), gb.interrupts().read_if());
    assert_eq!(restored.interrupts().read_ie(), gb.interrupts().read_ie());
    assert_eq!(latched_rtc(&restored), before);
    assert_eq!(restored.current_rom_bank(), 3);
    assert_eq!(restored.cart_ram(), gb.cart_ram());
    assert_eq!(restored.cart_ram()[0x2007], 0x3C);
    assert_eq!(restored.cycles(), gb.cycles());
    assert_eq!(restored.steps(), gb.steps());
}

#[test]
fn snapshot_rejects_other_versions_and_garbage() {
    let rom = rom_with_program(0x00, 0, 0, &[]);
    let gb = session(rom.clone());
    let bytes = gb.make_snapshot().unwrap();

    let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    value["version"] = serde_json::json!(SNAPSHOT_VERSION + 1);
    let bumped = serde_json::to_vec(&value).unwrap();
    assert!(matches!(
        GameBoy::load_snapshot(rom.clone(), &bumped),
        Err(Error::Snapshot(SnapshotError::Version { found, expected }))
            if found == SNAPSHOT_VERSION + 1 && expected == SNAPSHOT_VERSION
    ));

    assert!(matches!(
        GameBoy::load_snapshot(rom, b"not a snapshot"),
        Err(Error::Snapshot(SnapshotError::Envelope(_)))
    ));
}

#[test]
fn snapshot_needs_matching_cartridge_kind() {
    let mbc3_rom = rom_with_program(0x13, 1, 2, &[]);
    let bytes = session(mbc3_rom).make_snapshot().unwrap();

    let mbc1_rom = rom_with_program(0x03, 1, 2, &[]);
    assert!(matches!(
        GameBoy::load_snapshot(mbc1_rom, &bytes),
        Err(Error::Snapshot(SnapshotError::MbcMismatch { .. }))
    ));
}

#[test]
fn unknown_header_codes_fail_session_creation() {
    let mut rom = rom_with_program(0x00, 0, 0, &[]);
    rom[0x149] = 0x07;
    assert!(matches!(
        GameBoy::new(rom),
        Err(Error::Header(crate::error::HeaderError::UnknownRamSize(0x07)))
    ));

    let rom = rom_with_program(0xFC, 0, 0, &[]);
    assert!(matches!(
        GameBoy::new(rom),
        Err(Error::Header(crate::error::HeaderError::UnknownCartridgeType(0xFC)))
    ));
}
