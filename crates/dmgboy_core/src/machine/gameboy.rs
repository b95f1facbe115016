use crate::config::GameBoyConfig;
use crate::cpu::{Bus, Cpu, Flag};
use crate::error::{Abort, Error};

use super::bus::{Apu, GameBoyBus, Hardware, JoypadState, Ppu};
use super::cartridge::{Cartridge, CartridgeHeader};
use super::interrupts::InterruptController;

/// T-cycles in one full LCD frame.
pub const CYCLES_PER_FRAME: u32 = 70_224;

/// One emulated DMG session: CPU, console hardware and the inserted
/// cartridge.
///
/// A session is driven by a single host loop calling [`GameBoy::step`];
/// video, audio and save data are read back between steps.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) hw: Hardware,
    pub(crate) cart: Cartridge,
    pub(crate) config: GameBoyConfig,
    pub(crate) steps: u64,
    aborted: Option<Abort>,
}

impl GameBoy {
    pub fn new(rom: Vec<u8>) -> Result<Self, Error> {
        Self::with_config(rom, GameBoyConfig::default())
    }

    pub fn with_config(rom: Vec<u8>, config: GameBoyConfig) -> Result<Self, Error> {
        let cart = Cartridge::new(rom)?;
        let hw = Hardware::new(&config);
        Ok(Self::from_parts(Cpu::new(), hw, cart, config, 0))
    }

    pub(crate) fn from_parts(
        cpu: Cpu,
        hw: Hardware,
        cart: Cartridge,
        config: GameBoyConfig,
        steps: u64,
    ) -> Self {
        Self {
            cpu,
            hw,
            cart,
            config,
            steps,
            aborted: None,
        }
    }

    /// Execute one instruction (or interrupt dispatch, or idle halted /
    /// stopped cycle group) and return the T-cycles it consumed.
    ///
    /// A fault aborts the session permanently: this and every later call
    /// return the same [`Abort`].
    pub fn step(&mut self) -> Result<u32, Abort> {
        if let Some(abort) = &self.aborted {
            return Err(abort.clone());
        }

        let mut bus = GameBoyBus::new(&mut self.hw, &mut self.cart);
        match self.cpu.step(&mut bus) {
            Ok(cycles) => {
                self.steps += 1;
                Ok(cycles)
            }
            Err(fault) => {
                let diagnostic = self.diagnostic_line();
                log::error!("GB CPU: {fault}: {diagnostic}");
                let abort = Abort { fault, diagnostic };
                self.aborted = Some(abort.clone());
                Err(abort)
            }
        }
    }

    /// Step until the PPU completes a frame, or one frame's worth of
    /// cycles passes with the LCD off.
    pub fn step_frame(&mut self) -> Result<u32, Abort> {
        let start = self.hw.ppu.frames();
        let mut cycles = 0;
        while cycles < CYCLES_PER_FRAME {
            cycles += self.step()?;
            if self.hw.ppu.frames() != start {
                break;
            }
        }
        Ok(cycles)
    }

    pub fn abort(&self) -> Option<&Abort> {
        self.aborted.as_ref()
    }

    /// 160x144 RGBA pixels, refreshed at every VBlank.
    pub fn read_framebuffer(&self) -> &[u8] {
        self.hw.ppu.framebuffer()
    }

    /// True if a new frame was composed since the last call.
    pub fn flip_requested(&mut self) -> bool {
        self.hw.ppu.take_flip()
    }

    pub fn update_input(&mut self, state: JoypadState) {
        let pressed = self.hw.update_input(state);
        if pressed && self.cpu.stopped {
            self.cpu.stopped = false;
            log::debug!("GB CPU: joypad press leaves STOP");
        }
    }

    /// Fill `out` with buffered 16-bit stereo frames; returns the filled part.
    pub fn read_audio<'b>(&mut self, out: &'b mut [u8]) -> &'b [u8] {
        self.hw.apu.read_audio(out)
    }

    pub fn cart_ram(&self) -> &[u8] {
        self.cart.ram()
    }

    pub fn set_cart_ram(&mut self, data: &[u8]) -> Result<(), Error> {
        self.cart.load_ram(data)
    }

    pub fn header(&self) -> &CartridgeHeader {
        self.cart.header()
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cart
    }

    pub fn current_rom_bank(&self) -> u16 {
        self.cart.current_rom_bank()
    }

    /// Bytes the game has clocked out of the serial port.
    pub fn serial_output(&self) -> &[u8] {
        &self.hw.interrupts.serial.output
    }

    pub fn interrupts(&self) -> &InterruptController {
        &self.hw.interrupts
    }

    pub fn ppu(&self) -> &Ppu {
        &self.hw.ppu
    }

    pub fn apu(&self) -> &Apu {
        &self.hw.apu
    }

    /// T-cycles since power-on.
    pub fn cycles(&self) -> u64 {
        self.hw.interrupts.cycles
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Read through the memory map without advancing time.
    pub fn peek(&mut self, addr: u16) -> u8 {
        GameBoyBus::new(&mut self.hw, &mut self.cart).read8(addr)
    }

    /// Write through the memory map without advancing time.
    pub fn poke(&mut self, addr: u16, value: u8) {
        GameBoyBus::new(&mut self.hw, &mut self.cart).write8(addr, value);
    }

    /// The line logged when a session aborts.
    pub fn diagnostic_line(&self) -> String {
        let regs = &self.cpu.regs;
        let flag = |f: Flag| u8::from(self.cpu.get_flag(f));
        format!(
            "PC=0x{:04X} SP=0x{:04X} AF=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X} \
             Z={} N={} H={} C={} IME={} IE=0x{:02X} IF=0x{:02X} bank={} halted={} stopped={} cycles={}",
            regs.pc,
            regs.sp,
            regs.af(),
            regs.bc(),
            regs.de(),
            regs.hl(),
            flag(Flag::Z),
            flag(Flag::N),
            flag(Flag::H),
            flag(Flag::C),
            u8::from(self.cpu.ime),
            self.hw.interrupts.read_ie(),
            self.hw.interrupts.read_if(),
            self.cart.current_rom_bank(),
            self.cpu.halted,
            self.cpu.stopped,
            self.hw.interrupts.cycles,
        )
    }
}
