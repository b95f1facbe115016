//! Line-oriented debugger over a [`GameBoy`] session.
//!
//! The [`Debugger`] value holds only breakpoints; the session it inspects is
//! passed to every [`Debugger::execute`] call, so any number of sessions and
//! debuggers can coexist.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use thiserror::Error;

use crate::cpu::Flag;
use crate::machine::{GameBoy, Interrupt};

/// Step limit for `continue` without an explicit count.
const DEFAULT_CONTINUE_STEPS: u64 = 10_000_000;
const DEFAULT_MEM_LEN: usize = 16;
/// One pass over the address space.
const MAX_MEM_LEN: usize = 0x1_0000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("bad number `{0}`")]
    BadNumber(String),
}

type Handler = fn(&mut Debugger, &mut GameBoy, &[&str]) -> Result<String, CommandError>;

struct Command {
    name: &'static str,
    usage: &'static str,
    help: &'static str,
    run: Handler,
}

const COMMANDS: &[Command] = &[
    Command {
        name: "regs",
        usage: "regs",
        help: "CPU registers",
        run: Debugger::regs,
    },
    Command {
        name: "flags",
        usage: "flags",
        help: "Z/N/H/C flags",
        run: Debugger::flags,
    },
    Command {
        name: "ints",
        usage: "ints",
        help: "IME, IE and IF by source",
        run: Debugger::ints,
    },
    Command {
        name: "timer",
        usage: "timer",
        help: "DIV/TIMA/TMA/TAC",
        run: Debugger::timer,
    },
    Command {
        name: "bank",
        usage: "bank",
        help: "mapped ROM bank",
        run: Debugger::bank,
    },
    Command {
        name: "header",
        usage: "header",
        help: "cartridge header",
        run: Debugger::header,
    },
    Command {
        name: "mem",
        usage: "mem ADDR [LEN]",
        help: "hex dump without side effects on time",
        run: Debugger::mem,
    },
    Command {
        name: "break",
        usage: "break ADDR",
        help: "add a PC breakpoint",
        run: Debugger::add_break,
    },
    Command {
        name: "delete",
        usage: "delete ADDR",
        help: "remove a breakpoint",
        run: Debugger::delete_break,
    },
    Command {
        name: "step",
        usage: "step [N]",
        help: "execute N instructions",
        run: Debugger::step,
    },
    Command {
        name: "continue",
        usage: "continue [N]",
        help: "run until a breakpoint, an abort or N steps",
        run: Debugger::resume,
    },
    Command {
        name: "help",
        usage: "help",
        help: "this list",
        run: Debugger::help,
    },
];

/// Accepts `0x1F`, `$1F` or `1F` as hex; `#31` as decimal.
fn parse_number(text: &str) -> Result<u32, CommandError> {
    let bad = || CommandError::BadNumber(text.to_string());
    if let Some(decimal) = text.strip_prefix('#') {
        return decimal.parse().map_err(|_| bad());
    }
    let hex = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'))
        .unwrap_or(text);
    u32::from_str_radix(hex, 16).map_err(|_| bad())
}

fn parse_addr(text: &str) -> Result<u16, CommandError> {
    let value = parse_number(text)?;
    u16::try_from(value).map_err(|_| CommandError::BadNumber(text.to_string()))
}

fn optional_count(args: &[&str], default: u64) -> Result<u64, CommandError> {
    args.first()
        .map(|arg| parse_number(arg).map(u64::from))
        .transpose()
        .map(|count| count.unwrap_or(default))
}

#[derive(Debug, Default)]
pub struct Debugger {
    breakpoints: BTreeSet<u16>,
}

impl Debugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = u16> + '_ {
        self.breakpoints.iter().copied()
    }

    /// Run one command line against `gb` and return its output.
    pub fn execute(&mut self, gb: &mut GameBoy, line: &str) -> Result<String, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(String::new());
        };
        let args: Vec<&str> = words.collect();
        let command = COMMANDS
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CommandError::Unknown(name.to_string()))?;
        (command.run)(self, gb, &args)
    }

    fn regs(&mut self, gb: &mut GameBoy, _: &[&str]) -> Result<String, CommandError> {
        let cpu = &gb.cpu;
        let r = &cpu.regs;
        Ok(format!(
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X} {} halted={} stopped={}",
            r.af(),
            r.bc(),
            r.de(),
            r.hl(),
            r.sp,
            r.pc,
            cpu.flag_string(),
            cpu.halted,
            cpu.stopped,
        ))
    }

    fn flags(&mut self, gb: &mut GameBoy, _: &[&str]) -> Result<String, CommandError> {
        let bit = |flag| u8::from(gb.cpu.get_flag(flag));
        Ok(format!(
            "Z={} N={} H={} C={}",
            bit(Flag::Z),
            bit(Flag::N),
            bit(Flag::H),
            bit(Flag::C)
        ))
    }

    fn ints(&mut self, gb: &mut GameBoy, _: &[&str]) -> Result<String, CommandError> {
        let ic = gb.interrupts();
        let mut out = format!(
            "IME={} IE=0x{:02X} IF=0x{:02X} next={}",
            u8::from(gb.cpu.ime),
            ic.read_ie(),
            ic.read_if(),
            ic.candidate().map_or("none", Interrupt::name),
        );
        for source in Interrupt::ALL {
            let _ = write!(
                out,
                "\n  {:<7} enabled={} requested={}",
                source.name(),
                u8::from(ic.enable.get(source)),
                u8::from(ic.request.get(source)),
            );
        }
        Ok(out)
    }

    fn timer(&mut self, gb: &mut GameBoy, _: &[&str]) -> Result<String, CommandError> {
        let timer = &gb.interrupts().timer;
        Ok(format!(
            "DIV=0x{:02X} TIMA=0x{:02X} TMA=0x{:02X} TAC=0x{:02X} period={}",
            timer.read_div(),
            timer.read_tima(),
            timer.read_tma(),
            timer.read_tac(),
            timer.period(),
        ))
    }

    fn bank(&mut self, gb: &mut GameBoy, _: &[&str]) -> Result<String, CommandError> {
        Ok(format!(
            "ROM bank {} ({})",
            gb.current_rom_bank(),
            gb.header().mbc
        ))
    }

    fn header(&mut self, gb: &mut GameBoy, _: &[&str]) -> Result<String, CommandError> {
        let h = gb.header();
        Ok(format!(
            "title={:?} type=0x{:02X} ({}) rom={} bytes ram={} bytes battery={} rtc={}",
            h.title, h.cartridge_type, h.mbc, h.rom_size, h.ram_size, h.battery, h.rtc
        ))
    }

    fn mem(&mut self, gb: &mut GameBoy, args: &[&str]) -> Result<String, CommandError> {
        const USAGE: &str = "mem ADDR [LEN]";
        let start = parse_addr(args.first().ok_or(CommandError::Usage(USAGE))?)?;
        let len = match args.get(1) {
            Some(arg) => (parse_number(arg)? as usize).min(MAX_MEM_LEN),
            None => DEFAULT_MEM_LEN,
        };

        let mut out = String::new();
        for row in 0..len.div_ceil(16) {
            let row_addr = start.wrapping_add((row * 16) as u16);
            if row > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{row_addr:04X}:");
            for col in 0..(len - row * 16).min(16) {
                let _ = write!(out, " {:02X}", gb.peek(row_addr.wrapping_add(col as u16)));
            }
        }
        Ok(out)
    }

    fn add_break(&mut self, _: &mut GameBoy, args: &[&str]) -> Result<String, CommandError> {
        let addr = parse_addr(args.first().ok_or(CommandError::Usage("break ADDR"))?)?;
        self.breakpoints.insert(addr);
        Ok(format!("breakpoint at 0x{addr:04X}"))
    }

    fn delete_break(&mut self, _: &mut GameBoy, args: &[&str]) -> Result<String, CommandError> {
        let addr = parse_addr(args.first().ok_or(CommandError::Usage("delete ADDR"))?)?;
        if self.breakpoints.remove(&addr) {
            Ok(format!("deleted breakpoint at 0x{addr:04X}"))
        } else {
            Ok(format!("no breakpoint at 0x{addr:04X}"))
        }
    }

    fn step(&mut self, gb: &mut GameBoy, args: &[&str]) -> Result<String, CommandError> {
        let count = optional_count(args, 1)?;
        let mut cycles = 0u64;
        for _ in 0..count {
            match gb.step() {
                Ok(spent) => cycles += u64::from(spent),
                Err(abort) => return Ok(abort.to_string()),
            }
        }
        Ok(format!("{cycles} cycles, PC=0x{:04X}", gb.cpu.regs.pc))
    }

    fn resume(&mut self, gb: &mut GameBoy, args: &[&str]) -> Result<String, CommandError> {
        let limit = optional_count(args, DEFAULT_CONTINUE_STEPS)?;
        for done in 1..=limit {
            if let Err(abort) = gb.step() {
                return Ok(abort.to_string());
            }
            let pc = gb.cpu.regs.pc;
            if self.breakpoints.contains(&pc) {
                return Ok(format!("breakpoint 0x{pc:04X} after {done} steps"));
            }
        }
        Ok(format!("stopped after {limit} steps, PC=0x{:04X}", gb.cpu.regs.pc))
    }

    fn help(&mut self, _: &mut GameBoy, _: &[&str]) -> Result<String, CommandError> {
        let mut out = String::new();
        for (i, command) in COMMANDS.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{:<16} {}", command.usage, command.help);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameBoyConfig;

    /// 0x0100: NOP; NOP; JR -2 (spins on 0x0102).
    fn session() -> GameBoy {
        let mut rom = vec![0u8; 0x8000];
        rom[0x100..0x104].copy_from_slice(&[0x00, 0x00, 0x18, 0xFE]);
        rom[0x134..0x138].copy_from_slice(b"DBG!");
        let config = GameBoyConfig::builder().randomize_ram(false).build();
        GameBoy::with_config(rom, config).unwrap()
    }

    #[test]
    fn parses_number_forms() {
        assert_eq!(parse_number("0x1F"), Ok(0x1F));
        assert_eq!(parse_number("$C000"), Ok(0xC000));
        assert_eq!(parse_number("ff"), Ok(0xFF));
        assert_eq!(parse_number("#31"), Ok(31));
        assert_eq!(parse_number("zz"), Err(CommandError::BadNumber("zz".into())));
        assert!(parse_addr("0x10000").is_err());
    }

    #[test]
    fn unknown_and_empty_lines() {
        let mut dbg = Debugger::new();
        let mut gb = session();
        assert_eq!(dbg.execute(&mut gb, "   ").unwrap(), "");
        assert_eq!(
            dbg.execute(&mut gb, "frobnicate"),
            Err(CommandError::Unknown("frobnicate".into()))
        );
        assert_eq!(
            dbg.execute(&mut gb, "mem"),
            Err(CommandError::Usage("mem ADDR [LEN]"))
        );
    }

    #[test]
    fn step_and_inspect() {
        let mut dbg = Debugger::new();
        let mut gb = session();
        assert_eq!(dbg.execute(&mut gb, "step 2").unwrap(), "8 cycles, PC=0x0102");
        let regs = dbg.execute(&mut gb, "regs").unwrap();
        assert!(regs.starts_with("AF=01B0 BC=0013 DE=00D8 HL=014D SP=FFFE PC=0102"), "{regs}");
        assert_eq!(dbg.execute(&mut gb, "flags").unwrap(), "Z=1 N=0 H=1 C=1");
        assert_eq!(dbg.execute(&mut gb, "bank").unwrap(), "ROM bank 1 (ROM-only)");
        assert!(dbg.execute(&mut gb, "header").unwrap().contains("\"DBG!\""));
        assert!(dbg.execute(&mut gb, "timer").unwrap().contains("TAC=0xF8"));
        let ints = dbg.execute(&mut gb, "ints").unwrap();
        assert!(ints.starts_with("IME=0 IE=0xE0 IF=0xE1 next=none"), "{ints}");
        gb.poke(0xFFFF, 0x01);
        let ints = dbg.execute(&mut gb, "ints").unwrap();
        assert!(ints.contains("next=VBlank"), "{ints}");
        assert_eq!(ints.lines().count(), 6);
    }

    #[test]
    fn memory_dump_rows() {
        let mut dbg = Debugger::new();
        let mut gb = session();
        gb.poke(0xC000, 0xAB);
        gb.poke(0xC010, 0xCD);
        let dump = dbg.execute(&mut gb, "mem C000 #17").unwrap();
        let rows: Vec<&str> = dump.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("C000: AB 00"));
        assert_eq!(rows[1], "C010: CD");

        let whole = dbg.execute(&mut gb, "mem 0 FFFFFFFF").unwrap();
        assert_eq!(whole.lines().count(), 0x1000);
        assert!(whole.lines().last().unwrap().starts_with("FFF0:"));
    }

    #[test]
    fn continue_stops_at_breakpoint() {
        let mut dbg = Debugger::new();
        let mut gb = session();
        dbg.execute(&mut gb, "break 0x0102").unwrap();
        assert_eq!(
            dbg.execute(&mut gb, "continue").unwrap(),
            "breakpoint 0x0102 after 2 steps"
        );
        assert_eq!(dbg.breakpoints().collect::<Vec<_>>(), vec![0x0102]);

        dbg.execute(&mut gb, "delete 0x0102").unwrap();
        assert_eq!(
            dbg.execute(&mut gb, "continue 5").unwrap(),
            "stopped after 5 steps, PC=0x0102"
        );
    }

    #[test]
    fn help_lists_every_command() {
        let mut dbg = Debugger::new();
        let mut gb = session();
        let help = dbg.execute(&mut gb, "help").unwrap();
        assert_eq!(help.lines().count(), COMMANDS.len());
        assert!(help.contains("continue [N]"));
    }
}
