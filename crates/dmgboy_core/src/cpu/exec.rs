mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use crate::error::Fault;

use super::alu::AluOp;
use super::{Bus, Cpu};

/// Operation selected by bits 3-7 of an opcode in the 0x40-0xBF block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockOp {
    Unused,
    /// `LD r,src` with the destination register index.
    Load(u8),
    /// `op A,src`.
    Alu(AluOp),
}

const fn build_block_table() -> [BlockOp; 32] {
    let mut table = [BlockOp::Unused; 32];
    let mut i = 0;
    while i < 8 {
        table[0x08 + i] = BlockOp::Load(i as u8);
        table[0x10 + i] = BlockOp::Alu(AluOp::ALL[i]);
        i += 1;
    }
    table
}

/// 0x40-0x7F are register loads, 0x80-0xBF accumulator ALU ops; the
/// source operand always comes from bits 0-2.
static BLOCK_OPS: [BlockOp; 32] = build_block_table();

impl Cpu {
    /// Decode and execute a single opcode whose fetch has already been
    /// charged.
    pub(super) fn exec_opcode<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<(), Fault> {
        match opcode {
            0x00 => {}

            // HALT sits in the middle of the LD block.
            0x76 => self.exec_halt(),
            0x40..=0xBF => self.exec_block(bus, opcode),

            0x01 | 0x11 | 0x21 | 0x31 => self.exec_ld_rr_d16(bus, opcode),
            0x02 | 0x12 | 0x22 | 0x32 => self.exec_ld_indirect_a(bus, opcode),
            0x0A | 0x1A | 0x2A | 0x3A => self.exec_ld_a_indirect(bus, opcode),
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                self.exec_ld_r_d8(bus, opcode)
            }
            0x08 => self.exec_ld_a16_sp(bus),

            0x03 | 0x13 | 0x23 | 0x33 => self.exec_inc16(bus, opcode),
            0x0B | 0x1B | 0x2B | 0x3B => self.exec_dec16(bus, opcode),
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                self.exec_inc8(bus, opcode)
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                self.exec_dec8(bus, opcode)
            }
            0x09 | 0x19 | 0x29 | 0x39 => self.exec_add_hl_rr(bus, opcode),

            0x07 | 0x0F | 0x17 | 0x1F => self.exec_rotate_a(opcode),
            0x27 => self.exec_daa(),
            0x2F => self.exec_cpl(),
            0x37 => self.exec_scf(),
            0x3F => self.exec_ccf(),

            0x10 => self.exec_stop(bus),

            0x18 => self.exec_jr(bus, true),
            0x20 | 0x28 | 0x30 | 0x38 => {
                let taken = self.condition(opcode >> 3);
                self.exec_jr(bus, taken)
            }

            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                self.exec_alu_imm(bus, opcode)
            }

            0xC3 => self.exec_jp(bus, true),
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                let taken = self.condition(opcode >> 3);
                self.exec_jp(bus, taken)
            }
            0xE9 => self.regs.pc = self.regs.hl(),

            0xCD => self.exec_call(bus, true),
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                let taken = self.condition(opcode >> 3);
                self.exec_call(bus, taken)
            }

            0xC9 => self.exec_ret(bus),
            0xD9 => {
                self.exec_ret(bus);
                self.ime = true;
            }
            0xC0 | 0xC8 | 0xD0 | 0xD8 => self.exec_ret_cc(bus, opcode),

            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => self.exec_rst(bus, opcode),

            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.exec_push(bus, opcode),
            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.exec_pop(bus, opcode),

            0xE0 | 0xF0 => self.exec_ldh_a8(bus, opcode),
            0xE2 | 0xF2 => self.exec_ldh_c(bus, opcode),
            0xEA | 0xFA => self.exec_ld_a16_a(bus, opcode),

            0xE8 => self.exec_add_sp_e(bus),
            0xF8 => self.exec_ld_hl_sp_e(bus),
            0xF9 => self.exec_ld_sp_hl(bus),

            0xF3 => self.exec_di(),
            0xFB => self.exec_ei(),

            0xCB => self.step_cb(bus),

            // Opcode holes D3 DB DD E3 E4 EB EC ED F4 FC FD.
            _ => {
                return Err(Fault::IllegalOpcode {
                    opcode,
                    pc: self.regs.pc.wrapping_sub(1),
                })
            }
        }
        Ok(())
    }

    fn exec_block<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let src = opcode & 0x07;
        match BLOCK_OPS[(opcode >> 3) as usize] {
            BlockOp::Load(dst) => {
                let value = self.read_reg8(bus, src);
                self.write_reg8(bus, dst, value);
            }
            BlockOp::Alu(op) => {
                let value = self.read_reg8(bus, src);
                self.alu(op, value);
            }
            BlockOp::Unused => {
                debug_assert!(false, "opcode {opcode:#04x} routed to LD/ALU block");
            }
        }
    }
}
