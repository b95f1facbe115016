//! Flag arithmetic shared by the unprefixed and CB-prefixed tables.
//!
//! Every helper is a pure function from operands (and the incoming flag
//! byte where an instruction preserves or consumes flags) to a result plus
//! the new F value, so the bit-boundary rules can be checked exhaustively.

use super::Flag;

const Z: u8 = Flag::Z.mask();
const N: u8 = Flag::N.mask();
const H: u8 = Flag::H.mask();
const C: u8 = Flag::C.mask();

#[inline]
pub(crate) const fn flags(z: bool, n: bool, h: bool, c: bool) -> u8 {
    (if z { Z } else { 0 })
        | (if n { N } else { 0 })
        | (if h { H } else { 0 })
        | (if c { C } else { 0 })
}

/// The eight accumulator operations of the 0x80-0xBF block and the
/// matching `op A,d8` immediates, in opcode order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub(crate) const ALL: [AluOp; 8] = [
        AluOp::Add,
        AluOp::Adc,
        AluOp::Sub,
        AluOp::Sbc,
        AluOp::And,
        AluOp::Xor,
        AluOp::Or,
        AluOp::Cp,
    ];

    /// Decode bits 3-5 of an opcode.
    #[inline]
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x07) as usize]
    }

    /// Returns the new accumulator value (unchanged for `Cp`) and flags.
    pub(crate) fn apply(self, a: u8, value: u8, f: u8) -> (u8, u8) {
        let carry = f & C != 0;
        match self {
            AluOp::Add => add8(a, value, false),
            AluOp::Adc => add8(a, value, carry),
            AluOp::Sub => sub8(a, value, false),
            AluOp::Sbc => sub8(a, value, carry),
            AluOp::And => {
                let r = a & value;
                (r, flags(r == 0, false, true, false))
            }
            AluOp::Xor => {
                let r = a ^ value;
                (r, flags(r == 0, false, false, false))
            }
            AluOp::Or => {
                let r = a | value;
                (r, flags(r == 0, false, false, false))
            }
            AluOp::Cp => (a, sub8(a, value, false).1),
        }
    }
}

pub(crate) fn add8(a: u8, b: u8, carry_in: bool) -> (u8, u8) {
    let c = carry_in as u8;
    let half = (a & 0x0F) + (b & 0x0F) + c > 0x0F;
    let full = a as u16 + b as u16 + c as u16;
    let result = full as u8;
    (result, flags(result == 0, false, half, full > 0xFF))
}

pub(crate) fn sub8(a: u8, b: u8, borrow_in: bool) -> (u8, u8) {
    let c = borrow_in as u8;
    let half = (a & 0x0F) < (b & 0x0F) + c;
    let full = (a as u16) < b as u16 + c as u16;
    let result = a.wrapping_sub(b).wrapping_sub(c);
    (result, flags(result == 0, true, half, full))
}

/// INC r: C is carried over from `f`.
pub(crate) fn inc8(value: u8, f: u8) -> (u8, u8) {
    let result = value.wrapping_add(1);
    (result, flags(result == 0, false, value & 0x0F == 0x0F, f & C != 0))
}

/// DEC r: C is carried over from `f`.
pub(crate) fn dec8(value: u8, f: u8) -> (u8, u8) {
    let result = value.wrapping_sub(1);
    (result, flags(result == 0, true, value & 0x0F == 0, f & C != 0))
}

/// ADD HL,rr: Z is preserved, H/C come from bits 11 and 15.
pub(crate) fn add16(hl: u16, value: u16, f: u8) -> (u16, u8) {
    let half = (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
    let full = hl as u32 + value as u32 > 0xFFFF;
    (hl.wrapping_add(value), flags(f & Z != 0, false, half, full))
}

/// SP plus a signed displacement (ADD SP,e and LD HL,SP+e).
///
/// H and C are computed on the unsigned low byte; Z and N are cleared.
pub(crate) fn add_sp_offset(sp: u16, offset: u8) -> (u16, u8) {
    let half = (sp & 0x000F) + (offset as u16 & 0x000F) > 0x000F;
    let full = (sp & 0x00FF) + offset as u16 > 0x00FF;
    let result = sp.wrapping_add(offset as i8 as u16);
    (result, flags(false, false, half, full))
}

pub(crate) fn daa(a: u8, f: u8) -> (u8, u8) {
    let subtract = f & N != 0;
    let half = f & H != 0;
    let mut carry = f & C != 0;
    let mut adjust = 0u8;

    let result = if subtract {
        if half {
            adjust |= 0x06;
        }
        if carry {
            adjust |= 0x60;
        }
        a.wrapping_sub(adjust)
    } else {
        if half || a & 0x0F > 0x09 {
            adjust |= 0x06;
        }
        if carry || a > 0x99 {
            adjust |= 0x60;
            carry = true;
        }
        a.wrapping_add(adjust)
    };

    (result, flags(result == 0, subtract, false, carry))
}

/// CB x=0 group: RLC RRC RL RR SLA SRA SWAP SRL, selected by `y`.
pub(crate) fn shift(y: u8, value: u8, f: u8) -> (u8, u8) {
    let carry_in = f & C != 0;
    let (result, carry) = match y & 0x07 {
        0 => (value.rotate_left(1), value & 0x80 != 0),
        1 => (value.rotate_right(1), value & 0x01 != 0),
        2 => ((value << 1) | carry_in as u8, value & 0x80 != 0),
        3 => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
        4 => (value << 1, value & 0x80 != 0),
        5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        6 => (value.rotate_left(4), false),
        _ => (value >> 1, value & 0x01 != 0),
    };
    (result, flags(result == 0, false, false, carry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_half_carry_matches_nibble_rule() {
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                let (r, f) = add8(a, b, false);
                assert_eq!(r, a.wrapping_add(b));
                assert_eq!(f & H != 0, (a & 0xF) + (b & 0xF) >= 0x10, "{a:02X}+{b:02X}");
                assert_eq!(f & C != 0, a as u16 + b as u16 >= 0x100);
                assert_eq!(f & Z != 0, r == 0);
                assert_eq!(f & N, 0);
            }
        }
    }

    #[test]
    fn sub_half_borrow_matches_nibble_rule() {
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                for borrow in [false, true] {
                    let (r, f) = sub8(a, b, borrow);
                    let c = borrow as u8;
                    assert_eq!(r, a.wrapping_sub(b).wrapping_sub(c));
                    assert_eq!(f & H != 0, (a & 0xF) < (b & 0xF) + c);
                    assert_eq!(f & C != 0, (a as u16) < b as u16 + c as u16);
                    assert_ne!(f & N, 0);
                }
            }
        }
    }

    #[test]
    fn adc_folds_carry_into_half_carry() {
        let (r, f) = add8(0x0F, 0x00, true);
        assert_eq!(r, 0x10);
        assert_eq!(f, H);

        let (r, f) = add8(0xFF, 0x00, true);
        assert_eq!(r, 0x00);
        assert_eq!(f, Z | H | C);
    }

    #[test]
    fn cp_leaves_accumulator() {
        let (a, f) = AluOp::Cp.apply(0x3C, 0x3C, 0);
        assert_eq!(a, 0x3C);
        assert_eq!(f, Z | N);
    }

    fn to_bcd(n: u8) -> u8 {
        ((n / 10) << 4) | (n % 10)
    }

    #[test]
    fn daa_produces_bcd_sums() {
        for a in 0..100u8 {
            for b in 0..100u8 {
                let (raw, f) = add8(to_bcd(a), to_bcd(b), false);
                let (r, f) = daa(raw, f);
                let sum = a as u16 + b as u16;
                assert_eq!(r, to_bcd((sum % 100) as u8), "{a} + {b}");
                assert_eq!(f & C != 0, sum >= 100, "{a} + {b}");
                assert_eq!(f & H, 0);
                assert_eq!(f & Z != 0, r == 0);
            }
        }
    }

    #[test]
    fn daa_produces_bcd_differences() {
        for a in 0..100u8 {
            for b in 0..=a {
                let (raw, f) = sub8(to_bcd(a), to_bcd(b), false);
                let (r, f) = daa(raw, f);
                assert_eq!(r, to_bcd(a - b), "{a} - {b}");
                assert_eq!(f & C, 0);
                assert_ne!(f & N, 0);
            }
        }
    }

    #[test]
    fn add16_uses_bit_11_and_15() {
        let (r, f) = add16(0x0FFF, 0x0001, Z);
        assert_eq!(r, 0x1000);
        assert_eq!(f, Z | H);

        let (r, f) = add16(0xFFFF, 0x0001, 0);
        assert_eq!(r, 0x0000);
        assert_eq!(f, H | C);
    }

    #[test]
    fn sp_offset_flags_come_from_low_byte() {
        let (r, f) = add_sp_offset(0x00FF, 0x01);
        assert_eq!(r, 0x0100);
        assert_eq!(f, H | C);

        let (r, f) = add_sp_offset(0x1000, 0xFF);
        assert_eq!(r, 0x0FFF);
        assert_eq!(f, 0);
    }

    #[test]
    fn inc_dec_preserve_carry() {
        assert_eq!(inc8(0x0F, C), (0x10, H | C));
        assert_eq!(inc8(0xFF, 0), (0x00, Z | H));
        assert_eq!(dec8(0x10, C), (0x0F, N | H | C));
        assert_eq!(dec8(0x01, 0), (0x00, Z | N));
    }

    #[test]
    fn shift_group() {
        assert_eq!(shift(0, 0x80, 0), (0x01, C));
        assert_eq!(shift(2, 0x80, 0), (0x00, Z | C));
        assert_eq!(shift(3, 0x01, C), (0x80, C));
        assert_eq!(shift(5, 0x81, 0), (0xC0, C));
        assert_eq!(shift(6, 0xF1, C), (0x1F, 0));
        assert_eq!(shift(7, 0x01, 0), (0x00, Z | C));
    }
}
