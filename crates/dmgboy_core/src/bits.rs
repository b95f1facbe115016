//! Byte <-> eight-flag codec shared by every bit-packed I/O register.
//!
//! Registers such as IE/IF, LCDC and STAT are modelled as plain structs of
//! named booleans. The [`bit_register!`] macro generates those structs
//! together with a `from_byte`/`to_byte` pair built on [`unpack`] and
//! [`pack`], so register semantics stay in one place instead of being
//! scattered as ad-hoc masks.

/// Split a byte into eight flags; index 0 is the least significant bit.
#[inline]
pub const fn unpack(value: u8) -> [bool; 8] {
    let mut bits = [false; 8];
    let mut i = 0;
    while i < 8 {
        bits[i] = (value & (1 << i)) != 0;
        i += 1;
    }
    bits
}

/// Inverse of [`unpack`].
#[inline]
pub const fn pack(bits: [bool; 8]) -> u8 {
    let mut value = 0u8;
    let mut i = 0;
    while i < 8 {
        if bits[i] {
            value |= 1 << i;
        }
        i += 1;
    }
    value
}

/// Declare a register made of named single-bit flags.
///
/// ```ignore
/// bit_register! {
///     pub struct SerialControl {
///         0 => internal_clock,
///         7 => transfer_start,
///     }
/// }
/// ```
///
/// Bits without a named field decode to nothing and encode as 0; callers
/// OR in the register's fixed "unused reads as 1" mask themselves.
macro_rules! bit_register {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $bit:literal => $field:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize,
        )]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: bool, )*
        }

        impl $name {
            #[allow(dead_code)]
            pub const fn from_byte(value: u8) -> Self {
                let bits = $crate::bits::unpack(value);
                Self { $( $field: bits[$bit], )* }
            }

            #[allow(dead_code)]
            pub const fn to_byte(self) -> u8 {
                #[allow(unused_mut)]
                let mut bits = [false; 8];
                $( bits[$bit] = self.$field; )*
                $crate::bits::pack(bits)
            }
        }
    };
}

pub(crate) use bit_register;

#[cfg(test)]
mod tests {
    use super::*;

    bit_register! {
        struct Sparse {
            0 => low,
            3 => mid,
            7 => high,
        }
    }

    #[test]
    fn pack_inverts_unpack_for_every_byte() {
        for value in 0..=u8::MAX {
            assert_eq!(pack(unpack(value)), value);
        }
    }

    #[test]
    fn unpack_orders_from_lsb() {
        let bits = unpack(0b1000_0001);
        assert!(bits[0]);
        assert!(bits[7]);
        assert!(bits[1..7].iter().all(|b| !b));
    }

    #[test]
    fn generated_register_drops_unnamed_bits() {
        let reg = Sparse::from_byte(0xFF);
        assert!(reg.low && reg.mid && reg.high);
        assert_eq!(reg.to_byte(), 0b1000_1001);

        let reg = Sparse::from_byte(0b0111_0110);
        assert_eq!(reg, Sparse::default());
    }
}
