//! Conversion between the raw word a load returns (host order) and the logical
//! value described by the selected byte order.
use crate::soc::device::{AccessWidth, Endianness};

pub trait EndianWord: Copy {
    fn to_host(self, source: Endianness) -> Self;
    fn from_host(self, target: Endianness) -> Self;
}

macro_rules! impl_word {
    ($t:ty) => {
        impl EndianWord for $t {
            #[inline(always)]
            fn to_host(self, source: Endianness) -> Self {
                match source {
                    Endianness::Little => Self::from_le(self),
                    Endianness::Big => Self::from_be(self),
                }
            }

            #[inline(always)]
            fn from_host(self, target: Endianness) -> Self {
                match target {
                    Endianness::Little => Self::to_le(self),
                    Endianness::Big => Self::to_be(self),
                }
            }
        }
    };
}

impl_word!(u8);
impl_word!(u16);
impl_word!(u32);
impl_word!(u64);

/// Interpret a raw loaded word of `width` as a value stored in `order`.
pub fn decode(raw: u64, width: AccessWidth, order: Endianness) -> u64 {
    match width {
        AccessWidth::Byte => raw as u8 as u64,
        AccessWidth::Half => (raw as u16).to_host(order) as u64,
        AccessWidth::Word => (raw as u32).to_host(order) as u64,
        AccessWidth::Long => raw.to_host(order),
    }
}

/// Produce the raw word to store so that memory holds `value` in `order`.
/// `value` is truncated to `width` first.
pub fn encode(value: u64, width: AccessWidth, order: Endianness) -> u64 {
    let value = width.truncate(value);
    match width {
        AccessWidth::Byte => value,
        AccessWidth::Half => (value as u16).from_host(order) as u64,
        AccessWidth::Word => (value as u32).from_host(order) as u64,
        AccessWidth::Long => value.from_host(order),
    }
}
