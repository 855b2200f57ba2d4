/// Byte order used to interpret a multi-byte word stored in device memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    pub fn from_big_endian_flag(big_endian: bool) -> Self {
        if big_endian {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}
