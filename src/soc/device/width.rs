//! Access widths supported by a single load or store, selected on the command
//! line by the classic devmem size letters.
use smallvec::SmallVec;

/// Native-endian byte image of one word, at most eight bytes.
pub type WordBytes = SmallVec<[u8; 8]>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessWidth {
    Byte,
    Half,
    #[default]
    Word,
    Long,
}

impl AccessWidth {
    pub const ALL: [AccessWidth; 4] = [
        AccessWidth::Byte,
        AccessWidth::Half,
        AccessWidth::Word,
        AccessWidth::Long,
    ];

    /// Map a size letter (`b`, `h`, `w`, `l`) to a width. Case-insensitive.
    pub fn from_selector(selector: char) -> Option<Self> {
        match selector.to_ascii_lowercase() {
            'b' => Some(AccessWidth::Byte),
            'h' => Some(AccessWidth::Half),
            'w' => Some(AccessWidth::Word),
            'l' => Some(AccessWidth::Long),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    #[inline(always)]
    pub fn bytes(self) -> usize {
        match self {
            AccessWidth::Byte => 1,
            AccessWidth::Half => 2,
            AccessWidth::Word => 4,
            AccessWidth::Long => 8,
        }
    }

    #[inline(always)]
    pub fn mask(self) -> u64 {
        match self {
            AccessWidth::Long => u64::MAX,
            _ => (1u64 << self.bits()) - 1,
        }
    }

    /// Discard every bit of `value` above the width.
    #[inline(always)]
    pub fn truncate(self, value: u64) -> u64 {
        value & self.mask()
    }

    /// Bytes of `raw` truncated to the width, in host order.
    pub fn ne_bytes(self, raw: u64) -> WordBytes {
        match self {
            AccessWidth::Byte => SmallVec::from_slice(&(raw as u8).to_ne_bytes()),
            AccessWidth::Half => SmallVec::from_slice(&(raw as u16).to_ne_bytes()),
            AccessWidth::Word => SmallVec::from_slice(&(raw as u32).to_ne_bytes()),
            AccessWidth::Long => SmallVec::from_slice(&raw.to_ne_bytes()),
        }
    }

    /// Inverse of [`AccessWidth::ne_bytes`]. `bytes` must hold exactly `self.bytes()` bytes.
    pub fn from_ne_bytes(self, bytes: &[u8]) -> Option<u64> {
        let value = match self {
            AccessWidth::Byte => u8::from_ne_bytes(bytes.try_into().ok()?) as u64,
            AccessWidth::Half => u16::from_ne_bytes(bytes.try_into().ok()?) as u64,
            AccessWidth::Word => u32::from_ne_bytes(bytes.try_into().ok()?) as u64,
            AccessWidth::Long => u64::from_ne_bytes(bytes.try_into().ok()?),
        };
        Some(value)
    }
}
