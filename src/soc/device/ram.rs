use std::ops::Range;

use crate::soc::device::{AccessWidth, Device, DeviceResult};

/// A page of ordinary process memory standing in for a mapped physical page.
pub struct RamMemory {
    name: String,
    base: u64,
    bytes: Vec<u8>,
}

impl RamMemory {
    /// `base` is the physical address the first byte answers to; it should be
    /// aligned to `len`, which should be a power of two.
    pub fn new(name: impl Into<String>, base: u64, len: usize) -> Self {
        Self {
            name: name.into(),
            base,
            bytes: vec![0_u8; len],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Device for RamMemory {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn base(&self) -> u64 {
        self.base
    }

    #[inline(always)]
    fn span(&self) -> Range<usize> {
        0..self.bytes.len()
    }

    fn load(&self, offset: usize, width: AccessWidth) -> DeviceResult<u64> {
        self.check_span(offset, width)?;
        let end = offset + width.bytes();
        // check_span guarantees the slice length matches the width.
        Ok(width.from_ne_bytes(&self.bytes[offset..end]).unwrap_or_default())
    }

    fn store(&mut self, offset: usize, width: AccessWidth, raw: u64) -> DeviceResult<()> {
        self.check_span(offset, width)?;
        let end = offset + width.bytes();
        self.bytes[offset..end].copy_from_slice(&width.ne_bytes(raw));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soc::device::DeviceError;

    #[test]
    fn store_then_load_in_host_order() {
        let mut ram = RamMemory::new("ram", 0x1000, 0x100);
        ram.store(0x10, AccessWidth::Word, 0xDEAD_BEEF).expect("store succeeds");
        assert_eq!(
            &ram.bytes()[0x10..0x14],
            &0xDEAD_BEEFu32.to_ne_bytes(),
            "stores keep host byte order"
        );
        assert_eq!(ram.load(0x10, AccessWidth::Word).unwrap(), 0xDEAD_BEEF);
        assert_eq!(
            ram.load(0x10, AccessWidth::Byte).unwrap(),
            0xDEAD_BEEFu32.to_ne_bytes()[0] as u64
        );
    }

    #[test]
    fn store_discards_bits_above_width() {
        let mut ram = RamMemory::new("ram", 0, 0x10);
        ram.store(0, AccessWidth::Byte, 0x1FF).unwrap();
        assert_eq!(ram.bytes()[..2], [0xFF, 0x00], "neighbouring byte untouched");
    }

    #[test]
    fn accesses_past_the_end_fail() {
        let mut ram = RamMemory::new("ram", 0, 0x10);
        assert!(matches!(
            ram.load(0xC, AccessWidth::Long),
            Err(DeviceError::OutOfRange { offset: 0xC, len: 8, capacity: 0x10 })
        ));
        assert!(ram.store(0xF, AccessWidth::Half, 0).is_err());
        assert!(ram.bytes().iter().all(|&b| b == 0), "failed store must not write");
    }
}
