//! `MemoryAccessor` turns a physical address, width and byte order into one
//! typed access against a mapped page. Every access is validated against the
//! page before the device is touched, so a word that would straddle the page
//! end is an `AccessError::CrossesPage` rather than a stray load.
use std::path::Path;

use crate::soc::device::{
    endianword, AccessWidth, Device, DeviceError, Endianness, PhysicalPage,
};

use super::error::{AccessError, AccessorResult};
use super::request::{AccessRequest, AccessResult, WriteBack};

pub struct MemoryAccessor<D: Device> {
    device: D,
}

impl MemoryAccessor<PhysicalPage> {
    /// Map the page of `device_path` that contains `address`.
    pub fn open_target(device_path: impl AsRef<Path>, address: u64) -> AccessorResult<Self> {
        Ok(Self::new(PhysicalPage::open(device_path, address)?))
    }

    /// Unmap the page and close the device.
    pub fn close_target(self) -> AccessorResult<()> {
        self.device.close()?;
        Ok(())
    }
}

impl<D: Device> MemoryAccessor<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    /// In-page offset of `address`, checked so that a `width` access fits.
    pub fn offset_of(&self, address: u64, width: AccessWidth) -> AccessorResult<usize> {
        let page_size = self.device.page_size();
        let base = self.device.base();
        if address < base || address - base >= page_size as u64 {
            return Err(AccessError::NotMapped { address, base });
        }
        let offset = (address & (page_size as u64 - 1)) as usize;
        if offset + width.bytes() > page_size {
            return Err(AccessError::CrossesPage {
                address,
                width,
                page_size,
            });
        }
        Ok(offset)
    }

    pub fn read(&self, address: u64, width: AccessWidth, order: Endianness) -> AccessorResult<u64> {
        let offset = self.offset_of(address, width)?;
        let raw = self
            .device
            .load(offset, width)
            .map_err(|source| self.fault(source))?;
        Ok(endianword::decode(raw, width, order))
    }

    /// Store `value` truncated to `width`, then return what reads back.
    pub fn write(
        &mut self,
        address: u64,
        width: AccessWidth,
        order: Endianness,
        value: u64,
    ) -> AccessorResult<u64> {
        let offset = self.offset_of(address, width)?;
        let raw = endianword::encode(value, width, order);
        log::debug!(
            "storing {:02X?} at offset 0x{offset:X} of {}",
            width.ne_bytes(raw).as_slice(),
            self.device.name()
        );
        self.device
            .store(offset, width, raw)
            .map_err(|source| self.fault(source))?;
        self.read(address, width, order)
    }

    pub fn execute(&mut self, request: &AccessRequest) -> AccessorResult<AccessResult> {
        let AccessRequest {
            address,
            width,
            order,
            value,
        } = *request;
        let read = self.read(address, width, order)?;
        let write = match value {
            Some(value) => {
                let readback = self.write(address, width, order, value)?;
                Some(WriteBack {
                    written: width.truncate(value),
                    readback,
                })
            }
            None => None,
        };
        Ok(AccessResult { read, write })
    }

    fn fault(&self, source: DeviceError) -> AccessError {
        AccessError::DeviceFault {
            device: self.device.name().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soc::device::RamMemory;

    const PAGE: usize = 0x1000;

    fn make_accessor() -> MemoryAccessor<RamMemory> {
        MemoryAccessor::new(RamMemory::new("ram", 0x1000, PAGE))
    }

    #[test]
    fn half_word_little_endian_scenario() {
        let mut accessor = make_accessor();
        let request = AccessRequest::write(0x1000, AccessWidth::Half, Endianness::Little, 0xABCD);
        let result = accessor.execute(&request).expect("access succeeds");
        assert_eq!(result.read, 0, "fresh page reads zero");
        assert_eq!(
            result.write,
            Some(WriteBack {
                written: 0xABCD,
                readback: 0xABCD
            })
        );
        assert_eq!(accessor.device().bytes()[..2], [0xCD, 0xAB], "little-endian image");
    }

    #[test]
    fn half_word_big_endian_scenario() {
        let mut accessor = make_accessor();
        let readback = accessor
            .write(0x1000, AccessWidth::Half, Endianness::Big, 0xABCD)
            .expect("write succeeds");
        assert_eq!(readback, 0xABCD, "round trip holds in big-endian mode");
        assert_eq!(accessor.device().bytes()[..2], [0xAB, 0xCD], "big-endian image");
    }

    #[test]
    fn write_truncates_to_width() {
        let mut accessor = make_accessor();
        let request = AccessRequest::write(0x1010, AccessWidth::Byte, Endianness::Little, 0x1234);
        let result = accessor.execute(&request).unwrap();
        let write = result.write.expect("write happened");
        assert_eq!(write.written, 0x34);
        assert_eq!(write.readback, 0x34);
        assert_eq!(accessor.device().bytes()[0x10..0x12], [0x34, 0x00]);
    }

    #[test]
    fn read_only_request_leaves_memory_untouched() {
        let mut ram = RamMemory::new("ram", 0x1000, PAGE);
        ram.bytes_mut()[4..8].copy_from_slice(&[0x78, 0x56, 0x34, 0x12]);
        let mut accessor = MemoryAccessor::new(ram);
        let request = AccessRequest::read(0x1004, AccessWidth::Word, Endianness::Little);
        let result = accessor.execute(&request).unwrap();
        assert_eq!(result.read, 0x1234_5678);
        assert_eq!(result.write, None);
        assert_eq!(accessor.device().bytes()[4..8], [0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn byte_order_does_not_affect_bytes() {
        let mut accessor = make_accessor();
        accessor.write(0x1003, AccessWidth::Byte, Endianness::Big, 0xA5).unwrap();
        assert_eq!(accessor.read(0x1003, AccessWidth::Byte, Endianness::Little).unwrap(), 0xA5);
        assert_eq!(accessor.read(0x1003, AccessWidth::Byte, Endianness::Big).unwrap(), 0xA5);
    }

    #[test]
    fn access_straddling_page_end_is_rejected() {
        let mut accessor = make_accessor();
        let err = accessor
            .write(0x1FFE, AccessWidth::Word, Endianness::Little, 0xFFFF_FFFF)
            .expect_err("straddling write must fail");
        assert!(matches!(
            err,
            AccessError::CrossesPage { address: 0x1FFE, width: AccessWidth::Word, page_size: PAGE }
        ));
        assert!(
            accessor.device().bytes().iter().all(|&b| b == 0),
            "nothing is stored on a rejected access"
        );
        assert!(accessor.read(0x1FF8, AccessWidth::Long, Endianness::Little).is_ok());
    }

    #[test]
    fn address_outside_page_is_rejected() {
        let accessor = make_accessor();
        for address in [0x0FFF, 0x2000] {
            assert!(
                matches!(
                    accessor.read(address, AccessWidth::Byte, Endianness::Little),
                    Err(AccessError::NotMapped { base: 0x1000, .. })
                ),
                "0x{address:X} should not resolve"
            );
        }
    }
}
