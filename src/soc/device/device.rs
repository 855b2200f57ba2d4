//! Defines the `Device` trait used by the accessor. A device is one mapped page
//! of memory; it knows the physical address its first byte answers to and
//! performs single typed loads and stores at an in-page offset, returning a
//! consistent `DeviceResult` so the accessor can translate failures into
//! `AccessError::Device`.
use std::ops::Range;

use super::{
    error::{DeviceError, DeviceResult},
    width::AccessWidth,
};

pub trait Device {
    fn name(&self) -> &str;

    /// Physical address of offset 0.
    fn base(&self) -> u64;

    /// Valid byte offsets, always `0..page_size`.
    fn span(&self) -> Range<usize>;

    #[inline(always)]
    fn page_size(&self) -> usize {
        self.span().len()
    }

    /// Confirm `width` bytes starting at `offset` lie inside the span.
    fn check_span(&self, offset: usize, width: AccessWidth) -> DeviceResult<()> {
        let capacity = self.page_size();
        match offset.checked_add(width.bytes()) {
            Some(end) if end <= capacity => Ok(()),
            _ => Err(DeviceError::OutOfRange {
                offset,
                len: width.bytes(),
                capacity,
            }),
        }
    }

    /// Load one word of `width` at `offset`, returned in host byte order and
    /// zero-extended to 64 bits.
    fn load(&self, offset: usize, width: AccessWidth) -> DeviceResult<u64>;

    /// Store the low `width` bits of `raw` at `offset` in host byte order.
    fn store(&mut self, offset: usize, width: AccessWidth, raw: u64) -> DeviceResult<()>;
}
