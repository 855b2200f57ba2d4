use crate::soc::device::{AccessWidth, Endianness};

/// One invocation's worth of work: a read, and optionally a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessRequest {
    pub address: u64,
    pub width: AccessWidth,
    pub order: Endianness,
    pub value: Option<u64>,
}

impl AccessRequest {
    pub fn read(address: u64, width: AccessWidth, order: Endianness) -> Self {
        Self {
            address,
            width,
            order,
            value: None,
        }
    }

    pub fn write(address: u64, width: AccessWidth, order: Endianness, value: u64) -> Self {
        Self {
            value: Some(value),
            ..Self::read(address, width, order)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteBack {
    /// Value actually stored, after truncation to the access width.
    pub written: u64,
    pub readback: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessResult {
    pub read: u64,
    pub write: Option<WriteBack>,
}
