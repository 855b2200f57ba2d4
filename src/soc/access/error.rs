use thiserror::Error;

use crate::soc::device::{AccessWidth, DeviceError};

pub type AccessorResult<T> = Result<T, AccessError>;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("address 0x{address:016X} is outside the page mapped at 0x{base:016X}")]
    NotMapped { address: u64, base: u64 },
    #[error(
        "{}-bit access at 0x{address:016X} crosses the end of its {page_size}-byte page",
        .width.bits()
    )]
    CrossesPage {
        address: u64,
        width: AccessWidth,
        page_size: usize,
    },
    #[error("device '{device}' reported a fault: {source}")]
    DeviceFault {
        device: String,
        #[source]
        source: DeviceError,
    },
    #[error(transparent)]
    Device(#[from] DeviceError),
}
