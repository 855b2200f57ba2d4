#[path = "device.rs"]
mod device_trait;
pub mod endianness;
pub mod endianword;
pub mod error;
pub mod physical;
pub mod ram;
pub mod width;

pub use device_trait::Device;
pub use endianness::Endianness;
pub use error::{DeviceError, DeviceResult, OsFailure};
pub use physical::PhysicalPage;
pub use ram::RamMemory;
pub use width::AccessWidth;
