pub mod accessor;
pub mod error;
pub mod request;

pub use accessor::MemoryAccessor;
pub use error::{AccessError, AccessorResult};
pub use request::{AccessRequest, AccessResult, WriteBack};
