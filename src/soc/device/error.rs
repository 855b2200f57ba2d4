use std::{ffi::CStr, fmt, io, panic::Location};

use thiserror::Error;

pub type DeviceResult<T> = Result<T, DeviceError>;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Os(#[from] OsFailure),
    #[error("offset 0x{offset:X} + {len} bytes exceeds device capacity 0x{capacity:X}")]
    OutOfRange {
        offset: usize,
        len: usize,
        capacity: usize,
    },
    #[error("{0} is not supported by this device")]
    Unsupported(&'static str),
    #[error("physical base 0x{base:X} cannot be expressed as a file offset")]
    BaseOverflow { base: u64 },
}

/// A failed system call, remembered together with the errno it set and the
/// call site that issued it.
#[derive(Debug)]
pub struct OsFailure {
    op: &'static str,
    errno: i32,
    location: &'static Location<'static>,
}

impl OsFailure {
    /// Capture `errno` of the most recent failing libc call.
    #[track_caller]
    pub fn last(op: &'static str) -> Self {
        Self::from_io(op, io::Error::last_os_error())
    }

    #[track_caller]
    pub fn from_io(op: &'static str, err: io::Error) -> Self {
        Self {
            op,
            errno: err.raw_os_error().unwrap_or(0),
            location: Location::caller(),
        }
    }

    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn errno(&self) -> i32 {
        self.errno
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl fmt::Display for OsFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error at line {}, file {} ({}) [{}]",
            self.location.line(),
            self.location.file(),
            self.errno,
            strerror(self.errno)
        )
    }
}

impl std::error::Error for OsFailure {}

fn strerror(errno: i32) -> String {
    // SAFETY: strerror always returns a valid NUL-terminated string, which is
    // copied out before any other libc call can overwrite it.
    unsafe { CStr::from_ptr(libc::strerror(errno)) }
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_failure_reports_call_site_and_errno() {
        let failure = OsFailure::from_io("open", io::Error::from_raw_os_error(libc::ENOENT));
        let line = line!() - 1;
        let text = failure.to_string();
        assert!(
            text.starts_with(&format!("Error at line {line}, file ")),
            "unexpected diagnostic: {text}"
        );
        assert!(text.contains(file!()), "diagnostic should name this file: {text}");
        assert!(
            text.ends_with(&format!("({}) [{}]", libc::ENOENT, strerror(libc::ENOENT))),
            "diagnostic should carry errno and its description: {text}"
        );
        assert_eq!(failure.op(), "open");
    }

    #[test]
    fn device_error_wraps_os_failure_transparently() {
        let failure = OsFailure::from_io("mmap", io::Error::from_raw_os_error(libc::EPERM));
        let expected = failure.to_string();
        let err = DeviceError::from(failure);
        assert_eq!(err.to_string(), expected);
    }
}
