//! One page of physical memory mapped through a memory character device
//! (normally `/dev/mem`). Aligned loads and stores are single volatile
//! accesses so that register reads and writes reach the hardware exactly once.
use std::{
    fs::{File, OpenOptions},
    ops::Range,
    os::unix::{fs::OpenOptionsExt, io::AsRawFd},
    path::Path,
    ptr::{self, NonNull},
};

use crate::soc::device::{AccessWidth, Device, DeviceError, DeviceResult, OsFailure};

pub const DEFAULT_DEVICE: &str = "/dev/mem";

/// Size of a page as reported by the kernel.
pub fn page_size() -> DeviceResult<usize> {
    // SAFETY: sysconf has no memory-safety preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size <= 0 {
        return Err(OsFailure::last("sysconf").into());
    }
    Ok(size as usize)
}

pub struct PhysicalPage {
    name: String,
    file: Option<File>,
    map: Option<NonNull<u8>>,
    page_size: usize,
    base: u64,
}

impl PhysicalPage {
    /// Open `path` for synchronous read/write and map the page containing
    /// `address`.
    pub fn open(path: impl AsRef<Path>, address: u64) -> DeviceResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(path)
            .map_err(|err| OsFailure::from_io("open", err))?;
        log::info!("{} opened.", path.display());

        let page_size = page_size()?;
        let base = address & !(page_size as u64 - 1);
        let offset = libc::off_t::try_from(base).map_err(|_| DeviceError::BaseOverflow { base })?;

        // SAFETY: a fresh shared mapping is requested at a kernel-chosen
        // address; no existing memory is affected.
        let map = unsafe {
            libc::mmap(
                ptr::null_mut(),
                page_size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                offset,
            )
        };
        if map == libc::MAP_FAILED {
            return Err(OsFailure::last("mmap").into());
        }
        let map = NonNull::new(map as *mut u8).ok_or_else(|| OsFailure::last("mmap"))?;
        log::info!("Memory mapped at address {:p}.", map.as_ptr());

        Ok(Self {
            name: path.display().to_string(),
            file: Some(file),
            map: Some(map),
            page_size,
            base,
        })
    }

    /// Virtual address that `offset` is mapped at, for diagnostics.
    pub fn virtual_address(&self, offset: usize) -> Option<*const u8> {
        let map = self.map?;
        (offset < self.page_size).then(|| map.as_ptr().wrapping_add(offset) as *const u8)
    }

    /// Unmap the page and close the device, reporting an unmap failure.
    pub fn close(mut self) -> DeviceResult<()> {
        let result = self.unmap();
        self.file.take();
        result
    }

    fn unmap(&mut self) -> DeviceResult<()> {
        let Some(map) = self.map.take() else {
            return Ok(());
        };
        // SAFETY: `map` was returned by mmap with length `page_size` and is
        // unmapped at most once because it has been taken out of `self.map`.
        if unsafe { libc::munmap(map.as_ptr() as *mut libc::c_void, self.page_size) } == -1 {
            return Err(OsFailure::last("munmap").into());
        }
        Ok(())
    }

    fn word_ptr(&self, offset: usize, width: AccessWidth) -> DeviceResult<*mut u8> {
        self.check_span(offset, width)?;
        let map = self.map.ok_or(DeviceError::OutOfRange {
            offset,
            len: width.bytes(),
            capacity: 0,
        })?;
        // SAFETY: the span check keeps `offset` inside the mapping.
        Ok(unsafe { map.as_ptr().add(offset) })
    }
}

impl Device for PhysicalPage {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> u64 {
        self.base
    }

    fn span(&self) -> Range<usize> {
        0..self.page_size
    }

    fn load(&self, offset: usize, width: AccessWidth) -> DeviceResult<u64> {
        let word = self.word_ptr(offset, width)?;
        // SAFETY: `word` is in bounds of the live mapping for the whole width.
        let raw = unsafe {
            match width {
                AccessWidth::Byte => load_word(word) as u64,
                AccessWidth::Half => load_word(word as *const u16) as u64,
                AccessWidth::Word => load_word(word as *const u32) as u64,
                AccessWidth::Long => load_word(word as *const u64),
            }
        };
        Ok(raw)
    }

    fn store(&mut self, offset: usize, width: AccessWidth, raw: u64) -> DeviceResult<()> {
        let word = self.word_ptr(offset, width)?;
        // SAFETY: `word` is in bounds of the live mapping for the whole width.
        unsafe {
            match width {
                AccessWidth::Byte => store_word(word, raw as u8),
                AccessWidth::Half => store_word(word as *mut u16, raw as u16),
                AccessWidth::Word => store_word(word as *mut u32, raw as u32),
                AccessWidth::Long => store_word(word as *mut u64, raw),
            }
        }
        Ok(())
    }
}

/// Volatile load when `word` is aligned, otherwise one unaligned load.
///
/// # Safety
/// `word` must be valid for reads of `size_of::<T>()` bytes.
unsafe fn load_word<T: Copy>(word: *const T) -> T {
    if word.is_aligned() {
        unsafe { ptr::read_volatile(word) }
    } else {
        unsafe { ptr::read_unaligned(word) }
    }
}

/// # Safety
/// `word` must be valid for writes of `size_of::<T>()` bytes.
unsafe fn store_word<T: Copy>(word: *mut T, value: T) {
    if word.is_aligned() {
        unsafe { ptr::write_volatile(word, value) }
    } else {
        unsafe { ptr::write_unaligned(word, value) }
    }
}

impl Drop for PhysicalPage {
    fn drop(&mut self) {
        if let Err(err) = self.unmap() {
            log::warn!("failed to unmap {}: {err}", self.name);
        }
    }
}
