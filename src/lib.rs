//! Read-only FAT12 driver over an in-memory disk image.
//!
//! The driver never touches raw image offsets itself: all access goes
//! through a [`SectorSource`], which maps a zero-based sector index to a
//! read-only byte view. [`volume::Fat12Fs::mount`] parses the boot sector
//! once; everything afterwards is a bounded computation over the resulting
//! [`bs::VolumeParams`].
#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic, clippy::nursery)]

extern crate alloc;
use thiserror::Error;

macro_rules! static_assert {
    ($condition:expr $(, $($arg:tt)+)?) => {
        const _: () = assert!($condition $(, $($arg)+)?);
    };
}
pub(crate) use static_assert;

pub mod bs;
pub mod date;
mod dir;
pub mod dirent;
mod fat;
mod file;
pub mod volume;

#[cfg(test)]
pub(crate) mod testvol;

pub use volume::Fat12Fs;

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum FatError {
    #[error("Disk read failure")]
    DiskRead,
    #[error("Invalid boot signature")]
    InvalidSignature,
    #[error("Corrupt superblock")]
    CorruptSuperblock,
    #[error("Unsupported filesystem")]
    UnsupportedFilesystem,
    #[error("Path not found")]
    PathNotFound,
    #[error("Not a directory")]
    NotADirectory,
    #[error("File not found")]
    FileNotFound,
    #[error("FAT read failure")]
    FatRead,
    #[error("Out of memory")]
    OutOfMemory,
}

pub type FatResult<T> = Result<T, FatError>;

/// Sector-access collaborator supplying the raw volume bytes.
///
/// The core computes sector indices only; the provider owns the mapping to
/// actual memory. The driver never writes through this trait.
pub trait SectorSource {
    /// Returns a read-only byte view of the sector at the given zero-based
    /// index, or `None` if the index is out of range.
    fn sector(&self, index: u32) -> Option<&[u8]>;
}

/// The obvious [`SectorSource`]: a borrowed byte image carved into
/// fixed-size sectors.
#[derive(Debug, Clone, Copy)]
pub struct SliceImage<'a> {
    data: &'a [u8],
    sector_size: usize,
}

impl<'a> SliceImage<'a> {
    /// Default sector size, matching the minimum FAT12 boot sector.
    pub const DEFAULT_SECTOR_SIZE: usize = 512;

    #[must_use]
    #[inline]
    /// Creates a provider over `data` with 512-byte sectors.
    pub const fn new(data: &'a [u8]) -> Self {
        Self::with_sector_size(data, Self::DEFAULT_SECTOR_SIZE)
    }

    #[must_use]
    #[inline]
    /// Creates a provider over `data` with a custom sector size.
    pub const fn with_sector_size(data: &'a [u8], sector_size: usize) -> Self {
        Self { data, sector_size }
    }
}

impl SectorSource for SliceImage<'_> {
    fn sector(&self, index: u32) -> Option<&[u8]> {
        let start = (index as usize).checked_mul(self.sector_size)?;
        let end = start.checked_add(self.sector_size)?;
        self.data.get(start..end)
    }
}
