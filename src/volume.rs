//! The mounted-volume facade exposed to a host dispatcher.

use crate::{
    FatError, FatResult, SectorSource,
    bs::VolumeParams,
    dir, dirent, file,
};
use alloc::vec::Vec;

/// A mounted, read-only FAT12 volume.
///
/// The superblock is parsed exactly once at [`Fat12Fs::mount`]; every later
/// call is a bounded computation over the stored [`VolumeParams`] and takes
/// `&self`. The driver holds no mutable state, so concurrent use needs
/// either one instance per thread or caller-side serialization.
pub struct Fat12Fs<S: SectorSource> {
    source: S,
    params: VolumeParams,
}

impl<S: SectorSource> Fat12Fs<S> {
    /// Parses and validates the boot sector, taking ownership of the
    /// sector provider for the volume's lifetime.
    ///
    /// ## Errors
    ///
    /// [`FatError::DiskRead`] when sector 0 cannot be resolved, otherwise
    /// any of the superblock validation failures of
    /// [`VolumeParams::parse`].
    pub fn mount(source: S) -> FatResult<Self> {
        let params = {
            let sector0 = source.sector(0).ok_or(FatError::DiskRead)?;
            VolumeParams::parse(sector0)
                .inspect_err(|e| log::warn!("superblock rejected: {e}"))?
        };
        log::debug!(
            "FAT12 volume mounted: {} clusters of {} bytes, data area at sector {}",
            params.total_clusters(),
            params.cluster_size(),
            params.data_start_sector()
        );
        Ok(Self { source, params })
    }

    #[must_use]
    #[inline]
    /// Returns the validated volume geometry.
    pub const fn params(&self) -> &VolumeParams {
        &self.params
    }

    /// Enumerates the entries of the directory at `path`, in on-disk
    /// order. `"/"` (or the empty path) lists the root.
    ///
    /// ## Errors
    ///
    /// [`FatError::PathNotFound`] when a component does not exist,
    /// [`FatError::NotADirectory`] when a component names a file, plus any
    /// disk or table read failure.
    pub fn list_directory(&self, path: &str) -> FatResult<Vec<dirent::DirectoryEntry>> {
        dir::list_path(&self.source, &self.params, path)
    }

    /// Reads the whole file at `path` into a freshly allocated buffer
    /// sized exactly to the file's declared byte size.
    ///
    /// ## Errors
    ///
    /// [`FatError::FileNotFound`] when no entry matches the leaf name,
    /// [`FatError::OutOfMemory`] when the output buffer cannot be
    /// allocated, plus any disk or table read failure.
    pub fn read_file(&self, path: &str) -> FatResult<Vec<u8>> {
        file::read(&self.source, &self.params, path)
    }
}

/// Copies `dst.len()` bytes from the sector run beginning at
/// `first_sector`, starting `offset` bytes in.
///
/// Reads may span consecutive sectors; each sector view must supply at
/// least `bytes_per_sector` bytes.
pub(crate) fn read_from_sectors<S: SectorSource>(
    source: &S,
    params: &VolumeParams,
    first_sector: u32,
    offset: usize,
    dst: &mut [u8],
) -> FatResult<()> {
    let bps = usize::from(params.bytes_per_sector());
    let mut sector = first_sector + u32::try_from(offset / bps).map_err(|_| FatError::DiskRead)?;
    let mut offset = offset % bps;

    let mut copied = 0;
    while copied < dst.len() {
        let view = source.sector(sector).ok_or(FatError::DiskRead)?;
        let view = view.get(..bps).ok_or(FatError::DiskRead)?;

        let take = (bps - offset).min(dst.len() - copied);
        dst[copied..copied + take].copy_from_slice(&view[offset..offset + take]);
        copied += take;
        offset = 0;
        sector += 1;
    }
    Ok(())
}
