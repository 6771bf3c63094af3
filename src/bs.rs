//! Boot sector (superblock) parsing and the validated volume geometry.

use crate::{FatError, FatResult, static_assert};

/// Boot signature bytes at offsets 510-511.
const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

/// FAT12 can address at most 4084 data clusters; a volume with
/// `total_clusters >= 4085` is FAT16 or larger.
const MAX_FAT12_CLUSTERS: u32 = 4085;

/// Size of a raw directory entry in bytes (always 32 bytes).
pub const DIR_ENTRY_SIZE: usize = 32;

/// First sector of a FAT12/16 volume, BIOS Parameter Block included.
///
/// Only the DOS 3.31 BPB fields are decoded; the extended FAT32 fields
/// live inside what is treated here as boot code.
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct BootSector {
    /// Jump instruction.
    boot_jump: [u8; 3],
    /// OEM name.
    oem_name: [u8; 8],
    /// Bytes per sector.
    bytes_per_sector: u16,
    /// Sectors per cluster.
    sectors_per_cluster: u8,
    /// Reserved sectors before the first FAT copy.
    reserved_sectors: u16,
    /// Number of FAT copies.
    fat_count: u8,
    /// Root directory entry count (nonzero on FAT12/16, zero on FAT32).
    root_entries: u16,
    /// Total sectors, 16-bit field.
    ///
    /// Zero when the volume needs `total_sectors_large` instead.
    total_sectors: u16,
    /// Media descriptor (0xF8 fixed disk, 0xF0 removable).
    media_descriptor: u8,
    /// Sectors per FAT copy.
    sectors_per_fat: u16,
    /// Sectors per track.
    sectors_per_track: u16,
    /// Number of heads.
    heads: u16,
    /// Hidden sectors.
    hidden_sectors: u32,
    /// Total sectors, used when `total_sectors` is zero.
    total_sectors_large: u32,
    boot_code: [u8; 474],
    /// Boot signature, must be `[0x55, 0xAA]`.
    boot_signature: [u8; 2],
}
static_assert!(
    size_of::<BootSector>() == 512,
    "BootSector size is not 512 bytes"
);
static_assert!(align_of::<BootSector>() == 1);

impl BootSector {
    /// Reinterprets the first 512 bytes of a sector as a boot sector.
    ///
    /// Returns `None` when fewer than 512 bytes are available.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Option<&Self> {
        let bytes = bytes.get(..size_of::<Self>())?;
        // BootSector has alignment 1, so any byte pointer is valid.
        Some(unsafe { &*bytes.as_ptr().cast::<Self>() })
    }

    #[must_use]
    #[inline]
    pub fn bytes_per_sector(&self) -> u16 {
        u16::from_le(self.bytes_per_sector)
    }

    #[must_use]
    #[inline]
    pub const fn sectors_per_cluster(&self) -> u8 {
        self.sectors_per_cluster
    }

    #[must_use]
    #[inline]
    pub fn reserved_sectors(&self) -> u16 {
        u16::from_le(self.reserved_sectors)
    }

    #[must_use]
    #[inline]
    pub const fn fat_count(&self) -> u8 {
        self.fat_count
    }

    #[must_use]
    #[inline]
    pub fn root_entries(&self) -> u16 {
        u16::from_le(self.root_entries)
    }

    #[must_use]
    #[inline]
    pub const fn media_descriptor(&self) -> u8 {
        self.media_descriptor
    }

    #[must_use]
    #[inline]
    pub fn sectors_per_fat(&self) -> u16 {
        u16::from_le(self.sectors_per_fat)
    }

    #[must_use]
    #[inline]
    /// Returns the total sector count, preferring the 16-bit field.
    pub fn total_sectors(&self) -> u32 {
        if self.total_sectors != 0 {
            u32::from(u16::from_le(self.total_sectors))
        } else {
            u32::from_le(self.total_sectors_large)
        }
    }

    #[must_use]
    #[inline]
    pub const fn has_valid_signature(&self) -> bool {
        self.boot_signature[0] == BOOT_SIGNATURE[0] && self.boot_signature[1] == BOOT_SIGNATURE[1]
    }
}

/// Validated volume geometry, computed once at mount and immutable after.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct VolumeParams {
    bytes_per_sector: u16,
    sectors_per_cluster: u8,
    reserved_sectors: u16,
    fat_copies: u8,
    root_entries: u16,
    sectors_per_fat: u16,
    total_sectors: u32,
    // Derived fields below.
    cluster_size: u32,
    total_clusters: u32,
    root_dir_sectors: u32,
    data_start_sector: u32,
}

impl VolumeParams {
    /// Decodes and validates the boot sector of a FAT12 volume.
    ///
    /// ## Errors
    ///
    /// - [`FatError::CorruptSuperblock`] when the input is shorter than 512
    ///   bytes or a mandatory geometry field is zero.
    /// - [`FatError::InvalidSignature`] when offsets 510-511 are not
    ///   `55 AA`.
    /// - [`FatError::UnsupportedFilesystem`] when the root entry count is
    ///   zero (FAT32 layout) or the cluster count exceeds the 12-bit
    ///   addressing range.
    pub fn parse(sector0: &[u8]) -> FatResult<Self> {
        let bs = BootSector::from_bytes(sector0).ok_or(FatError::CorruptSuperblock)?;

        if !bs.has_valid_signature() {
            return Err(FatError::InvalidSignature);
        }

        // Mandatory geometry must be nonzero before any derived value is
        // computed from it.
        if bs.bytes_per_sector() == 0
            || bs.sectors_per_cluster() == 0
            || bs.reserved_sectors() == 0
            || bs.fat_count() == 0
            || bs.sectors_per_fat() == 0
        {
            return Err(FatError::CorruptSuperblock);
        }

        // FAT12/16 keep the root directory in a fixed region sized by this
        // field; zero means a FAT32 layout.
        if bs.root_entries() == 0 {
            return Err(FatError::UnsupportedFilesystem);
        }

        let total_sectors = bs.total_sectors();
        if total_sectors == 0 {
            return Err(FatError::CorruptSuperblock);
        }

        let total_clusters = total_sectors / u32::from(bs.sectors_per_cluster());
        if total_clusters >= MAX_FAT12_CLUSTERS {
            return Err(FatError::UnsupportedFilesystem);
        }

        let bytes_per_sector = u32::from(bs.bytes_per_sector());
        let root_dir_bytes = u32::from(bs.root_entries()) * DIR_ENTRY_SIZE as u32;
        let root_dir_sectors = root_dir_bytes.div_ceil(bytes_per_sector);
        let data_start_sector = u32::from(bs.reserved_sectors())
            + u32::from(bs.fat_count()) * u32::from(bs.sectors_per_fat())
            + root_dir_sectors;

        Ok(Self {
            bytes_per_sector: bs.bytes_per_sector(),
            sectors_per_cluster: bs.sectors_per_cluster(),
            reserved_sectors: bs.reserved_sectors(),
            fat_copies: bs.fat_count(),
            root_entries: bs.root_entries(),
            sectors_per_fat: bs.sectors_per_fat(),
            total_sectors,
            cluster_size: bytes_per_sector * u32::from(bs.sectors_per_cluster()),
            total_clusters,
            root_dir_sectors,
            data_start_sector,
        })
    }

    #[must_use]
    #[inline]
    pub const fn bytes_per_sector(&self) -> u16 {
        self.bytes_per_sector
    }

    #[must_use]
    #[inline]
    pub const fn sectors_per_cluster(&self) -> u8 {
        self.sectors_per_cluster
    }

    #[must_use]
    #[inline]
    pub const fn reserved_sectors(&self) -> u16 {
        self.reserved_sectors
    }

    #[must_use]
    #[inline]
    pub const fn fat_copies(&self) -> u8 {
        self.fat_copies
    }

    #[must_use]
    #[inline]
    pub const fn root_entries(&self) -> u16 {
        self.root_entries
    }

    #[must_use]
    #[inline]
    pub const fn sectors_per_fat(&self) -> u16 {
        self.sectors_per_fat
    }

    #[must_use]
    #[inline]
    pub const fn total_sectors(&self) -> u32 {
        self.total_sectors
    }

    #[must_use]
    #[inline]
    /// Returns the number of bytes per cluster.
    pub const fn cluster_size(&self) -> u32 {
        self.cluster_size
    }

    #[must_use]
    #[inline]
    pub const fn total_clusters(&self) -> u32 {
        self.total_clusters
    }

    #[must_use]
    #[inline]
    pub const fn root_dir_sectors(&self) -> u32 {
        self.root_dir_sectors
    }

    #[must_use]
    #[inline]
    /// Returns the first sector of the data area (where cluster 2 starts).
    pub const fn data_start_sector(&self) -> u32 {
        self.data_start_sector
    }

    #[must_use]
    #[inline]
    /// Returns the first sector of the first FAT copy.
    pub const fn fat_start_sector(&self) -> u32 {
        self.reserved_sectors as u32
    }

    #[must_use]
    #[inline]
    /// Returns the first sector of the fixed root directory region.
    pub const fn root_start_sector(&self) -> u32 {
        self.reserved_sectors as u32 + self.fat_copies as u32 * self.sectors_per_fat as u32
    }

    #[must_use]
    /// Maps a cluster number to its first sector index.
    ///
    /// Clusters 0 and 1 are reserved and carry no file data, so anything
    /// below 2 yields `None`.
    pub fn first_sector_of_cluster(&self, cluster: u16) -> Option<u32> {
        if cluster < 2 {
            return None;
        }
        Some(
            self.data_start_sector
                + u32::from(cluster - 2) * u32::from(self.sectors_per_cluster),
        )
    }
}
