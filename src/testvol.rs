//! In-memory volume builders shared by the unit tests.
//!
//! [`TestVolume`] assembles a tiny but structurally honest image: boot
//! sector, one FAT copy, fixed root region and data area, laid out exactly
//! as the parser expects to find them.

use crate::{SliceImage, bs::VolumeParams};
use alloc::vec;
use alloc::vec::Vec;

/// Builds a raw 512-byte boot sector with the given geometry.
pub(crate) fn boot_sector_bytes(
    bytes_per_sector: u16,
    sectors_per_cluster: u8,
    reserved_sectors: u16,
    fat_copies: u8,
    root_entries: u16,
    sectors_per_fat: u16,
    total_sectors: u16,
) -> [u8; 512] {
    let mut sector = [0u8; 512];
    sector[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
    sector[3..11].copy_from_slice(b"MSDOS5.0");
    sector[11..13].copy_from_slice(&bytes_per_sector.to_le_bytes());
    sector[13] = sectors_per_cluster;
    sector[14..16].copy_from_slice(&reserved_sectors.to_le_bytes());
    sector[16] = fat_copies;
    sector[17..19].copy_from_slice(&root_entries.to_le_bytes());
    sector[19..21].copy_from_slice(&total_sectors.to_le_bytes());
    sector[21] = 0xF8;
    sector[22..24].copy_from_slice(&sectors_per_fat.to_le_bytes());
    sector[510] = 0x55;
    sector[511] = 0xAA;
    sector
}

/// Builds a raw 32-byte directory record.
pub(crate) fn raw_entry(
    name: &[u8; 8],
    ext: &[u8; 3],
    attr: u8,
    first_cluster: u16,
    size: u32,
) -> [u8; 32] {
    let mut slot = [0u8; 32];
    slot[0..8].copy_from_slice(name);
    slot[8..11].copy_from_slice(ext);
    slot[11] = attr;
    slot[26..28].copy_from_slice(&first_cluster.to_le_bytes());
    slot[28..32].copy_from_slice(&size.to_le_bytes());
    slot
}

/// A small writable FAT12 image with fixed geometry.
///
/// One 512-byte sector per cluster, one FAT copy of 2 sectors, 16 root
/// slots, 64 sectors total. The FAT starts at sector 1, the root region at
/// sector 3 and the data area at sector 4.
pub(crate) struct TestVolume {
    data: Vec<u8>,
}

impl TestVolume {
    const BYTES_PER_SECTOR: usize = 512;
    const RESERVED_SECTORS: usize = 1;
    const FAT_COPIES: u8 = 1;
    const ROOT_ENTRIES: u16 = 16;
    const SECTORS_PER_FAT: usize = 2;
    const TOTAL_SECTORS: usize = 64;

    const FAT_BASE: usize = Self::RESERVED_SECTORS * Self::BYTES_PER_SECTOR;
    const ROOT_BASE: usize =
        (Self::RESERVED_SECTORS + Self::SECTORS_PER_FAT) * Self::BYTES_PER_SECTOR;
    const DATA_START_SECTOR: usize =
        Self::RESERVED_SECTORS + Self::SECTORS_PER_FAT + 1;

    pub(crate) fn new() -> Self {
        let mut data = vec![0u8; Self::TOTAL_SECTORS * Self::BYTES_PER_SECTOR];
        data[..512].copy_from_slice(&boot_sector_bytes(
            Self::BYTES_PER_SECTOR as u16,
            1,
            Self::RESERVED_SECTORS as u16,
            Self::FAT_COPIES,
            Self::ROOT_ENTRIES,
            Self::SECTORS_PER_FAT as u16,
            Self::TOTAL_SECTORS as u16,
        ));
        Self { data }
    }

    pub(crate) fn params(&self) -> VolumeParams {
        VolumeParams::parse(&self.data[..512]).unwrap()
    }

    pub(crate) fn image(&self) -> SliceImage<'_> {
        SliceImage::new(&self.data)
    }

    /// Packs a 12-bit value into the FAT entry for `cluster`.
    pub(crate) fn set_fat_entry(&mut self, cluster: u16, value: u16) {
        let offset = Self::FAT_BASE + usize::from(cluster) * 3 / 2;
        if cluster % 2 == 0 {
            self.data[offset] = (value & 0xFF) as u8;
            self.data[offset + 1] = (self.data[offset + 1] & 0xF0) | ((value >> 8) as u8 & 0x0F);
        } else {
            self.data[offset] = (self.data[offset] & 0x0F) | (((value & 0x0F) as u8) << 4);
            self.data[offset + 1] = (value >> 4) as u8;
        }
    }

    /// Links the clusters in order and terminates the chain.
    pub(crate) fn link_chain(&mut self, clusters: &[u16]) {
        for pair in clusters.windows(2) {
            self.set_fat_entry(pair[0], pair[1]);
        }
        if let Some(&last) = clusters.last() {
            self.set_fat_entry(last, 0xFFF);
        }
    }

    fn cluster_base(cluster: u16) -> usize {
        (Self::DATA_START_SECTOR + usize::from(cluster) - 2) * Self::BYTES_PER_SECTOR
    }

    /// Fills the start of a data cluster with `bytes`.
    pub(crate) fn write_cluster(&mut self, cluster: u16, bytes: &[u8]) {
        let base = Self::cluster_base(cluster);
        self.data[base..base + bytes.len()].copy_from_slice(bytes);
    }

    /// Fills the end of a data cluster with `bytes`.
    pub(crate) fn write_cluster_tail(&mut self, cluster: u16, bytes: &[u8]) {
        let end = Self::cluster_base(cluster) + Self::BYTES_PER_SECTOR;
        self.data[end - bytes.len()..end].copy_from_slice(bytes);
    }

    /// Writes a raw record into root slot `index`.
    pub(crate) fn set_root_slot(&mut self, index: usize, slot: &[u8; 32]) {
        assert!(index < usize::from(Self::ROOT_ENTRIES));
        let base = Self::ROOT_BASE + index * 32;
        self.data[base..base + 32].copy_from_slice(slot);
    }

    /// Writes a raw record into slot `index` of a subdirectory cluster.
    pub(crate) fn set_cluster_slot(&mut self, cluster: u16, index: usize, slot: &[u8; 32]) {
        let base = Self::cluster_base(cluster) + index * 32;
        self.data[base..base + 32].copy_from_slice(slot);
    }

    /// Builds a raw record, same layout as [`raw_entry`].
    pub(crate) fn entry(
        name: &[u8; 8],
        ext: &[u8; 3],
        attr: u8,
        first_cluster: u16,
        size: u32,
    ) -> [u8; 32] {
        raw_entry(name, ext, attr, first_cluster, size)
    }
}
