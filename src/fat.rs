//! 12-bit packed allocation table traversal.

use crate::{FatError, FatResult, SectorSource, bs::VolumeParams, volume};
use alloc::vec::Vec;

/// Table entries at or above this value mark the end of a chain.
const END_OF_CHAIN_MIN: u16 = 0xFF8;

/// Follows the allocation chain starting at `start`.
///
/// Clusters below 2 are reserved, so such a start yields an empty chain.
/// Each visited cluster is appended before its table entry is read; the
/// terminal value (end-of-chain marker or a defensive `< 2` link) is never
/// appended. Iterations are bounded by the volume's cluster count so a
/// corrupted, circular table cannot hang the walk.
///
/// ## Errors
///
/// [`FatError::FatRead`] when the table cannot be read or the iteration
/// bound is exceeded.
pub(crate) fn cluster_chain<S: SectorSource>(
    source: &S,
    params: &VolumeParams,
    start: u16,
) -> FatResult<Vec<u16>> {
    let mut chain = Vec::new();
    if start < 2 {
        return Ok(chain);
    }

    let bound = params.total_clusters() as usize;
    let mut current = start;
    loop {
        if chain.len() >= bound {
            log::warn!("FAT chain from cluster {start} exceeded {bound} links, table is circular");
            return Err(FatError::FatRead);
        }
        chain.push(current);

        let next = table_entry(source, params, current)?;
        if next >= END_OF_CHAIN_MIN || next < 2 {
            break;
        }
        current = next;
    }

    Ok(chain)
}

/// Reads the 12-bit table entry for `cluster` from the first FAT copy.
///
/// The entry lives at byte offset floor(cluster * 3 / 2) of the table,
/// inside a 16-bit little-endian word: the low 12 bits for an even
/// cluster, the high 12 bits for an odd one. The word may straddle a
/// sector boundary.
fn table_entry<S: SectorSource>(
    source: &S,
    params: &VolumeParams,
    cluster: u16,
) -> FatResult<u16> {
    let offset = usize::from(cluster) * 3 / 2;
    let table_bytes =
        u32::from(params.sectors_per_fat()) as usize * usize::from(params.bytes_per_sector());
    if offset + 2 > table_bytes {
        return Err(FatError::FatRead);
    }

    let mut word = [0u8; 2];
    volume::read_from_sectors(source, params, params.fat_start_sector(), offset, &mut word)
        .map_err(|_| FatError::FatRead)?;
    let value = u16::from_le_bytes(word);

    Ok(if cluster % 2 == 0 {
        value & 0x0FFF
    } else {
        value >> 4
    })
}
