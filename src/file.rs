//! Whole-file reassembly from a path.

use crate::{
    FatError, FatResult, SectorSource,
    bs::VolumeParams,
    dir::{self, SEPARATOR},
    dirent::DirectoryEntry,
    fat, volume,
};
use alloc::vec::Vec;

/// Reads the file at `path` into an exactly-sized buffer.
///
/// The path is split at the last separator into parent directory and leaf
/// name. When listing the parent fails, the whole input path is listed
/// instead as a second attempt. Leaf matching is case-insensitive after
/// trimming surrounding blanks on both sides.
pub(crate) fn read<S: SectorSource>(
    source: &S,
    params: &VolumeParams,
    path: &str,
) -> FatResult<Vec<u8>> {
    let (parent, leaf) = match path.rfind(SEPARATOR) {
        // No separator: the parent is the implicit current directory.
        None => (".", path),
        // Separator at position 0: the parent is the root.
        Some(0) => ("/", &path[1..]),
        Some(pos) => (&path[..pos], &path[pos + 1..]),
    };

    let entries = match dir::list_path(source, params, parent) {
        Ok(entries) => entries,
        Err(err) => {
            log::debug!("listing parent {parent:?} failed ({err}), retrying with the full path");
            dir::list_path(source, params, path)?
        }
    };

    let wanted = leaf.trim_matches(' ');
    for entry in &entries {
        if entry.name().trim_matches(' ').eq_ignore_ascii_case(wanted) {
            return assemble(source, params, entry);
        }
    }

    Err(FatError::FileNotFound)
}

/// Gathers an entry's bytes by walking its real cluster chain.
fn assemble<S: SectorSource>(
    source: &S,
    params: &VolumeParams,
    entry: &DirectoryEntry,
) -> FatResult<Vec<u8>> {
    let size = entry.size() as usize;
    let cluster_size = params.cluster_size() as usize;

    let chain = fat::cluster_chain(source, params, entry.first_cluster())?;
    let clusters_needed = size.div_ceil(cluster_size);
    if chain.len() < clusters_needed {
        // The table ended before covering the declared size.
        return Err(FatError::FatRead);
    }

    let mut data = Vec::new();
    data.try_reserve_exact(size)
        .map_err(|_| FatError::OutOfMemory)?;
    data.resize(size, 0);

    let mut offset = 0;
    for &cluster in chain.iter().take(clusters_needed) {
        let first_sector = params
            .first_sector_of_cluster(cluster)
            .ok_or(FatError::DiskRead)?;
        // The final chunk is truncated to what the declared size still
        // needs, so the buffer is never overrun.
        let take = cluster_size.min(size - offset);
        volume::read_from_sectors(source, params, first_sector, 0, &mut data[offset..offset + take])?;
        offset += take;
    }

    Ok(data)
}
