//! Directory enumeration and hierarchical path resolution.

use crate::{
    FatError, FatResult, SectorSource,
    bs::{DIR_ENTRY_SIZE, VolumeParams},
    dirent::{DirectoryEntry, RawDirEntry},
    fat, volume,
};
use alloc::vec::Vec;

/// Path component separator.
pub(crate) const SEPARATOR: char = '/';

/// Where a directory's records live.
///
/// The FAT12 root occupies a fixed sector range outside the cluster data
/// area, so it has no chain of its own.
pub(crate) enum DirHandle {
    Root,
    Chain(Vec<u16>),
}

/// Lists the directory at `path`, starting from the root.
///
/// A single leading separator is stripped; the empty path is the root
/// itself.
pub(crate) fn list_path<S: SectorSource>(
    source: &S,
    params: &VolumeParams,
    path: &str,
) -> FatResult<Vec<DirectoryEntry>> {
    let path = path.strip_prefix(SEPARATOR).unwrap_or(path);
    resolve(source, params, &DirHandle::Root, path)
}

/// Recursive descent: one path component per level.
///
/// An exhausted path means the current listing is the answer, which covers
/// both the root and the final directory uniformly. A matching entry that
/// is not a directory fails the whole resolution.
fn resolve<S: SectorSource>(
    source: &S,
    params: &VolumeParams,
    handle: &DirHandle,
    path: &str,
) -> FatResult<Vec<DirectoryEntry>> {
    let (component, rest) = split_first_component(path);
    let entries = list(source, params, handle)?;

    if component.is_empty() {
        return Ok(entries);
    }

    for entry in &entries {
        if entry.name() == component {
            if !entry.is_directory() {
                return Err(FatError::NotADirectory);
            }
            let chain = fat::cluster_chain(source, params, entry.first_cluster())?;
            return resolve(source, params, &DirHandle::Chain(chain), rest);
        }
    }

    Err(FatError::PathNotFound)
}

/// Enumerates every live record of one directory, in on-disk order.
///
/// A slot whose first byte is 0x00 terminates the scan, across the whole
/// remaining chain in subdirectory mode. Deleted (0xE5) slots and
/// long-filename fragments are skipped.
fn list<S: SectorSource>(
    source: &S,
    params: &VolumeParams,
    handle: &DirHandle,
) -> FatResult<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    let mut slot = [0u8; DIR_ENTRY_SIZE];

    match handle {
        DirHandle::Root => {
            let root_start = params.root_start_sector();
            for i in 0..usize::from(params.root_entries()) {
                volume::read_from_sectors(source, params, root_start, i * DIR_ENTRY_SIZE, &mut slot)?;
                let raw = RawDirEntry::from_bytes(&slot);
                if raw.is_end_of_entries() {
                    break;
                }
                if raw.is_deleted() {
                    continue;
                }
                if let Some(entry) = DirectoryEntry::decode(raw) {
                    entries.push(entry);
                }
            }
        }
        DirHandle::Chain(chain) => {
            let slots_per_cluster = params.cluster_size() as usize / DIR_ENTRY_SIZE;
            'scan: for &cluster in chain {
                if cluster < 2 {
                    continue;
                }
                let first_sector = params
                    .first_sector_of_cluster(cluster)
                    .ok_or(FatError::DiskRead)?;
                for i in 0..slots_per_cluster {
                    volume::read_from_sectors(
                        source,
                        params,
                        first_sector,
                        i * DIR_ENTRY_SIZE,
                        &mut slot,
                    )?;
                    let raw = RawDirEntry::from_bytes(&slot);
                    if raw.is_end_of_entries() {
                        break 'scan;
                    }
                    if raw.is_deleted() {
                        continue;
                    }
                    if let Some(entry) = DirectoryEntry::decode(raw) {
                        entries.push(entry);
                    }
                }
            }
        }
    }

    Ok(entries)
}

/// Splits off the first path component at the first separator.
///
/// Without a separator the whole path is the component and the remainder
/// is empty.
pub(crate) fn split_first_component(path: &str) -> (&str, &str) {
    match path.find(SEPARATOR) {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => (path, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dirent::Attributes, testvol::TestVolume};

    #[test]
    fn split_components() {
        assert_eq!(split_first_component(""), ("", ""));
        assert_eq!(split_first_component("A"), ("A", ""));
        assert_eq!(split_first_component("A/B/C"), ("A", "B/C"));
        assert_eq!(split_first_component("/B"), ("", "B"));
    }

    #[test]
    fn root_listing_stops_at_terminator_slot() {
        let mut vol = TestVolume::new();
        for (i, name) in [b"FILE0   ", b"FILE1   ", b"FILE2   ", b"FILE3   "]
            .iter()
            .enumerate()
        {
            vol.set_root_slot(i, &TestVolume::entry(*name, b"TXT", Attributes::ARCHIVE, 0, 0));
        }
        // Slot 4 stays zeroed (end of directory); bytes beyond it must be
        // ignored even when they look like live entries.
        vol.set_root_slot(5, &TestVolume::entry(b"GHOST   ", b"TXT", Attributes::ARCHIVE, 0, 0));

        let entries = list_path(&vol.image(), &vol.params(), "/").unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].name(), "FILE0.TXT");
        assert_eq!(entries[3].name(), "FILE3.TXT");
    }

    #[test]
    fn deleted_slots_never_appear() {
        let mut vol = TestVolume::new();
        vol.set_root_slot(0, &TestVolume::entry(b"KEEP    ", b"TXT", Attributes::ARCHIVE, 0, 0));
        let mut gone = TestVolume::entry(b"GONE    ", b"TXT", Attributes::ARCHIVE, 0, 0);
        gone[0] = 0xE5;
        vol.set_root_slot(1, &gone);
        vol.set_root_slot(2, &TestVolume::entry(b"ALSO    ", b"TXT", Attributes::ARCHIVE, 0, 0));

        let entries = list_path(&vol.image(), &vol.params(), "").unwrap();
        let names: Vec<&str> = entries.iter().map(DirectoryEntry::name).collect();
        assert_eq!(names, ["KEEP.TXT", "ALSO.TXT"]);
    }

    #[test]
    fn long_name_fragments_are_skipped() {
        let mut vol = TestVolume::new();
        vol.set_root_slot(0, &TestVolume::entry(b"AFRAG   ", b"   ", Attributes::LONG_NAME, 0, 0));
        vol.set_root_slot(1, &TestVolume::entry(b"REAL    ", b"BIN", Attributes::ARCHIVE, 0, 9));

        let entries = list_path(&vol.image(), &vol.params(), "/").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "REAL.BIN");
    }

    #[test]
    fn listing_is_idempotent() {
        let mut vol = TestVolume::new();
        vol.set_root_slot(0, &TestVolume::entry(b"A       ", b"   ", Attributes::ARCHIVE, 0, 0));
        vol.set_root_slot(1, &TestVolume::entry(b"B       ", b"   ", Attributes::ARCHIVE, 0, 0));
        let image = vol.image();
        let params = vol.params();
        let first = list_path(&image, &params, "/").unwrap();
        let second = list_path(&image, &params, "/").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn subdirectory_terminator_stops_the_whole_chain() {
        let mut vol = TestVolume::new();
        vol.set_root_slot(
            0,
            &TestVolume::entry(b"SUB     ", b"   ", Attributes::DIRECTORY, 2, 0),
        );
        vol.link_chain(&[2, 3]);
        // Cluster 2: one live entry, then the terminator.
        vol.set_cluster_slot(2, 0, &TestVolume::entry(b"INSIDE  ", b"TXT", Attributes::ARCHIVE, 0, 1));
        // Cluster 3 holds stale records that must never be scanned.
        vol.set_cluster_slot(3, 0, &TestVolume::entry(b"STALE   ", b"TXT", Attributes::ARCHIVE, 0, 1));

        let entries = list_path(&vol.image(), &vol.params(), "/SUB").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "INSIDE.TXT");
    }

    #[test]
    fn nested_resolution_descends_component_by_component() {
        let mut vol = TestVolume::new();
        vol.set_root_slot(
            0,
            &TestVolume::entry(b"OUTER   ", b"   ", Attributes::DIRECTORY, 2, 0),
        );
        vol.link_chain(&[2]);
        vol.set_cluster_slot(
            2,
            0,
            &TestVolume::entry(b"INNER   ", b"   ", Attributes::DIRECTORY, 3, 0),
        );
        vol.link_chain(&[3]);
        vol.set_cluster_slot(3, 0, &TestVolume::entry(b"LEAF    ", b"DAT", Attributes::ARCHIVE, 0, 5));

        let entries = list_path(&vol.image(), &vol.params(), "/OUTER/INNER").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "LEAF.DAT");
    }

    #[test]
    fn resolving_through_a_file_fails() {
        let mut vol = TestVolume::new();
        vol.set_root_slot(0, &TestVolume::entry(b"PLAIN   ", b"TXT", Attributes::ARCHIVE, 2, 4));
        assert_eq!(
            list_path(&vol.image(), &vol.params(), "/PLAIN.TXT"),
            Err(FatError::NotADirectory)
        );
    }

    #[test]
    fn unknown_component_fails() {
        let vol = TestVolume::new();
        assert_eq!(
            list_path(&vol.image(), &vol.params(), "/NOWHERE"),
            Err(FatError::PathNotFound)
        );
    }
}
