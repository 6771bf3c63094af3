//! Raw 32-byte directory records and their canonical decoded form.

use crate::{
    bs::DIR_ENTRY_SIZE,
    date::DateTime,
    static_assert,
};
use alloc::string::String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Directory entry attributes.
pub struct Attributes(u8);

impl Attributes {
    /// Read-only attribute.
    pub const READ_ONLY: u8 = 0x01;
    /// Hidden attribute.
    pub const HIDDEN: u8 = 0x02;
    /// System attribute.
    pub const SYSTEM: u8 = 0x04;
    /// Volume label attribute.
    pub const VOLUME_ID: u8 = 0x08;
    /// Directory attribute.
    pub const DIRECTORY: u8 = 0x10;
    /// Archive attribute.
    pub const ARCHIVE: u8 = 0x20;
    /// Long file name fragment marker.
    pub const LONG_NAME: u8 = Self::READ_ONLY | Self::HIDDEN | Self::SYSTEM | Self::VOLUME_ID;

    #[must_use]
    #[inline]
    /// Creates a new attribute set.
    pub const fn new(attributes: u8) -> Self {
        Self(attributes)
    }

    #[must_use]
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is read-only.
    pub const fn is_read_only(&self) -> bool {
        self.0 & Self::READ_ONLY != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is hidden.
    pub const fn is_hidden(&self) -> bool {
        self.0 & Self::HIDDEN != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a system file.
    pub const fn is_system(&self) -> bool {
        self.0 & Self::SYSTEM != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a volume label.
    pub const fn is_volume_id(&self) -> bool {
        self.0 & Self::VOLUME_ID != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is a directory.
    pub const fn is_directory(&self) -> bool {
        self.0 & Self::DIRECTORY != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the entry is archived.
    pub const fn is_archive(&self) -> bool {
        self.0 & Self::ARCHIVE != 0
    }

    #[must_use]
    #[inline]
    /// Returns true if the record is a long-filename fragment.
    ///
    /// The marker is the attribute byte equalling exactly
    /// read-only | hidden | system | volume-label.
    pub const fn is_long_name(&self) -> bool {
        self.0 == Self::LONG_NAME
    }
}

/// One raw directory record, viewed in place over the image bytes.
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct RawDirEntry {
    /// Filename, space padded.
    name: [u8; 8],
    /// Extension, space padded.
    ext: [u8; 3],
    /// File attributes.
    attr: u8,
    /// Reserved for Windows NT.
    nt_res: u8,
    /// Creation time, sub-two-second fraction.
    creation_time_frac: u8,
    /// Creation time.
    creation_time: u16,
    /// Creation date.
    creation_date: u16,
    /// Last access date (no time field exists).
    last_access_date: u16,
    /// High word of the first cluster; meaningful on FAT32 only.
    first_cluster_high: u16,
    /// Last modification time.
    write_time: u16,
    /// Last modification date.
    write_date: u16,
    /// Low word of the first cluster.
    first_cluster_low: u16,
    /// File size in bytes.
    file_size: u32,
}
static_assert!(
    size_of::<RawDirEntry>() == DIR_ENTRY_SIZE,
    "RawDirEntry size is not 32 bytes"
);
static_assert!(align_of::<RawDirEntry>() == 1);

impl RawDirEntry {
    /// Deleted entry marker (first name byte).
    pub const DELETED_ENTRY: u8 = 0xE5;
    /// End of directory marker (first name byte).
    pub const END_OF_ENTRIES: u8 = 0x00;

    #[must_use]
    /// Reinterprets a 32-byte slot as a raw entry, in place.
    pub(crate) fn from_bytes(bytes: &[u8; DIR_ENTRY_SIZE]) -> &Self {
        // RawDirEntry has alignment 1, so any byte pointer is valid.
        unsafe { &*bytes.as_ptr().cast::<Self>() }
    }

    #[must_use]
    #[inline]
    /// Returns true if this slot marks the end of the directory.
    ///
    /// Terminator and deleted-slot checks belong to the scanning caller;
    /// the decoder itself never sees such slots.
    pub const fn is_end_of_entries(&self) -> bool {
        self.name[0] == Self::END_OF_ENTRIES
    }

    #[must_use]
    #[inline]
    /// Returns true if this slot holds a deleted entry.
    pub const fn is_deleted(&self) -> bool {
        self.name[0] == Self::DELETED_ENTRY
    }

    #[must_use]
    #[inline]
    pub const fn attributes(&self) -> Attributes {
        Attributes::new(self.attr)
    }

    #[must_use]
    #[inline]
    pub fn file_size(&self) -> u32 {
        u32::from_le(self.file_size)
    }

    #[must_use]
    #[inline]
    /// Returns the low word of the first cluster number.
    pub fn first_cluster_low(&self) -> u16 {
        u16::from_le(self.first_cluster_low)
    }

    #[must_use]
    #[inline]
    pub fn first_cluster_high(&self) -> u16 {
        u16::from_le(self.first_cluster_high)
    }

    #[must_use]
    /// Assembles the canonical `NAME.EXT` form.
    ///
    /// The 8 name bytes stop at the first space; the extension is appended
    /// after a dot only when its first byte is not a space.
    pub fn canonical_name(&self) -> String {
        let mut name = String::with_capacity(12);
        for &b in &self.name {
            if b == b' ' {
                break;
            }
            name.push(char::from(b));
        }
        if self.ext[0] != b' ' {
            name.push('.');
            for &b in &self.ext {
                if b == b' ' {
                    break;
                }
                name.push(char::from(b));
            }
        }
        name
    }
}

/// Filesystem-specific payload of a canonical entry.
///
/// Tagged by filesystem variant so future layouts add a case instead of
/// widening a shared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPayload {
    /// FAT12 keeps only the low word of the start cluster.
    Fat12 { first_cluster: u16 },
}

impl EntryPayload {
    #[must_use]
    #[inline]
    pub const fn first_cluster(&self) -> u16 {
        match self {
            Self::Fat12 { first_cluster } => *first_cluster,
        }
    }
}

/// A decoded directory entry in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    name: String,
    size: u32,
    attributes: Attributes,
    created: DateTime,
    accessed: DateTime,
    modified: DateTime,
    payload: EntryPayload,
}

impl DirectoryEntry {
    #[must_use]
    /// Decodes one raw record into its canonical form.
    ///
    /// Returns `None` for long-filename fragments, which are detected and
    /// skipped, never reconstructed.
    pub fn decode(raw: &RawDirEntry) -> Option<Self> {
        if raw.attributes().is_long_name() {
            return None;
        }

        // The high word is FAT32-only; on this variant it must be zero.
        debug_assert_eq!(raw.first_cluster_high(), 0);

        Some(Self {
            name: raw.canonical_name(),
            size: raw.file_size(),
            attributes: raw.attributes(),
            created: DateTime::decode(
                u16::from_le(raw.creation_date),
                u16::from_le(raw.creation_time),
            ),
            accessed: DateTime::decode_date_only(u16::from_le(raw.last_access_date)),
            modified: DateTime::decode(u16::from_le(raw.write_date), u16::from_le(raw.write_time)),
            payload: EntryPayload::Fat12 {
                first_cluster: raw.first_cluster_low(),
            },
        })
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    /// Returns the file size in bytes.
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    #[inline]
    pub const fn attributes(&self) -> Attributes {
        self.attributes
    }

    #[must_use]
    #[inline]
    pub const fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }

    #[must_use]
    #[inline]
    pub const fn created(&self) -> DateTime {
        self.created
    }

    #[must_use]
    #[inline]
    pub const fn accessed(&self) -> DateTime {
        self.accessed
    }

    #[must_use]
    #[inline]
    pub const fn modified(&self) -> DateTime {
        self.modified
    }

    #[must_use]
    #[inline]
    pub const fn payload(&self) -> EntryPayload {
        self.payload
    }

    #[must_use]
    #[inline]
    /// Returns the first cluster of the entry's data.
    pub const fn first_cluster(&self) -> u16 {
        self.payload.first_cluster()
    }
}
