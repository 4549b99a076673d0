//! Archive handle and member iteration.
//!
//! [`Archive::open`] validates the whole archive up front: the EOCDR, every
//! Central Directory entry, every paired Local File Header, and every
//! compressed-data span. Opening is all-or-nothing; no partially valid
//! archive is ever exposed, so iteration over an opened archive cannot
//! run out of bounds.
//!
//! Members are dereferenced lazily through an opaque [`MemberCursor`].
//! Each dereference recomputes the [`Member`] view from the buffer; nothing
//! is cached, so repeated dereferences of the same cursor are idempotent as
//! long as the buffer is left untouched.

use std::borrow::Cow;

use chrono::NaiveDateTime;

use super::dostime::DosDateTime;
use super::error::ZipError;
use super::parser::{find_eocdr, read_cfh, read_lfh};
use super::structures::{
    CentralFileHeader, CompressionMethod, GP_FLAG_ENCRYPTED, LocalFileHeader,
};

/// Opaque cursor into the Central Directory.
///
/// Valid cursors lie in `[Archive::begin, Archive::end)` and are only
/// obtained from [`Archive::begin`] or from a dereferenced member's `next`
/// field; the step from one entry to the next depends on that entry's own
/// variable-length fields and cannot be computed externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberCursor(usize);

/// A parsed, validated ZIP archive over a borrowed byte buffer.
///
/// The handle owns no data; it and every [`Member`] view derived from it
/// borrow the caller's buffer and are valid only as long as the buffer is.
/// The buffer must be treated as immutable for the lifetime of the handle.
#[derive(Debug)]
pub struct Archive<'a> {
    src: &'a [u8],
    num_members: u16,
    comment: &'a [u8],
    members_begin: MemberCursor,
    members_end: MemberCursor,
}

/// One archive member, materialized from a cursor dereference.
///
/// All spans borrow from the archive's buffer. The compressed data is
/// located but not decoded; decoding lives in the extractor layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member<'a> {
    /// Member name (raw bytes, not NUL terminated, no encoding assumed).
    pub name: &'a [u8],
    /// Modification time, when the stored DOS timestamp names a real date.
    pub mtime: Option<NaiveDateTime>,
    /// Compressed size in bytes.
    pub comp_size: u32,
    /// The compressed data itself.
    pub comp_data: &'a [u8],
    /// Compression method (Store or Deflate after validation).
    pub method: CompressionMethod,
    /// Uncompressed size in bytes.
    pub uncomp_size: u32,
    /// CRC-32 of the uncompressed data.
    pub crc32: u32,
    /// Member comment (raw bytes).
    pub comment: &'a [u8],
    /// Whether this member is a directory.
    pub is_dir: bool,
    /// Cursor of the member after this one.
    pub next: MemberCursor,
}

impl Member<'_> {
    /// The member name as UTF-8, with invalid sequences replaced.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name)
    }
}

/// Per-entry invariants checked at open time.
fn validate_entry(cfh: &CentralFileHeader<'_>) -> Result<(), ZipError> {
    if cfh.gp_flag & GP_FLAG_ENCRYPTED != 0 {
        return Err(ZipError::Encrypted);
    }
    match CompressionMethod::from_u16(cfh.method) {
        CompressionMethod::Stored => {
            if cfh.uncomp_size != cfh.comp_size {
                return Err(ZipError::Inconsistent(
                    "stored member sizes disagree",
                ));
            }
        }
        CompressionMethod::Deflate => {}
        CompressionMethod::Unknown(v) => return Err(ZipError::UnsupportedMethod(v)),
    }
    if cfh.disk_nbr_start != 0 {
        return Err(ZipError::MultiVolume);
    }
    if cfh.name.contains(&0) {
        return Err(ZipError::Inconsistent("file name contains NUL"));
    }
    Ok(())
}

/// Check that the compressed-data span located by `lfh` fits in `src`.
fn check_data_span(
    src: &[u8],
    lfh: &LocalFileHeader<'_>,
    comp_size: u32,
) -> Result<(), ZipError> {
    match lfh.data_offset.checked_add(comp_size as usize) {
        Some(end) if end <= src.len() => Ok(()),
        _ => Err(ZipError::OffsetOutOfRange {
            offset: lfh.data_offset,
            len: src.len(),
        }),
    }
}

impl<'a> Archive<'a> {
    /// Open and fully validate a ZIP archive held in `src`.
    ///
    /// Walks the Central Directory once, checking every entry and its
    /// paired Local File Header before anything is exposed. On success the
    /// returned handle's iteration range is internally consistent and
    /// dereferencing any in-range cursor cannot fail.
    ///
    /// # Errors
    ///
    /// Any [`ZipError`]; see the error type for the taxonomy. No partial
    /// archive is exposed on failure.
    pub fn open(src: &'a [u8]) -> Result<Self, ZipError> {
        let eocdr = find_eocdr(src)?;
        eocdr.check_single_volume()?;

        let mut offset = eocdr.cd_offset as usize;
        let members_begin = MemberCursor(offset);

        for _ in 0..eocdr.cd_entries {
            let cfh = read_cfh(src, offset)?;
            validate_entry(&cfh)?;

            let lfh = read_lfh(src, cfh.lfh_offset as usize)?;
            check_data_span(src, &lfh, cfh.comp_size)?;

            offset += cfh.entry_size();
        }

        Ok(Self {
            src,
            num_members: eocdr.cd_entries,
            comment: eocdr.comment,
            members_begin,
            members_end: MemberCursor(offset),
        })
    }

    /// Number of members in the archive.
    pub fn member_count(&self) -> usize {
        usize::from(self.num_members)
    }

    /// Whether the archive has no members.
    pub fn is_empty(&self) -> bool {
        self.num_members == 0
    }

    /// The archive comment (raw bytes; empty when absent).
    pub fn comment(&self) -> &'a [u8] {
        self.comment
    }

    /// Cursor of the first member.
    pub fn begin(&self) -> MemberCursor {
        self.members_begin
    }

    /// Cursor one past the last member.
    pub fn end(&self) -> MemberCursor {
        self.members_end
    }

    /// Dereference `cursor` into a [`Member`] view.
    ///
    /// The view is recomputed from the buffer on every call. `cursor` must
    /// lie in `[begin, end)` and have been produced by [`Archive::begin`]
    /// or a previous member's `next` field; anything else is a programming
    /// error and panics.
    pub fn member(&self, cursor: MemberCursor) -> Member<'a> {
        assert!(
            self.members_begin <= cursor && cursor < self.members_end,
            "member cursor out of range"
        );

        // Both reads were validated during open, so they cannot fail here.
        let Ok(cfh) = read_cfh(self.src, cursor.0) else {
            unreachable!("central directory entry validated at open");
        };
        let Ok(lfh) = read_lfh(self.src, cfh.lfh_offset as usize) else {
            unreachable!("local file header validated at open");
        };

        let comp_data = &self.src[lfh.data_offset..lfh.data_offset + cfh.comp_size as usize];

        Member {
            name: cfh.name,
            mtime: DosDateTime::new(cfh.mod_date, cfh.mod_time).to_civil(),
            comp_size: cfh.comp_size,
            comp_data,
            method: CompressionMethod::from_u16(cfh.method),
            uncomp_size: cfh.uncomp_size,
            crc32: cfh.crc32,
            comment: cfh.comment,
            is_dir: cfh.is_dir(),
            next: MemberCursor(cursor.0 + cfh.entry_size()),
        }
    }

    /// Iterate over all members from begin to end.
    pub fn members(&self) -> Members<'_, 'a> {
        Members {
            archive: self,
            cursor: self.members_begin,
        }
    }
}

/// Iterator over an archive's members.
pub struct Members<'s, 'a> {
    archive: &'s Archive<'a>,
    cursor: MemberCursor,
}

impl<'a> Iterator for Members<'_, 'a> {
    type Item = Member<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == self.archive.members_end {
            return None;
        }
        let member = self.archive.member(self.cursor);
        self.cursor = member.next;
        Some(member)
    }
}
