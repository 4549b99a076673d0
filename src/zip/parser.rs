//! Low-level readers for the three ZIP records.
//!
//! ZIP archives are read from the end:
//! 1. Find the End of Central Directory Record (EOCDR) at the buffer's tail
//! 2. Walk the Central Directory it points at, one entry per member
//! 3. Follow each entry's offset to its Local File Header, which in turn
//!    locates the member's compressed data
//!
//! Every reader here takes the whole source buffer plus an offset and
//! returns a record whose variable-length fields are spans borrowing from
//! that buffer. Nothing is copied and nothing is read before its bounds
//! have been checked.

use super::bytes::SliceReader;
use super::error::ZipError;
use super::structures::{CentralFileHeader, Eocdr, LocalFileHeader};

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This bounds the backward search for the EOCDR.
const MAX_COMMENT_SIZE: usize = 65535;

/// Find and parse the End of Central Directory Record.
///
/// The EOCDR sits at the very end of the archive, but its trailing comment
/// has a variable length, so the record is found by scanning backward. The
/// comment can contain arbitrary bytes, including forged `PK\x05\x06`
/// signatures, so a signature match alone is not enough: a candidate is
/// accepted only if its own `comment_len` field equals the number of bytes
/// that actually follow it. The scan tries comment lengths in increasing
/// order from 0, so the candidate closest to the end of the buffer wins.
///
/// # Errors
///
/// [`ZipError::EocdrNotFound`] if no candidate within the 65536-byte search
/// window is accepted; the buffer is not a ZIP archive.
pub fn find_eocdr(src: &[u8]) -> Result<Eocdr<'_>, ZipError> {
    for comment_len in 0..=MAX_COMMENT_SIZE {
        let Some(start) = src.len().checked_sub(Eocdr::BASE_SIZE + comment_len) else {
            break;
        };

        if &src[start..start + 4] != Eocdr::SIGNATURE {
            continue;
        }

        let mut r = SliceReader::new(src, start + 4);
        let disk_nbr = r.read_u16()?;
        let cd_start_disk = r.read_u16()?;
        let disk_cd_entries = r.read_u16()?;
        let cd_entries = r.read_u16()?;
        let cd_size = r.read_u32()?;
        let cd_offset = r.read_u32()?;
        let rec_comment_len = r.read_u16()?;

        // A forged signature inside some other record's comment will
        // declare a comment length that disagrees with its position.
        if usize::from(rec_comment_len) != comment_len {
            continue;
        }

        let comment = &src[r.position()..];
        return Ok(Eocdr {
            disk_nbr,
            cd_start_disk,
            disk_cd_entries,
            cd_entries,
            cd_size,
            cd_offset,
            comment,
        });
    }

    Err(ZipError::EocdrNotFound)
}

/// Check that a record of `base_size` bytes starting at `offset` lies
/// within the buffer and begins with `signature`.
fn check_record(
    src: &[u8],
    offset: usize,
    base_size: usize,
    signature: &[u8],
) -> Result<(), ZipError> {
    if offset > src.len() {
        return Err(ZipError::OffsetOutOfRange {
            offset,
            len: src.len(),
        });
    }
    if src.len() - offset < base_size {
        return Err(ZipError::Truncated(offset));
    }
    if &src[offset..offset + 4] != signature {
        return Err(ZipError::BadSignature(offset));
    }
    Ok(())
}

/// Parse one Central File Header at `offset`.
///
/// Reads the fixed 46-byte record, then takes the declared name, extra and
/// comment fields as spans into `src`. Fails if the record or any of its
/// variable-length fields extends past the buffer.
pub fn read_cfh(src: &[u8], offset: usize) -> Result<CentralFileHeader<'_>, ZipError> {
    check_record(src, offset, CentralFileHeader::BASE_SIZE, CentralFileHeader::SIGNATURE)?;

    let mut r = SliceReader::new(src, offset + 4);
    let made_by_ver = r.read_u16()?;
    let extract_ver = r.read_u16()?;
    let gp_flag = r.read_u16()?;
    let method = r.read_u16()?;
    let mod_time = r.read_u16()?;
    let mod_date = r.read_u16()?;
    let crc32 = r.read_u32()?;
    let comp_size = r.read_u32()?;
    let uncomp_size = r.read_u32()?;
    let name_len = r.read_u16()?;
    let extra_len = r.read_u16()?;
    let comment_len = r.read_u16()?;
    let disk_nbr_start = r.read_u16()?;
    let int_attrs = r.read_u16()?;
    let ext_attrs = r.read_u32()?;
    let lfh_offset = r.read_u32()?;

    let name = r.take(name_len.into())?;
    let extra = r.take(extra_len.into())?;
    let comment = r.take(comment_len.into())?;

    Ok(CentralFileHeader {
        made_by_ver,
        extract_ver,
        gp_flag,
        method,
        mod_time,
        mod_date,
        crc32,
        comp_size,
        uncomp_size,
        disk_nbr_start,
        int_attrs,
        ext_attrs,
        lfh_offset,
        name,
        extra,
        comment,
    })
}

/// Parse one Local File Header at `offset`.
///
/// The offset comes from a Central Directory entry's `lfh_offset` field and
/// is attacker-controlled, so it gets the same bounds treatment as every
/// other input. The returned record's `data_offset` points at the first
/// byte of the member's compressed data.
pub fn read_lfh(src: &[u8], offset: usize) -> Result<LocalFileHeader<'_>, ZipError> {
    check_record(src, offset, LocalFileHeader::BASE_SIZE, LocalFileHeader::SIGNATURE)?;

    let mut r = SliceReader::new(src, offset + 4);
    let extract_ver = r.read_u16()?;
    let gp_flag = r.read_u16()?;
    let method = r.read_u16()?;
    let mod_time = r.read_u16()?;
    let mod_date = r.read_u16()?;
    let crc32 = r.read_u32()?;
    let comp_size = r.read_u32()?;
    let uncomp_size = r.read_u32()?;
    let name_len = r.read_u16()?;
    let extra_len = r.read_u16()?;

    let name = r.take(name_len.into())?;
    let extra = r.take(extra_len.into())?;
    let data_offset = r.position();

    Ok(LocalFileHeader {
        extract_ver,
        gp_flag,
        method,
        mod_time,
        mod_date,
        crc32,
        comp_size,
        uncomp_size,
        name,
        extra,
        data_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal EOCDR with the given entry counts and comment appended.
    fn eocdr_bytes(cd_entries: u16, cd_offset: u32, comment: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(Eocdr::SIGNATURE);
        out.extend_from_slice(&0u16.to_le_bytes()); // disk_nbr
        out.extend_from_slice(&0u16.to_le_bytes()); // cd_start_disk
        out.extend_from_slice(&cd_entries.to_le_bytes());
        out.extend_from_slice(&cd_entries.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // cd_size
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&(comment.len() as u16).to_le_bytes());
        out.extend_from_slice(comment);
        out
    }

    #[test]
    fn finds_eocdr_without_comment() {
        let buf = eocdr_bytes(3, 0x1234, b"");
        let eocdr = find_eocdr(&buf).unwrap();
        assert_eq!(eocdr.cd_entries, 3);
        assert_eq!(eocdr.cd_offset, 0x1234);
        assert_eq!(eocdr.comment, b"");
    }

    #[test]
    fn finds_eocdr_with_comment() {
        let buf = eocdr_bytes(1, 46, b"hello zip");
        let eocdr = find_eocdr(&buf).unwrap();
        assert_eq!(eocdr.cd_entries, 1);
        assert_eq!(eocdr.comment, b"hello zip");
    }

    #[test]
    fn rejects_buffer_one_byte_short_of_record() {
        let buf = eocdr_bytes(0, 0, b"");
        assert_eq!(find_eocdr(&buf[..21]), Err(ZipError::EocdrNotFound));
    }

    #[test]
    fn ignores_forged_signature_inside_comment() {
        // The comment itself starts with an EOCDR signature whose
        // comment_len field (bytes 20-21 of the forgery) is wrong for its
        // position. The scan must skip it and accept the outer record.
        let mut forged = Vec::new();
        forged.extend_from_slice(Eocdr::SIGNATURE);
        forged.extend_from_slice(&[0u8; 16]);
        forged.extend_from_slice(&0x00ffu16.to_le_bytes());
        assert_eq!(forged.len(), 22);

        let buf = eocdr_bytes(7, 99, &forged);
        let eocdr = find_eocdr(&buf).unwrap();
        assert_eq!(eocdr.cd_entries, 7);
        assert_eq!(eocdr.cd_offset, 99);
        assert_eq!(eocdr.comment, &forged[..]);
    }

    #[test]
    fn accepts_forged_candidate_only_with_consistent_comment_len() {
        // A forgery that lies closer to the end of the buffer than the real
        // record and declares a self-consistent comment length is
        // indistinguishable from a real EOCDR, and the scan (searching
        // outward from the end) must pick it first.
        let mut inner = Vec::new();
        inner.extend_from_slice(Eocdr::SIGNATURE);
        inner.extend_from_slice(&[0u8; 16]);
        inner.extend_from_slice(&0u16.to_le_bytes()); // claims no comment
        let buf = eocdr_bytes(7, 99, &inner);

        let eocdr = find_eocdr(&buf).unwrap();
        assert_eq!(eocdr.cd_entries, 0);
    }

    #[test]
    fn cfh_rejects_bad_signature() {
        let buf = [0u8; 64];
        assert_eq!(read_cfh(&buf, 0), Err(ZipError::BadSignature(0)));
    }

    #[test]
    fn cfh_rejects_truncated_fixed_part() {
        let mut buf = Vec::from(CentralFileHeader::SIGNATURE);
        buf.extend_from_slice(&[0u8; 20]);
        assert_eq!(read_cfh(&buf, 0), Err(ZipError::Truncated(0)));
    }

    #[test]
    fn cfh_rejects_variable_fields_past_end() {
        let mut buf = Vec::from(CentralFileHeader::SIGNATURE);
        buf.extend_from_slice(&[0u8; 42]);
        // name_len at record offset 28
        buf[28..30].copy_from_slice(&200u16.to_le_bytes());
        assert!(matches!(read_cfh(&buf, 0), Err(ZipError::Truncated(_))));
    }

    #[test]
    fn cfh_rejects_offset_past_buffer() {
        let buf = [0u8; 8];
        assert_eq!(
            read_cfh(&buf, 100),
            Err(ZipError::OffsetOutOfRange { offset: 100, len: 8 })
        );
    }

    #[test]
    fn lfh_reads_spans_and_data_offset() {
        let mut buf = Vec::from(LocalFileHeader::SIGNATURE);
        buf.extend_from_slice(&[0u8; 22]);
        buf.extend_from_slice(&5u16.to_le_bytes()); // name_len
        buf.extend_from_slice(&2u16.to_le_bytes()); // extra_len
        buf.extend_from_slice(b"a.txt");
        buf.extend_from_slice(&[0xaa, 0xbb]);
        buf.extend_from_slice(b"data!");

        let lfh = read_lfh(&buf, 0).unwrap();
        assert_eq!(lfh.name, b"a.txt");
        assert_eq!(lfh.extra, &[0xaa, 0xbb]);
        assert_eq!(lfh.data_offset, 37);
    }

    #[test]
    fn lfh_rejects_offset_past_buffer() {
        let buf = [0u8; 8];
        assert_eq!(
            read_lfh(&buf, 9),
            Err(ZipError::OffsetOutOfRange { offset: 9, len: 8 })
        );
    }
}
