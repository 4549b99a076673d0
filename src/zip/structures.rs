use super::error::ZipError;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// General-purpose flag bit 0: the member is encrypted.
pub const GP_FLAG_ENCRYPTED: u16 = 1 << 0;

/// External attribute bit 4: the member is a directory.
pub const EXT_ATTR_DIR: u32 = 1 << 4;
/// External attribute bit 5: the archive bit (recognized, otherwise unused).
pub const EXT_ATTR_ARC: u32 = 1 << 5;

/// End of Central Directory Record - 22 bytes plus trailing comment.
///
/// Transient: used only while opening an archive. The comment span borrows
/// from the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eocdr<'a> {
    /// Number of this disk.
    pub disk_nbr: u16,
    /// Number of the disk with the start of the Central Directory.
    pub cd_start_disk: u16,
    /// Number of Central Directory entries on this disk.
    pub disk_cd_entries: u16,
    /// Total number of Central Directory entries.
    pub cd_entries: u16,
    /// Central Directory size in bytes.
    pub cd_size: u32,
    /// Central Directory start offset.
    pub cd_offset: u32,
    /// Archive comment (not NUL terminated).
    pub comment: &'a [u8],
}

impl Eocdr<'_> {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const BASE_SIZE: usize = 22;

    /// Reject archives that span multiple volumes.
    pub fn check_single_volume(&self) -> Result<(), ZipError> {
        if self.disk_nbr != 0
            || self.cd_start_disk != 0
            || self.disk_cd_entries != self.cd_entries
        {
            return Err(ZipError::MultiVolume);
        }
        Ok(())
    }
}

/// Central File Header (Central Directory entry) - 46 bytes plus
/// name, extra and comment.
///
/// Transient: re-derived from the buffer on every member dereference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralFileHeader<'a> {
    pub made_by_ver: u16,
    pub extract_ver: u16,
    pub gp_flag: u16,
    pub method: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub comp_size: u32,
    pub uncomp_size: u32,
    pub disk_nbr_start: u16,
    pub int_attrs: u16,
    pub ext_attrs: u32,
    /// Offset of the paired Local File Header.
    pub lfh_offset: u32,
    pub name: &'a [u8],
    pub extra: &'a [u8],
    pub comment: &'a [u8],
}

impl CentralFileHeader<'_> {
    pub const SIGNATURE: &'static [u8] = b"PK\x01\x02";
    pub const BASE_SIZE: usize = 46;

    /// Total on-disk size of this entry, fixed part plus variable fields.
    pub fn entry_size(&self) -> usize {
        Self::BASE_SIZE + self.name.len() + self.extra.len() + self.comment.len()
    }

    /// Directory entries are marked by external attribute bit 4.
    pub fn is_dir(&self) -> bool {
        self.ext_attrs & EXT_ATTR_DIR != 0
    }
}

/// Local File Header - 30 bytes plus name and extra.
///
/// Only used to locate where a member's compressed data begins; its fields
/// are not cross-checked against the Central File Header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileHeader<'a> {
    pub extract_ver: u16,
    pub gp_flag: u16,
    pub method: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub comp_size: u32,
    pub uncomp_size: u32,
    pub name: &'a [u8],
    pub extra: &'a [u8],
    /// Offset of the first byte of compressed data (end of the extra field).
    pub data_offset: usize,
}

impl LocalFileHeader<'_> {
    pub const SIGNATURE: &'static [u8] = b"PK\x03\x04";
    pub const BASE_SIZE: usize = 30;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_method_codes() {
        assert_eq!(CompressionMethod::from_u16(0), CompressionMethod::Stored);
        assert_eq!(CompressionMethod::from_u16(8), CompressionMethod::Deflate);
        assert_eq!(
            CompressionMethod::from_u16(12),
            CompressionMethod::Unknown(12)
        );
        assert_eq!(CompressionMethod::Deflate.as_u16(), 8);
    }

    #[test]
    fn single_volume_check() {
        let eocdr = Eocdr {
            disk_nbr: 0,
            cd_start_disk: 0,
            disk_cd_entries: 3,
            cd_entries: 3,
            cd_size: 0,
            cd_offset: 0,
            comment: b"",
        };
        assert!(eocdr.check_single_volume().is_ok());

        let spanned = Eocdr {
            disk_nbr: 1,
            ..eocdr.clone()
        };
        assert_eq!(spanned.check_single_volume(), Err(ZipError::MultiVolume));

        let mismatched = Eocdr {
            disk_cd_entries: 2,
            ..eocdr
        };
        assert_eq!(mismatched.check_single_volume(), Err(ZipError::MultiVolume));
    }
}
