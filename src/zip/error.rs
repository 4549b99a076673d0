//! Error type for the ZIP parsing core.
//!
//! Every parsing step reports one of these kinds. The archive open pipeline
//! is all-or-nothing: any error here means no archive handle is produced.

/// Why a buffer could not be parsed as a ZIP archive.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipError {
    /// No End of Central Directory Record within the 65536-byte search
    /// window at the end of the buffer. The buffer is not a ZIP archive.
    #[error("end of central directory record not found")]
    EocdrNotFound,

    /// A fixed record or a declared variable-length field extends past the
    /// end of the buffer.
    #[error("truncated record at offset {0}")]
    Truncated(usize),

    /// The expected magic bytes are absent at the given offset.
    #[error("bad record signature at offset {0}")]
    BadSignature(usize),

    /// The archive spans multiple volumes.
    #[error("multi-volume archives are not supported")]
    MultiVolume,

    /// A member has general-purpose flag bit 0 set.
    #[error("encrypted members are not supported")]
    Encrypted,

    /// A member uses a compression method other than Store or Deflate.
    #[error("unsupported compression method {0}")]
    UnsupportedMethod(u16),

    /// Declared fields disagree with a structural invariant.
    #[error("inconsistent entry: {0}")]
    Inconsistent(&'static str),

    /// A Local File Header offset or a computed data span does not fit
    /// within the buffer.
    #[error("offset {offset} out of range for {len}-byte buffer")]
    OffsetOutOfRange { offset: usize, len: usize },
}
