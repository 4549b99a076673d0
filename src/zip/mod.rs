//! ZIP archive parsing and extraction.
//!
//! This module reads ZIP archives from fully resident byte buffers. The
//! parsing core never copies and never decompresses: it locates and
//! validates structures, exposing members as borrowed views into the
//! caller's buffer.
//!
//! ## Architecture
//!
//! - [`bytes`]: bounds-checked little-endian extraction, the one primitive
//!   everything else reads through
//! - [`structures`]: the three ZIP records (EOCDR, Central File Header,
//!   Local File Header) and related constants
//! - [`parser`]: locating and parsing those records in a buffer
//! - [`dostime`]: the packed DOS date/time codec
//! - [`archive`]: the validated archive handle and member iteration
//! - [`extractor`]: Store/Deflate decoding with size and CRC verification
//!
//! ## ZIP format overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each member
//! 2. A Central Directory with metadata for all members
//! 3. An End of Central Directory Record (EOCDR) at the very end
//!
//! The archive is read from the end: the EOCDR is found by a backward scan
//! (its variable-length comment means its position is ambiguous), then the
//! Central Directory it points at is walked and every entry is validated
//! against its Local File Header before any member is exposed.
//!
//! ## Supported features
//!
//! - Standard single-volume ZIP archives (PKZIP APPNOTE 6.3.x layout)
//! - STORED (no compression) and DEFLATE methods
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-volume archive support
//! - No ZIP64 extensions
//! - No archive writing

mod archive;
mod bytes;
mod dostime;
mod error;
mod extractor;
mod parser;
mod structures;

pub use archive::{Archive, Member, MemberCursor, Members};
pub use dostime::DosDateTime;
pub use error::ZipError;
pub use extractor::{extract_to_file, extract_to_memory, extract_to_stdout};
pub use parser::{find_eocdr, read_cfh, read_lfh};
pub use structures::*;
