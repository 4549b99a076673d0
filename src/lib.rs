//! # zipls
//!
//! A ZIP archive parser, lister and extractor operating on in-memory
//! buffers.
//!
//! The core is a read-only parser over a caller-owned byte buffer: it
//! locates the End of Central Directory Record, walks the Central
//! Directory, cross-validates every entry against its Local File Header,
//! and exposes members as borrowed views. All validation happens up front
//! when the archive is opened; iteration afterwards cannot fail. Decoding
//! of member data (Store and Deflate) is a separate layer on top.
//!
//! ## Features
//!
//! - Tolerates adversarial and truncated input: every offset is
//!   bounds-checked before any byte is read
//! - Resolves the ambiguous EOCDR position (comments may contain forged
//!   signatures) the way the format requires
//! - Zero-copy: archive handle and member views borrow the input buffer
//! - STORED and DEFLATE member decoding with size and CRC-32 verification
//!
//! ## Example
//!
//! ```no_run
//! use zipls::Archive;
//!
//! fn main() -> anyhow::Result<()> {
//!     let data = std::fs::read("archive.zip")?;
//!     let archive = Archive::open(&data)?;
//!
//!     for member in archive.members() {
//!         println!("{}", member.name_lossy());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod zip;

pub use cli::Cli;
pub use zip::{
    Archive, CompressionMethod, DosDateTime, Member, MemberCursor, Members, ZipError,
};
