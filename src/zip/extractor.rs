//! Member data decoding.
//!
//! The parsing core only locates compressed data; decoding it lives here.
//! Store members are copied, Deflate members are inflated with `flate2`,
//! and the result is checked against the declared uncompressed size and
//! CRC-32 before it is handed out.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use flate2::Crc;
use flate2::read::DeflateDecoder;

use super::archive::Member;
use super::structures::CompressionMethod;

/// Decode a member's data into memory.
///
/// # Errors
///
/// Fails when inflation fails, when the decoded length differs from the
/// member's declared uncompressed size, or when the CRC-32 of the decoded
/// bytes differs from the declared checksum.
pub fn extract_to_memory(member: &Member<'_>) -> Result<Vec<u8>> {
    let data = match member.method {
        CompressionMethod::Stored => member.comp_data.to_vec(),
        CompressionMethod::Deflate => {
            let mut out = Vec::with_capacity(member.uncomp_size as usize);
            DeflateDecoder::new(member.comp_data)
                .read_to_end(&mut out)
                .with_context(|| format!("inflating {}", member.name_lossy()))?;
            out
        }
        CompressionMethod::Unknown(v) => {
            // Unreachable for members of an opened archive; kept for
            // callers constructing Member values by hand.
            bail!("unsupported compression method: {v}");
        }
    };

    ensure!(
        data.len() == member.uncomp_size as usize,
        "{}: decoded {} bytes, expected {}",
        member.name_lossy(),
        data.len(),
        member.uncomp_size
    );

    let mut crc = Crc::new();
    crc.update(&data);
    ensure!(
        crc.sum() == member.crc32,
        "{}: CRC-32 mismatch (got {:#010x}, expected {:#010x})",
        member.name_lossy(),
        crc.sum(),
        member.crc32
    );

    Ok(data)
}

/// Decode a member and write it to `output_path`, creating parent
/// directories as needed.
pub fn extract_to_file(member: &Member<'_>, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let data = extract_to_memory(member)?;
    std::fs::write(output_path, data)
        .with_context(|| format!("writing {}", output_path.display()))?;

    Ok(())
}

/// Decode a member and write it to stdout.
pub fn extract_to_stdout(member: &Member<'_>) -> Result<()> {
    use std::io::Write;

    let data = extract_to_memory(member)?;
    std::io::stdout().write_all(&data)?;

    Ok(())
}
