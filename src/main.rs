//! Main entry point for the zipls CLI.
//!
//! Reads a ZIP file into memory, opens it with the parsing core, and either
//! lists its members or extracts them.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Component, Path, PathBuf};

use zipls::zip::{extract_to_file, extract_to_stdout};
use zipls::{Archive, Cli, Member};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data = std::fs::read(&cli.file).with_context(|| format!("reading {}", cli.file))?;
    let archive =
        Archive::open(&data).with_context(|| format!("opening {} as a ZIP archive", cli.file))?;

    if cli.list || cli.verbose {
        list_members(&archive, cli.verbose);
        return Ok(());
    }

    extract_members(&archive, &cli)
}

/// List archive members, either as bare names or as a verbose table.
fn list_members(archive: &Archive<'_>, verbose: bool) {
    if !archive.comment().is_empty() {
        println!("{}\n", String::from_utf8_lossy(archive.comment()));
    }

    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for member in archive.members() {
        if !verbose {
            println!("{}", member.name_lossy());
            continue;
        }

        let (date, time) = match member.mtime {
            Some(t) => (t.format("%Y-%m-%d").to_string(), t.format("%H:%M").to_string()),
            None => ("??".to_string(), "??".to_string()),
        };

        let ratio = ratio_percent(member.comp_size.into(), member.uncomp_size.into());

        println!(
            "{:>10}  {:>10}  {}  {:>10}  {:>5}  {}",
            member.uncomp_size,
            member.comp_size,
            ratio,
            date,
            time,
            member.name_lossy()
        );

        if !member.is_dir {
            total_uncompressed += u64::from(member.uncomp_size);
            total_compressed += u64::from(member.comp_size);
            file_count += 1;
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        let total_ratio = ratio_percent(total_compressed, total_uncompressed);
        println!(
            "{:>10}  {:>10}  {}  {:>21}  {} files",
            total_uncompressed, total_compressed, total_ratio, "", file_count
        );
    }
}

/// Percentage of space saved by compression, negative when the data grew.
///
/// Deflating incompressible data grows it, so `comp > uncomp` occurs in
/// valid archives and the subtraction must be signed.
fn ratio_percent(comp: u64, uncomp: u64) -> String {
    let saved = if uncomp == 0 {
        0
    } else {
        100 - (comp * 100 / uncomp) as i64
    };
    format!("{saved:>4}%")
}

/// Extract all members selected by the CLI filters.
fn extract_members(archive: &Archive<'_>, cli: &Cli) -> Result<()> {
    for member in archive.members() {
        // Directories are created as needed while extracting files.
        if member.is_dir || !selected(&member, cli) {
            continue;
        }
        extract_member(&member, cli)?;
    }
    Ok(())
}

/// Whether a member passes the positional-name and `-x` exclusion filters.
fn selected(member: &Member<'_>, cli: &Cli) -> bool {
    let name = member.name_lossy();

    if !cli.members.is_empty() {
        let matches = cli.members.iter().any(|wanted| {
            let basename = Path::new(name.as_ref())
                .file_name()
                .map(|s| s.to_string_lossy())
                .unwrap_or_default();
            name == *wanted || basename == *wanted
        });
        if !matches {
            return false;
        }
    }

    !cli.exclude.iter().any(|x| name.contains(x.as_str()))
}

/// Extract a single member, honoring pipe mode and overwrite policy.
fn extract_member(member: &Member<'_>, cli: &Cli) -> Result<()> {
    let name = member.name_lossy();

    if cli.pipe {
        return extract_to_stdout(member);
    }

    // A member name with an absolute or parent-directory component would
    // escape the extraction directory.
    let Some(relative) = sanitized_path(name.as_ref()) else {
        if !cli.is_quiet() {
            eprintln!("Skipping: {name} (unsafe path)");
        }
        return Ok(());
    };

    let output_path = match &cli.extract_dir {
        Some(dir) => PathBuf::from(dir).join(relative),
        None => relative,
    };

    if output_path.exists() {
        if cli.never_overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {name} (file exists)");
            }
            return Ok(());
        }
        if !cli.overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {name} (use -o to overwrite)");
            }
            return Ok(());
        }
    }

    if !cli.is_quiet() {
        println!("  extracting: {name}");
    }

    extract_to_file(member, &output_path)
}

/// Accept a member name as a relative output path, or reject it when any
/// component could walk outside the extraction directory.
fn sanitized_path(name: &str) -> Option<PathBuf> {
    let path = Path::new(name);
    if !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    Some(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_signed_for_grown_members() {
        // Deflated incompressible data: 11 compressed bytes for 5 plain.
        assert_eq!(ratio_percent(11, 5), "-120%");
        assert_eq!(ratio_percent(2, 4), "  50%");
        assert_eq!(ratio_percent(5, 5), "   0%");
        assert_eq!(ratio_percent(0, 0), "   0%");
    }

    #[test]
    fn sanitized_path_keeps_relative_names() {
        assert_eq!(
            sanitized_path("sub/a.txt"),
            Some(PathBuf::from("sub/a.txt"))
        );
        assert_eq!(sanitized_path("a.txt"), Some(PathBuf::from("a.txt")));
    }

    #[test]
    fn sanitized_path_rejects_escaping_names() {
        assert_eq!(sanitized_path("../evil"), None);
        assert_eq!(sanitized_path("sub/../../evil"), None);
        assert_eq!(sanitized_path("/etc/passwd"), None);
    }
}
