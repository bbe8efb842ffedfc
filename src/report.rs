//! Console rendering for sweeps and listings.
//!
//! Everything here writes to a caller-supplied writer so the exact output
//! can be checked without a terminal.

use std::io::{self, Write};

use itertools::Itertools;

use crate::{
    janitor::{Inventory, Removal, Sweep, Unreadable, Verdict},
    vars::PROGRAM,
};

pub fn write_sweep<W: Write>(out: &mut W, sweep: &Sweep) -> io::Result<()> {
    writeln!(out, "🧹 Temporary File Cleanup Utility")?;
    writeln!(
        out,
        "   Removing files older than {} days",
        sweep.expiration.num_days()
    )?;
    writeln!(
        out,
        "   Dry run: {}",
        if sweep.dry_run { "Yes" } else { "No" }
    )?;
    writeln!(out)?;

    let action = if sweep.dry_run {
        "Would delete"
    } else {
        "Deleting"
    };
    for dir in &sweep.dirs {
        writeln!(out, "📁 Checking directory: {}", dir.dir.display())?;
        for entry in &dir.entries {
            let record = &entry.record;
            match &entry.verdict {
                Verdict::Stale(removal) => {
                    writeln!(
                        out,
                        "   🗑️  {action}: {} ({:.1} days old, {} bytes)",
                        record.name,
                        record.age_days,
                        group_thousands(record.size)
                    )?;
                    if let Removal::Failed(message) = removal {
                        writeln!(out, "      ❌ Error deleting {}: {message}", record.name)?;
                    }
                }
                Verdict::Keep => writeln!(
                    out,
                    "   📄 Keeping: {} ({:.1} days old)",
                    record.name, record.age_days
                )?,
            }
        }
        write_unreadable(out, &dir.unreadable)?;
    }

    let totals = &sweep.totals;
    let (files_label, size_label) = if sweep.dry_run {
        ("to be cleaned", "to be freed")
    } else {
        ("cleaned", "freed")
    };
    writeln!(out)?;
    writeln!(out, "📊 Summary:")?;
    writeln!(out, "   Total files found: {}", totals.total_files)?;
    writeln!(out, "   Total size: {}", bytes_with_kib(totals.total_bytes))?;
    writeln!(out, "   Files {files_label}: {}", totals.stale_files)?;
    writeln!(
        out,
        "   Size {size_label}: {}",
        bytes_with_kib(totals.stale_bytes)
    )?;
    if totals.failed_files > 0 {
        writeln!(out, "   Failed deletions: {}", totals.failed_files)?;
    }

    if sweep.dry_run && totals.stale_files > 0 {
        writeln!(out)?;
        writeln!(out, "💡 To actually delete these files, run:")?;
        writeln!(out, "   {PROGRAM} --execute")?;
    }

    Ok(())
}

pub fn write_inventory<W: Write>(out: &mut W, inventory: &Inventory) -> io::Result<()> {
    writeln!(out, "📋 Current Temporary Files:")?;
    writeln!(out)?;

    for listing in &inventory.dirs {
        writeln!(out, "📁 {}:", listing.dir.display())?;
        for record in &listing.records {
            writeln!(
                out,
                "   📄 {} ({:.1} days, {} bytes)",
                record.name,
                record.age_days,
                group_thousands(record.size)
            )?;
        }
        if listing.records.is_empty() {
            writeln!(out, "   (empty)")?;
        }
        write_unreadable(out, &listing.unreadable)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "📊 Total: {} files, {}",
        inventory.total_files,
        bytes_with_kib(inventory.total_bytes)
    )
}

pub fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "🧹 Temporary File Cleanup Utility")?;
    writeln!(out)?;
    writeln!(out, "Usage:")?;
    writeln!(
        out,
        "  {PROGRAM}           # Dry run (show what would be deleted)"
    )?;
    writeln!(out, "  {PROGRAM} --execute # Actually delete old files")?;
    writeln!(out, "  {PROGRAM} --list    # List all temporary files")?;
    writeln!(out, "  {PROGRAM} --help    # Show this help")
}

pub fn write_unknown_option<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "❌ Unknown option. Use --help for usage information.")
}

fn write_unreadable<W: Write>(out: &mut W, unreadable: &[Unreadable]) -> io::Result<()> {
    for skipped in unreadable {
        writeln!(
            out,
            "   ⚠️  Skipped unreadable directory: {} ({})",
            skipped.path.display(),
            skipped.message
        )?;
    }

    Ok(())
}

// 1234567 -> "1,234,567"
fn group_thousands(n: u64) -> String {
    n.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .join(",")
}

fn bytes_with_kib(bytes: u64) -> String {
    format!(
        "{} bytes ({:.1} KB)",
        group_thousands(bytes),
        bytes as f64 / 1024.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::janitor::{DirListing, DirSweep, Entry, FileRecord, Totals};
    use chrono::{TimeDelta, Utc};
    use std::path::PathBuf;

    fn record(name: &str, size: u64, age_days: f64) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            size,
            modified: Utc::now(),
            age_days,
            path: PathBuf::from("/proj/scripts/temp").join(name),
        }
    }

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sweep(dry_run: bool, removal: Removal) -> Sweep {
        let entries = vec![
            Entry {
                record: record("a.txt", 100, 40.0),
                verdict: Verdict::Stale(removal),
            },
            Entry {
                record: record("b.txt", 50, 5.0),
                verdict: Verdict::Keep,
            },
        ];
        let mut totals = Totals {
            total_files: 2,
            total_bytes: 150,
            stale_files: 1,
            stale_bytes: 100,
            failed_files: 0,
        };
        if matches!(entries[0].verdict, Verdict::Stale(Removal::Failed(_))) {
            totals.failed_files = 1;
        }

        Sweep {
            dry_run,
            expiration: TimeDelta::days(30),
            dirs: vec![DirSweep {
                dir: PathBuf::from("/proj/scripts/temp"),
                entries,
                unreadable: vec![],
            }],
            totals,
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(bytes_with_kib(1536), "1,536 bytes (1.5 KB)");
    }

    #[test]
    fn test_dry_run() {
        let output = render(|out| write_sweep(out, &sweep(true, Removal::Retained)));
        assert_eq!(
            output,
            "🧹 Temporary File Cleanup Utility
   Removing files older than 30 days
   Dry run: Yes

📁 Checking directory: /proj/scripts/temp
   🗑️  Would delete: a.txt (40.0 days old, 100 bytes)
   📄 Keeping: b.txt (5.0 days old)

📊 Summary:
   Total files found: 2
   Total size: 150 bytes (0.1 KB)
   Files to be cleaned: 1
   Size to be freed: 100 bytes (0.1 KB)

💡 To actually delete these files, run:
   tempsweep --execute
"
        );
    }

    #[test]
    fn test_execute() {
        let output = render(|out| write_sweep(out, &sweep(false, Removal::Deleted)));
        assert!(output.contains("   Dry run: No\n"));
        assert!(output.contains("   🗑️  Deleting: a.txt (40.0 days old, 100 bytes)\n"));
        assert!(output.contains("   Files cleaned: 1\n"));
        assert!(output.contains("   Size freed: 100 bytes (0.1 KB)\n"));
        assert!(!output.contains("Failed deletions"));
        assert!(!output.contains("--execute"));
    }

    #[test]
    fn test_execute_failure() {
        let failed = Removal::Failed("Permission denied (os error 13)".to_string());
        let output = render(|out| write_sweep(out, &sweep(false, failed)));
        assert!(output.contains(
            "   🗑️  Deleting: a.txt (40.0 days old, 100 bytes)\n      ❌ Error deleting a.txt: Permission denied (os error 13)\n"
        ));
        assert!(output.contains("   Failed deletions: 1\n"));
    }

    #[test]
    fn test_unreadable_in_sweep() {
        let mut partial = sweep(false, Removal::Deleted);
        partial.dirs[0].unreadable.push(Unreadable {
            path: PathBuf::from("/proj/scripts/temp/locked"),
            message: "permission denied".to_string(),
        });
        let output = render(|out| write_sweep(out, &partial));
        assert!(output.contains(
            "   📄 Keeping: b.txt (5.0 days old)\n   ⚠️  Skipped unreadable directory: /proj/scripts/temp/locked (permission denied)\n"
        ));
        assert!(output.contains("   Files cleaned: 1\n"));
    }

    #[test]
    fn test_dry_run_without_stale_files() {
        let empty = Sweep {
            dry_run: true,
            expiration: TimeDelta::days(30),
            dirs: vec![],
            totals: Totals::default(),
        };
        let output = render(|out| write_sweep(out, &empty));
        assert!(output.ends_with("   Size to be freed: 0 bytes (0.0 KB)\n"));
        assert!(!output.contains("💡"));
    }

    #[test]
    fn test_inventory() {
        let inventory = Inventory {
            dirs: vec![
                DirListing {
                    dir: PathBuf::from("/proj/scripts/temp"),
                    records: vec![record("README.md", 10, 400.0), record("a.txt", 2048, 40.26)],
                    unreadable: vec![],
                },
                DirListing {
                    dir: PathBuf::from("/proj/api/scripts/temp"),
                    records: vec![],
                    unreadable: vec![Unreadable {
                        path: PathBuf::from("/proj/api/scripts/temp/locked"),
                        message: "permission denied".to_string(),
                    }],
                },
            ],
            total_files: 2,
            total_bytes: 2058,
        };
        let output = render(|out| write_inventory(out, &inventory));
        assert_eq!(
            output,
            "📋 Current Temporary Files:

📁 /proj/scripts/temp:
   📄 README.md (400.0 days, 10 bytes)
   📄 a.txt (40.3 days, 2,048 bytes)
📁 /proj/api/scripts/temp:
   (empty)
   ⚠️  Skipped unreadable directory: /proj/api/scripts/temp/locked (permission denied)

📊 Total: 2 files, 2,058 bytes (2.0 KB)
"
        );
    }

    #[test]
    fn test_usage() {
        let output = render(|out| write_usage(out));
        assert!(output.starts_with("🧹 Temporary File Cleanup Utility\n\nUsage:\n"));
        assert!(output.contains("  tempsweep --execute # Actually delete old files\n"));
        assert_eq!(
            render(|out| write_unknown_option(out)),
            "❌ Unknown option. Use --help for usage information.\n"
        );
    }
}
