use std::io;

use chrono::Utc;
use log::{debug, info};

use crate::{errors::Result, janitor::Janitor, report};

pub fn run(dry_run: bool) -> Result<()> {
    let root = super::project_root()?;
    debug!("Running cleanup under {} (dry run: {dry_run})", root.display());

    let sweep = Janitor::for_project(&root).sweep(dry_run, Utc::now())?;
    if !dry_run && sweep.totals.stale_files > 0 {
        info!(
            "Cleaned up {} expired file(s)",
            sweep.totals.stale_files - sweep.totals.failed_files
        );
    }

    report::write_sweep(&mut io::stdout().lock(), &sweep)?;

    Ok(())
}
