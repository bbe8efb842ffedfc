use std::io;

use chrono::Utc;

use crate::{errors::Result, janitor::Janitor, report};

pub fn run() -> Result<()> {
    let root = super::project_root()?;
    let inventory = Janitor::for_project(&root).inventory(Utc::now())?;
    report::write_inventory(&mut io::stdout().lock(), &inventory)?;

    Ok(())
}
