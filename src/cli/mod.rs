pub mod cleanup;
pub mod list;

use std::{
    io,
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::{errors::Result, fail, report, vars::TEMPSWEEP_PROJECT_ROOT};

// 内置的 help/version 被禁用，保持原有的命令行界面：
// 只看第一个参数，其余参数忽略
#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DryRun,
    Execute,
    List,
    Help,
    Unknown,
}

impl Args {
    pub fn mode(&self) -> Mode {
        match self.options.first().map(String::as_str) {
            None => Mode::DryRun,
            Some("--execute") => Mode::Execute,
            Some("--list") => Mode::List,
            Some("--help") => Mode::Help,
            Some(_) => Mode::Unknown,
        }
    }
}

/// Root the scratch directories hang off.
///
/// `TEMPSWEEP_PROJECT_ROOT` wins when set; otherwise it is the directory two
/// levels above the executable (`<root>/scripts/tempsweep`).
pub fn project_root() -> Result<PathBuf> {
    if !TEMPSWEEP_PROJECT_ROOT.is_empty() {
        return Ok(PathBuf::from(*TEMPSWEEP_PROJECT_ROOT));
    }

    let exe = std::env::current_exe()?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| fail!("cannot derive project root from {}", exe.display()))
}

pub fn usage() -> Result<()> {
    report::write_usage(&mut io::stdout().lock())?;

    Ok(())
}

pub fn unknown_option() -> Result<()> {
    report::write_unknown_option(&mut io::stdout().lock())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Mode {
        Args::try_parse_from(std::iter::once("tempsweep").chain(args.iter().copied()))
            .unwrap()
            .mode()
    }

    #[test]
    fn test_modes() {
        assert_eq!(parse(&[]), Mode::DryRun);
        assert_eq!(parse(&["--execute"]), Mode::Execute);
        assert_eq!(parse(&["--list"]), Mode::List);
        assert_eq!(parse(&["--help"]), Mode::Help);
    }

    #[test]
    fn test_first_argument_wins() {
        assert_eq!(parse(&["--execute", "--list"]), Mode::Execute);
        assert_eq!(parse(&["--list", "foo"]), Mode::List);
        assert_eq!(parse(&["--help", "--execute"]), Mode::Help);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(parse(&["--force"]), Mode::Unknown);
        assert_eq!(parse(&["now"]), Mode::Unknown);
        assert_eq!(parse(&["-h"]), Mode::Unknown);
        assert_eq!(parse(&["--version"]), Mode::Unknown);
        assert_eq!(parse(&["foo", "--execute"]), Mode::Unknown);
    }
}
