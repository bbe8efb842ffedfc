use crate::{
    cli::{Args, Mode},
    errors::Result,
};
use clap::Parser;
use log::{debug, info};

mod cli;
mod errors;
mod janitor;
mod logger;
mod report;
mod vars;

fn main() {
    // Load .env before anything reads TEMPSWEEP_* variables
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    // Initialize the logger
    logger::init();
    if dotenv_loaded {
        info!("loaded .env file");
    }

    if let Err(e) = run() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mode = match Args::try_parse() {
        Ok(args) => args.mode(),
        Err(e) => {
            debug!("rejected arguments: {e}");
            Mode::Unknown
        }
    };

    match mode {
        Mode::DryRun => cli::cleanup::run(true),
        Mode::Execute => cli::cleanup::run(false),
        Mode::List => cli::list::run(),
        Mode::Help => cli::usage(),
        // 未知参数不视为失败
        Mode::Unknown => cli::unknown_option(),
    }
}
