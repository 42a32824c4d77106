use std::path::PathBuf;

use clap::Parser;
use colored::*;
use virtual_floppy::config::{DEFAULT_IMAGE_PATH, DEFAULT_LOG_FILTER};

use crate::shell::start_shell;

mod shell;
mod utils;

#[derive(Debug, Clone, Parser)]
#[command(name = "vfloppy", version, about = "Interactive shell for a 1.44M virtual floppy image")]
struct Args {
    #[arg(
        value_name = "IMG",
        default_value = DEFAULT_IMAGE_PATH,
        help = "Floppy image file, created blank if missing"
    )]
    image: PathBuf,
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();

    if let Err(e) = start_shell(args.image) {
        eprintln!("{} {}", "❌ Error:".red().bold(), e);
        std::process::exit(1);
    }
}
