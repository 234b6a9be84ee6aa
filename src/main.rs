#![forbid(unsafe_code)]

//! dmh — Disk Maintenance Helper CLI entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("dmh: {e}");
        std::process::exit(1);
    }
}
