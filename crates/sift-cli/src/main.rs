use std::process::ExitCode;

use clap::Parser;
use sift_cli::{CliArgs, SiftCli};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match SiftCli::from_args("sift", &args).and_then(|cli| cli.run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
