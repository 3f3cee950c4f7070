//! Main application entry point.

use sketchsnap_app::app::USAGE;
use sketchsnap_app::{AppError, CliOptions, Command};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting SketchSnap");

    let options = match CliOptions::parse(std::env::args().skip(1)) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e @ AppError::Usage(_)) => {
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match sketchsnap_app::run(&options) {
        Ok(output) => {
            println!("{}", output.svg_path.display());
            println!("{}", output.png_path.display());
            if let Some(path) = output.dump_path {
                println!("{}", path.display());
            }
            if !output.frame.failed.is_empty() {
                log::warn!("{} icon(s) drawn as placeholders", output.frame.failed.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Export failed: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
