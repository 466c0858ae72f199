use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fgd_buildings::Config;

/// Merge the FGD building footprints of every sub-directory of the zip directory.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON configuration, the built-in paths are used when omitted.
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.config {
        Some(path) => match Config::from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    log::debug!("{config:?}");

    let time = std::time::Instant::now();
    match fgd_buildings::run(&config) {
        Ok(report) => {
            print!("{report}");
            println!("Done in {:?}", time.elapsed());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
