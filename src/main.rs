mod config;
mod io;
mod kernel;
mod logger;

use anyhow::{Context, Result};

use config::Command;
use kernel::Driver;

fn main() -> Result<()> {
    logger::init().context("Failed to install the logger")?;

    let config = match config::parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{}", config::USAGE);
            return Ok(());
        }
        Err(err) => {
            eprintln!("error: {}", err);
            eprintln!();
            eprintln!("{}", config::USAGE);
            std::process::exit(2);
        }
    };

    let mut driver = Driver::new(config);
    driver.start()?;

    Ok(())
}
