use anyhow::{Context, Result};
use logswap::cli::{Args, parse_args};
use logswap::{logger, runner};
use std::io;

fn main() -> Result<()> {
    match parse_args()? {
        Args::ShowConfig { config } => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to serialize config")?;
            print!("{}", rendered);
        }
        Args::Run { options, debug } => {
            if let Some(path) = logger::init_debug_logging(debug)? {
                eprintln!("Debug log: {}", path.display());
            }

            let stdout = io::stdout();
            let stderr = io::stderr();
            runner::run(&options, &mut stdout.lock(), &mut stderr.lock())?;
        }
    }

    Ok(())
}
