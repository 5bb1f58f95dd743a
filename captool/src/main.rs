//! captool binary.
//!
//! # Usage
//!
//! ```bash
//! # New seed: prints the recovery phrase, write cap and read-only cap
//! captool generate
//!
//! # Recover the write cap from a recovery phrase
//! captool generate legal winner thank year wave sausage worth useful legal winner thank yellow
//!
//! captool diminish URI:MDMF:<writekey>:<fingerprint>
//! captool to-words URI:MDMF:<writekey>:<fingerprint>
//! captool to-cap --type MDMF <words...>
//! ```

use std::process::ExitCode;

use captool::cli::{run, Args};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(&args.command) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
