//! Command-line definitions and dispatch.
//!
//! Every subcommand is a pure function of its arguments (plus OS
//! randomness for a fresh seed) returning the lines to print, so the
//! binary only has to parse, run and print.

use clap::{Parser, Subcommand};

use captool_cap::{generate_mutable_filecap, to_cap, to_words, CapError, Capability, Seed};

/// Tahoe-LAFS capability tool
#[derive(Parser, Debug)]
#[command(name = "captool")]
#[command(about = "Generate and transform Tahoe-LAFS mutable file capabilities")]
#[command(version)]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// The operations the tool offers.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create a mutable file capability, or recover one from its seed phrase
    Generate {
        /// 12-word seed recovery phrase; omit to generate a new seed
        words: Vec<String>,
    },
    /// Print the read-only capability of a write capability
    Diminish {
        /// Capability string
        cap: String,
    },
    /// Print the word encoding of a capability
    ToWords {
        /// Capability string
        cap: String,
    },
    /// Rebuild a capability from its word encoding
    ToCap {
        /// Type tag of the rebuilt capability
        #[arg(long = "type", default_value = "MDMF")]
        cap_type: String,

        /// Word encoding produced by `to-words`
        #[arg(required = true)]
        words: Vec<String>,
    },
}

/// Run a command and return its output lines.
pub fn run(command: &Command) -> Result<Vec<String>, CapError> {
    match command {
        Command::Generate { words } if words.is_empty() => {
            tracing::info!("generating a new seed");
            generate_from_seed(&Seed::random())
        }
        Command::Generate { words } => {
            let seed = Seed::from_words(&split_words(words))?;
            Ok(vec![generate_mutable_filecap(&seed)?.to_string()])
        }
        Command::Diminish { cap } => {
            let cap: Capability = cap.parse()?;
            Ok(vec![cap.diminish()?.to_string()])
        }
        Command::ToWords { cap } => {
            let cap: Capability = cap.parse()?;
            Ok(vec![to_words(&cap)?.join(" ")])
        }
        Command::ToCap { cap_type, words } => {
            let cap = to_cap(&split_words(words), cap_type.parse()?)?;
            Ok(vec![cap.to_string()])
        }
    }
}

/// Output of `generate` for a fresh seed: the recovery phrase, the write
/// capability and the read-only capability.
pub fn generate_from_seed(seed: &Seed) -> Result<Vec<String>, CapError> {
    let cap = generate_mutable_filecap(seed)?;
    Ok(vec![
        seed.to_words()?.join(" "),
        cap.to_string(),
        cap.diminish()?.to_string(),
    ])
}

/// Accept words either as separate arguments or as one quoted phrase.
fn split_words(args: &[String]) -> Vec<&str> {
    args.iter().flat_map(|arg| arg.split_whitespace()).collect()
}
