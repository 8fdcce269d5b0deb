use clap::{Parser, Subcommand};

use crate::cmd::*;

mod args;
pub use args::Threads;

pub mod helpers;

pub mod io;
pub use io::*;

mod processor;
pub use processor::*;

pub const HYPHEN: &str = "-";

/// The CLI interface for the osudb application.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    /// The selected command.
    #[clap(subcommand)]
    pub command: OsudbCommand,

    #[clap(flatten)]
    pub verbosity: args::Verbosity,

    #[clap(flatten)]
    pub threads: Threads,
}

/// The top-level commands supported by osudb.
#[derive(Debug, Subcommand)]
pub enum OsudbCommand {
    Header(header::Header),
    Uleb(uleb::Uleb),
}

impl Command for OsudbCommand {
    fn handle(self, threads: &Threads) -> eyre::Result<()> {
        match self {
            Self::Header(header) => header.handle(threads),
            Self::Uleb(uleb) => uleb.handle(threads),
        }
    }
}
