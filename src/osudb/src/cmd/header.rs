use clap::Args;
use osudb_database::Header as HeaderRecord;

use super::Command;
use crate::cli::{helpers, process, InputsOutputs, Threads};

/// Subcommand for decoding database headers into JSON format.
///
/// Every input is decoded on the worker pool.
#[derive(Debug, Args)]
pub struct Header {
    #[clap(flatten)]
    args: InputsOutputs,
}

impl Command for Header {
    fn handle(self, threads: &Threads) -> eyre::Result<()> {
        let (inputs, outputs) = self.args.evaluate("header.json")?;
        process(
            threads.pool()?,
            inputs,
            outputs,
            |buf| HeaderRecord::parse(buf, &mut 0).map_err(Into::into),
            helpers::write_as_json,
        )
    }
}
