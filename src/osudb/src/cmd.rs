pub mod header;
pub mod uleb;

use crate::cli::Threads;

/// Represents a command in the osudb application.
pub trait Command {
    /// Consumes a command object and executes the handler actions
    /// associated with it.
    ///
    /// On failure, an error will be reported.
    fn handle(self, threads: &Threads) -> eyre::Result<()>;
}
