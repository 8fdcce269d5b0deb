use clap::{ArgAction, Args};
use osudb_executor::WorkerPool;

/// Configures the verbosity of the builtin logger.
#[derive(Clone, Copy, Debug, Args)]
pub struct Verbosity {
    /// Configures the log verbosity of osudb.
    ///
    /// `-v` is Debug, `-vv` is Trace.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Verbosity {
    /// Configures the global logger based on the settings.
    pub fn setup(self) -> eyre::Result<()> {
        let level = self.log_level();
        simple_logger::init_with_level(level)?;

        Ok(())
    }

    fn log_level(self) -> log::Level {
        match self.verbose {
            0 => log::Level::Info,
            1 => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }
}

/// Configures the worker pool used for decoding.
#[derive(Clone, Copy, Debug, Args)]
pub struct Threads {
    /// The number of worker threads to decode files on.
    ///
    /// Defaults to the `OSUDB_WORKER_THREADS` environment variable,
    /// then to the available parallelism of the system.
    #[clap(short = 'j', long = "threads", global = true)]
    pub count: Option<usize>,
}

impl Threads {
    /// Creates a worker pool with the configured number of threads.
    pub fn pool(self) -> eyre::Result<WorkerPool> {
        let pool = match self.count {
            Some(n) => WorkerPool::new(n)?,
            None => WorkerPool::from_env()?,
        };

        Ok(pool)
    }
}
