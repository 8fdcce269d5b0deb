use std::{
    io::{self, IsTerminal, Read},
    path::PathBuf,
    process,
};

use clap::{Args, CommandFactory};
use glob::glob;

use crate::cli::{Cli, HYPHEN};

/// Where the inputs of a command come from.
#[derive(Clone, Debug)]
pub enum InputSource {
    /// A single database piped through stdin.
    Stdin,
    /// A single database file.
    File(PathBuf),
    /// Several database files matched by a glob pattern.
    Files(Vec<PathBuf>),
}

impl InputSource {
    /// Flattens the source into a list of inputs, where `None`
    /// stands for stdin.
    pub fn into_inputs(self) -> Vec<Option<PathBuf>> {
        match self {
            Self::Stdin => vec![None],
            Self::File(path) => vec![Some(path)],
            Self::Files(paths) => paths.into_iter().map(Some).collect(),
        }
    }
}

/// Where the outputs of a command go to.
#[derive(Clone, Debug)]
pub enum OutputSource {
    /// Everything is printed to stdout.
    Stdout,
    /// The output of the only input is written to this file.
    File(PathBuf),
    /// Every input gets its own file in this directory.
    ///
    /// The file is named after the input, with the suffix as its
    /// extension.
    Dir(PathBuf, &'static str),
}

/// Command options for processing one or more database files.
#[derive(Debug, Args)]
pub struct InputsOutputs {
    /// The database files to process.
    ///
    /// "-" reads a single database from stdin. Everything else is
    /// treated as a path, with UNIX glob patterns being supported.
    ///
    /// When more than one file matches, the output option must name
    /// a directory.
    pub input: String,

    /// Where to write the results.
    ///
    /// Defaults to "-" for printing to stdout. Otherwise a file path
    /// for a single input, or a directory to place one file per
    /// input in.
    #[clap(short, default_value = HYPHEN)]
    pub output: PathBuf,
}

impl InputsOutputs {
    /// Evaluates the supplied arguments into input and output sources.
    pub fn evaluate(self, suffix: &'static str) -> eyre::Result<(InputSource, OutputSource)> {
        let inputs = self.input_source()?;
        let outputs = self.output_source(suffix, &inputs);

        Ok((inputs, outputs))
    }

    fn input_source(&self) -> eyre::Result<InputSource> {
        if self.input == HYPHEN {
            return Ok(InputSource::Stdin);
        }

        // A plain path is a valid glob pattern as well.
        let mut paths: Vec<PathBuf> = glob(&self.input)?.collect::<Result<_, _>>()?;

        match paths.len() {
            0 => Err(eyre::eyre!("failed to find files matching '{}'", self.input)),
            1 => Ok(InputSource::File(paths.remove(0))),
            _ => Ok(InputSource::Files(paths)),
        }
    }

    fn output_source(self, suffix: &'static str, input: &InputSource) -> OutputSource {
        if self.output.as_os_str() == HYPHEN {
            return OutputSource::Stdout;
        }

        match input {
            InputSource::Files(..) => OutputSource::Dir(self.output, suffix),
            _ if self.output.is_dir() => OutputSource::Dir(self.output, suffix),
            InputSource::Stdin | InputSource::File(..) => OutputSource::File(self.output),
        }
    }
}

/// Reads the whole input into memory.
///
/// `None` reads from stdin, everything else loads the file at the path.
/// With stdin attached to a terminal there is no database to read, so
/// the help is printed and the process exits instead.
pub fn load_input(path: Option<&PathBuf>) -> eyre::Result<Box<[u8]>> {
    if let Some(path) = path {
        return osudb_utils::load(path).map_err(Into::into);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        let _ = Cli::command().print_help();
        process::exit(2);
    }

    let mut buf = Vec::new();
    stdin.lock().read_to_end(&mut buf)?;
    Ok(buf.into_boxed_slice())
}
