use std::{
    fs,
    io::{self, BufWriter, IsTerminal, Write},
    path::PathBuf,
};

use serde::Serialize;

/// Serializes `value` as JSON to a file, or to stdout if `out` is
/// `None`.
///
/// Terminals get pretty-printed output, everything else gets the
/// minified form.
pub fn serialize_to_output_source<T: Serialize>(
    out: Option<PathBuf>,
    value: &T,
) -> eyre::Result<()> {
    match out {
        Some(out) => {
            let mut writer = BufWriter::new(fs::File::create(&out)?);
            serde_json::to_writer(&mut writer, value)?;
            writer.flush()?;

            log::debug!("wrote '{}'", out.display());
        }

        None => {
            let mut stdout = io::stdout().lock();
            if stdout.is_terminal() {
                serde_json::to_writer_pretty(&mut stdout, value)?;
            } else {
                serde_json::to_writer(&mut stdout, value)?;
            }
            writeln!(stdout)?;
        }
    }

    Ok(())
}
