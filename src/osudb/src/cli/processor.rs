use std::{
    fs, mem,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use osudb_executor::{ShutdownMode, WorkerPool};

use super::{load_input, InputSource, OutputSource};

type Outcome<T> = (usize, Option<PathBuf>, eyre::Result<T>);

/// Decodes every input on the worker pool and writes the results in
/// input order once all of them are done.
///
/// Loading and decoding happen on the workers; results are collected
/// into a shared list and written on the calling thread. Stdin is read
/// on the calling thread before it is handed to a worker.
///
/// The first failure, in input order, is returned after all inputs
/// before it were written. A panic while decoding is resumed on the
/// calling thread before anything gets written.
pub fn process<T, R, W>(
    pool: WorkerPool,
    input: InputSource,
    output: OutputSource,
    read: R,
    mut write: W,
) -> eyre::Result<()>
where
    T: Send + 'static,
    R: Fn(&[u8]) -> eyre::Result<T> + Send + Sync + 'static,
    W: FnMut(Option<PathBuf>, T, OutputSource) -> eyre::Result<()>,
{
    if let OutputSource::Dir(dir, _) = &output {
        fs::create_dir_all(dir)?;
    }

    let read = Arc::new(read);
    let outcomes: Arc<Mutex<Vec<Outcome<T>>>> = Arc::new(Mutex::new(Vec::new()));

    let inputs = input.into_inputs();
    log::debug!(
        "decoding {} inputs on {} workers",
        inputs.len(),
        pool.threads()
    );

    for (index, path) in inputs.into_iter().enumerate() {
        let read = Arc::clone(&read);
        let outcomes = Arc::clone(&outcomes);

        // Stdin is bound to this thread, so it is read up front.
        let stdin = path.is_none().then(|| load_input(None));

        pool.submit(move || {
            let buf = match stdin {
                Some(buf) => buf,
                None => load_input(path.as_ref()),
            };
            let value = buf.and_then(|buf| (*read)(&buf));

            outcomes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((index, path, value));
        })?;
    }

    pool.shutdown(ShutdownMode::Drain);

    let mut outcomes = mem::take(&mut *outcomes.lock().unwrap_or_else(PoisonError::into_inner));
    outcomes.sort_unstable_by_key(|(index, ..)| *index);

    for (_, path, value) in outcomes {
        let value = match (&path, value) {
            (_, Ok(value)) => value,
            (Some(path), Err(e)) => {
                return Err(e.wrap_err(format!("failed to decode '{}'", path.display())));
            }
            (None, Err(e)) => return Err(e.wrap_err("failed to decode stdin")),
        };

        write(path, value, output.clone())?;
    }

    Ok(())
}
