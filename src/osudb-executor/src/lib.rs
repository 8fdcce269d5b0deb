//! Implementation of a fixed-size worker pool for deferred tasks.
//!
//! # Motivation
//!
//! Database files can be large enough that decoding them on the
//! thread which drives the user interface causes noticeable stalls.
//! The pool lets such callers move the work elsewhere and pick up
//! the results once they're published.
//!
//! # Design
//!
//! A fixed number of worker threads is spawned when the pool is
//! created. All of them pull from one shared FIFO queue and sleep
//! on a condition variable while there is nothing to do.
//!
//! Tasks do not produce results. Callers that need one have the task
//! publish it into a location they own, under their own locking.
//!
//! A task that panics does not take its worker down. The first such
//! panic is resumed on the thread which shuts the pool down, after
//! the workers exited.
//!
//! Shutting down either discards the backlog of tasks which have not
//! started yet ([`ShutdownMode::Discard`], also what dropping the
//! pool does) or runs it to completion ([`ShutdownMode::Drain`]).

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod pool;
pub use pool::*;
