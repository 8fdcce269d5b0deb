//! Crate for parsing and writing osu! database files.
//!
//! Only the header at the start of the file is supported. It
//! describes the client which produced the database and its owner.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::{io, path::Path};

use osudb_utils::{
    binary::{self, BinaryError},
    load, LoadError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that may occur when reading a database file.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The file could not be loaded into memory.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The contents ended before the header was complete.
    #[error("failed to decode header: {0}")]
    Decode(#[from] BinaryError),
}

/// Representation of an osu! database header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The client version that wrote the file, as `YYYYMMDD`.
    pub version: i32,
    /// The number of beatmap folders.
    pub folder_count: i32,
    /// Whether the account is unlocked.
    pub account_unlocked: bool,
    /// When the account gets unlocked, in .NET ticks.
    pub unlock_date: i64,
    /// The name of the player.
    pub player_name: String,
}

impl Header {
    /// Decodes a header from `buf`, starting at `cursor`.
    ///
    /// On success, `cursor` points past the header. Fields are read in
    /// file order, so on failure the cursor is left at the start of
    /// the first field that could not be decoded.
    pub fn parse(buf: &[u8], cursor: &mut usize) -> Result<Self, BinaryError> {
        Ok(Self {
            version: binary::read(buf, cursor)?,
            folder_count: binary::read(buf, cursor)?,
            account_unlocked: binary::read(buf, cursor)?,
            unlock_date: binary::read(buf, cursor)?,
            player_name: binary::prefixed_string(buf, cursor)?,
        })
    }

    /// Loads the file at `path` and decodes the header at its start.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        let buf = load(path)?;
        Self::parse(&buf, &mut 0).map_err(Into::into)
    }

    /// Writes the header to the given [`io::Write`]r.
    pub fn write<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        binary::write(&mut writer, self.version)?;
        binary::write(&mut writer, self.folder_count)?;
        binary::write(&mut writer, self.account_unlocked)?;
        binary::write(&mut writer, self.unlock_date)?;
        binary::write_prefixed_string(&mut writer, &self.player_name)?;

        Ok(())
    }
}
