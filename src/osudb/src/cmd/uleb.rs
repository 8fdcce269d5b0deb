use clap::Args;
use osudb_utils::binary;

use super::Command;
use crate::cli::Threads;

/// Subcommand for decoding a single ULEB128 value.
#[derive(Debug, Args)]
pub struct Uleb {
    /// The encoded bytes in hexadecimal, e.g. `80 01`.
    #[clap(required = true, value_parser = parse_hex_byte)]
    bytes: Vec<u8>,
}

fn parse_hex_byte(s: &str) -> Result<u8, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|e| format!("'{s}' is not a hex byte: {e}"))
}

impl Command for Uleb {
    fn handle(self, _threads: &Threads) -> eyre::Result<()> {
        let mut cursor = 0;
        let value = binary::uleb128(&self.bytes, &mut cursor)?;

        if cursor != self.bytes.len() {
            log::warn!(
                "ignoring {} bytes after the terminating byte",
                self.bytes.len() - cursor
            );
        }

        println!("{value}");
        Ok(())
    }
}
