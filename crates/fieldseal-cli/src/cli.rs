//! Command-line surface.

use clap::{Args, Parser, Subcommand};

/// Seal, open, and digest individual field values.
///
/// The key is resolved from `ENCRYPTION_KEY`, falling back to `SECRET_KEY`.
/// With neither set, a shared development key is used and `status` reports
/// `"configured": false`.
#[derive(Debug, Parser)]
#[command(name = "fieldseal")]
#[command(version)]
pub struct Cli {
    /// Write errors to stdout as JSON instead of plain text on stderr.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a fresh random key as 64 hex characters.
    GenerateKey,
    /// Encrypt a value into a base64 envelope.
    Encrypt(ValueArgs),
    /// Decrypt a base64 envelope back to its value.
    Decrypt(ValueArgs),
    /// Print the keyless SHA-256 digest of a value.
    Hash(ValueArgs),
    /// Print the keyed blind-index digest of a value.
    KeyedHash(ValueArgs),
    /// Print the byte layout of an envelope as JSON without decrypting it.
    Inspect(ValueArgs),
    /// Print which key is in use as JSON.
    Status,
}

#[derive(Debug, Args)]
pub struct ValueArgs {
    /// Input value. Read from stdin when omitted.
    pub value: Option<String>,
}
