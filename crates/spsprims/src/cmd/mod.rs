use clap::{Args, Subcommand};
use std::path::PathBuf;

use spsprims_sig::WireShape;

use crate::exit::{sig_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod doctor;
pub mod encode;
pub mod envinfo;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON value under a wire shape.
    Encode(EncodeArgs),
    /// Decode wire bytes under a wire shape.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run loopback wrapper function calls for every tag family.
    Doctor(DoctorArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Wire shape, e.g. `map<string,seq<u32>>`.
    pub shape: String,
    /// JSON value to encode.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read the JSON value from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Wire shape, e.g. `expected<u64>`.
    pub shape: String,
    /// Hex-encoded wire bytes (an optional `0x` prefix and whitespace are ignored).
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub hex: Option<String>,
    /// Read raw wire bytes from a file.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Include build details.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {}

#[derive(Args, Debug)]
pub struct EnvinfoArgs {}

fn parse_shape(text: &str) -> CliResult<WireShape> {
    text.parse::<WireShape>()
        .map_err(|err| sig_error(&format!("invalid shape `{text}`"), err))
}
