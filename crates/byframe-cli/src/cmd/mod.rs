use clap::{Args, Subcommand};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::exit::{io_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod header;
pub mod tuple;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame payloads and write the stream to stdout.
    Encode(EncodeArgs),
    /// Scan a framed stream and print each frame.
    Decode(DecodeArgs),
    /// Encode a length as a header, or decode a hex header.
    Header(HeaderArgs),
    /// Unpack one tuple.
    Tuple(TupleArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Header(args) => header::run(args, format),
        Command::Tuple(args) => tuple::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// String payload (repeatable).
    #[arg(long, short = 'd')]
    pub data: Vec<String>,
    /// Read a payload from a file (repeatable).
    #[arg(long, short = 'f')]
    pub file: Vec<PathBuf>,
    /// Pack all payloads into a single tuple frame.
    #[arg(long)]
    pub tuple: bool,
    /// Refuse frames larger than this many bytes.
    #[arg(long, default_value_t = byframe::DEFAULT_MAX_FRAME_SIZE)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Framed input file. Reads stdin when omitted.
    pub path: Option<PathBuf>,
    /// Maximum buffered size of one frame.
    #[arg(long, default_value_t = byframe::DEFAULT_MAX_FRAME_SIZE)]
    pub limit: usize,
    /// Bytes requested per read.
    #[arg(long, default_value_t = byframe::DEFAULT_READ_CHUNK_SIZE)]
    pub chunk: usize,
    /// Stop after N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct HeaderArgs {
    /// Payload length to encode.
    #[arg(required_unless_present = "decode", conflicts_with = "decode")]
    pub length: Option<usize>,
    /// Hex-encoded header to decode (e.g. c801).
    #[arg(long, value_name = "HEX")]
    pub decode: Option<String>,
}

#[derive(Args, Debug)]
pub struct TupleArgs {
    /// Tuple input file. Reads stdin when omitted.
    pub path: Option<PathBuf>,
    /// Number of spans in the tuple.
    #[arg(long, short = 'n')]
    pub arity: usize,
    /// Treat the input as a framed stream and unpack its first frame.
    #[arg(long)]
    pub framed: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open `path`, or stdin when absent.
pub fn open_input(path: Option<&Path>) -> CliResult<Box<dyn Read>> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|err| {
                io_error(&format!("failed opening {}", path.display()), err)
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(std::io::stdin().lock())),
    }
}
