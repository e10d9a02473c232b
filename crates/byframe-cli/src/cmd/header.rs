use byframe::{decode_header, encode_header, HeaderStatus};

use crate::cmd::HeaderArgs;
use crate::exit::{frame_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_header, HeaderOutput, OutputFormat};

pub fn run(args: HeaderArgs, format: OutputFormat) -> CliResult<i32> {
    let out = match (&args.decode, args.length) {
        (Some(hex_header), _) => decode_hex(hex_header)?,
        (None, Some(length)) => encode_length(length)?,
        (None, None) => return Err(CliError::new(USAGE, "expected a LENGTH or --decode HEX")),
    };

    print_header(&out, format);
    Ok(SUCCESS)
}

fn encode_length(length: usize) -> CliResult<HeaderOutput> {
    let header = encode_header(length).map_err(|err| frame_error("encode failed", err))?;
    Ok(HeaderOutput {
        data_len: length,
        header_len: header.len(),
        hex: hex::encode(header),
    })
}

fn decode_hex(input: &str) -> CliResult<HeaderOutput> {
    let bytes = hex::decode(input.trim())
        .map_err(|err| CliError::new(USAGE, format!("--decode is not valid hex: {err}")))?;

    match decode_header(&bytes) {
        HeaderStatus::Complete {
            header_len,
            data_len,
        } => Ok(HeaderOutput {
            data_len,
            header_len,
            hex: hex::encode(&bytes[..header_len]),
        }),
        HeaderStatus::Incomplete => Err(CliError::new(
            DATA_INVALID,
            "header is incomplete: every byte has the continuation bit set",
        )),
        HeaderStatus::TooLarge => Err(CliError::new(DATA_INVALID, "header is too long")),
    }
}
