use std::fs;
use std::io::Read;

use byframe::{FrameWriter, ScannerConfig};
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let payloads = resolve_payloads(&args)?;

    let config = ScannerConfig {
        max_frame_size: args.limit,
        ..ScannerConfig::default()
    };
    let mut writer = FrameWriter::with_config(std::io::stdout().lock(), config);

    if args.tuple {
        let spans: Vec<&[u8]> = payloads.iter().map(Vec::as_slice).collect();
        writer
            .send_tuple(&spans)
            .map_err(|err| frame_error("encode failed", err))?;
        debug!(spans = spans.len(), "wrote tuple frame");
        return Ok(SUCCESS);
    }

    for payload in &payloads {
        writer
            .send(payload)
            .map_err(|err| frame_error("encode failed", err))?;
        debug!(size = payload.len(), "wrote frame");
    }

    Ok(SUCCESS)
}

/// `--data` values first, then `--file` contents, then stdin if neither was given.
fn resolve_payloads(args: &EncodeArgs) -> CliResult<Vec<Vec<u8>>> {
    let mut payloads: Vec<Vec<u8>> = args.data.iter().map(|d| d.as_bytes().to_vec()).collect();

    for path in &args.file {
        let bytes = fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        payloads.push(bytes);
    }

    if payloads.is_empty() {
        let mut bytes = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .map_err(|err| io_error("failed reading stdin", err))?;
        payloads.push(bytes);
    }

    Ok(payloads)
}
