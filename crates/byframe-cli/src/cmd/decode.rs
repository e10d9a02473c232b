use byframe::{Scanner, ScannerConfig};
use tracing::{debug, info};

use crate::cmd::{open_input, DecodeArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = open_input(args.path.as_deref())?;
    let config = ScannerConfig {
        max_frame_size: args.limit,
        read_chunk_size: args.chunk,
    };
    let mut scanner = Scanner::with_config(input, config);

    let mut count = 0usize;
    while args.count.is_none_or(|max| count < max) && scanner.scan() {
        let frame = scanner.frame();
        debug!(index = count, size = frame.len(), "frame decoded");
        print_frame(count, frame, format);
        count += 1;
    }

    if let Some(err) = scanner.take_err() {
        return Err(frame_error(&format!("decode failed after {count} frames"), err));
    }

    info!(frames = count, "decode finished");
    Ok(SUCCESS)
}
