use std::io::Read;

use byframe::{decode_tuple_vec, Scanner};

use crate::cmd::{open_input, TupleArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_spans, OutputFormat};

pub fn run(args: TupleArgs, format: OutputFormat) -> CliResult<i32> {
    let mut input = open_input(args.path.as_deref())?;

    let data = if args.framed {
        Scanner::new(input)
            .next_frame()
            .map_err(|err| frame_error("read failed", err))?
            .ok_or_else(|| CliError::new(DATA_INVALID, "input holds no frame"))?
            .to_vec()
    } else {
        let mut data = Vec::new();
        input
            .read_to_end(&mut data)
            .map_err(|err| io_error("read failed", err))?;
        data
    };

    let spans =
        decode_tuple_vec(&data, args.arity).map_err(|err| frame_error("unpack failed", err))?;
    print_spans(&spans, format);
    Ok(SUCCESS)
}
