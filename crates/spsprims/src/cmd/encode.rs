use std::fs;

use serde_json::Value;
use tracing::debug;

use crate::cmd::{parse_shape, EncodeArgs};
use crate::exit::{io_error, sig_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{self, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let shape = parse_shape(&args.shape)?;

    let text = match (args.json, args.file) {
        (Some(json), _) => json,
        (None, Some(path)) => fs::read_to_string(&path)
            .map_err(|err| io_error(&format!("failed to read {}", path.display()), err))?,
        (None, None) => return Err(CliError::new(USAGE, "one of --json or --file is required")),
    };

    let value: Value = serde_json::from_str(&text)
        .map_err(|err| CliError::new(DATA_INVALID, format!("invalid JSON value: {err}")))?;
    let bytes = shape
        .encode(&value)
        .map_err(|err| sig_error(&format!("cannot encode as {shape}"), err))?;

    debug!(%shape, size = bytes.len(), "encoded value");
    output::print_encoded(&shape, &bytes, format);
    Ok(SUCCESS)
}
