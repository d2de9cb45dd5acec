use std::fs;

use tracing::debug;

use crate::cmd::{parse_shape, DecodeArgs};
use crate::exit::{io_error, sig_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{self, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let shape = parse_shape(&args.shape)?;

    let bytes = match (args.hex, args.file) {
        (Some(text), _) => parse_hex(&text)?,
        (None, Some(path)) => fs::read(&path)
            .map_err(|err| io_error(&format!("failed to read {}", path.display()), err))?,
        (None, None) => return Err(CliError::new(USAGE, "one of --hex or --file is required")),
    };

    let value = shape
        .decode(&bytes)
        .map_err(|err| sig_error(&format!("cannot decode as {shape}"), err))?;

    debug!(%shape, size = bytes.len(), "decoded value");
    output::print_decoded(&shape, bytes.len(), &value, format);
    Ok(SUCCESS)
}

fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits.as_str());
    hex::decode(digits).map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex input: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_accepts_prefix_and_whitespace() {
        assert_eq!(parse_hex("0x01 02\n0a").unwrap(), vec![1, 2, 10]);
        assert_eq!(parse_hex("FF").unwrap(), vec![255]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn hex_rejects_odd_digits() {
        let err = parse_hex("abc").unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
