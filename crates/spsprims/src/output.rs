use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;
use spsprims_sig::WireShape;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    schema_id: &'a str,
    shape: String,
    size: usize,
    hex: String,
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    schema_id: &'a str,
    shape: String,
    size: usize,
    value: &'a Value,
}

pub fn print_encoded(shape: &WireShape, bytes: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                schema_id: "https://schemas.3leaps.dev/spsprims/cli/v1/encoded-value.schema.json",
                shape: shape.to_string(),
                size: bytes.len(),
                hex: hex::encode(bytes),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SHAPE", "SIZE", "HEX"])
                .add_row(vec![
                    shape.to_string(),
                    bytes.len().to_string(),
                    hex::encode(bytes),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "shape={} size={} hex={}",
                shape,
                bytes.len(),
                hex::encode(bytes)
            );
        }
        OutputFormat::Raw => print_raw(bytes),
    }
}

pub fn print_decoded(shape: &WireShape, size: usize, value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = DecodedOutput {
                schema_id: "https://schemas.3leaps.dev/spsprims/cli/v1/decoded-value.schema.json",
                shape: shape.to_string(),
                size,
                value,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SHAPE", "SIZE", "VALUE"])
                .add_row(vec![shape.to_string(), size.to_string(), value.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            );
        }
        OutputFormat::Raw => println!("{value}"),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
