use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use spsprims_call::jit_dispatch;
use spsprims_codec::{MAX_ZERO_WIDTH_ELEMENTS, SEQUENCE_LENGTH_SIZE};
use spsprims_sig::{SigConfig, WireShape};

use crate::cmd::EnvinfoArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

const FIXED_WIDTH_SHAPES: [WireShape; 12] = [
    WireShape::Bool,
    WireShape::Char,
    WireShape::I8,
    WireShape::U8,
    WireShape::I16,
    WireShape::U16,
    WireShape::I32,
    WireShape::U32,
    WireShape::I64,
    WireShape::U64,
    WireShape::Address,
    WireShape::Empty,
];

const LOG_VARIABLES: [&str; 2] = ["SPSPRIMS_LOG_LEVEL", "SPSPRIMS_LOG_FORMAT"];

#[derive(Debug, Serialize)]
struct WireInfo {
    byte_order: &'static str,
    host_byte_order: &'static str,
    byte_swapping: bool,
    sequence_length_size: usize,
    max_zero_width_elements: usize,
    /// Encoded width of every shape whose size does not depend on its value.
    widths: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
struct SigLimits {
    max_depth: usize,
    max_sequence_len: usize,
}

#[derive(Debug, Serialize)]
struct EnvInfo {
    schema_id: &'static str,
    version: &'static str,
    target: &'static str,
    features: Vec<&'static str>,
    wire: WireInfo,
    sig_limits: SigLimits,
    dispatch_configured: bool,
    environment: BTreeMap<&'static str, Option<String>>,
}

pub fn run(_args: EnvinfoArgs, format: OutputFormat) -> CliResult<i32> {
    let info = collect();
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&info).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(&info).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table => println!("{}", table(&info)),
        OutputFormat::Raw => {
            for (key, value) in rows(&info) {
                println!("{key}={value}");
            }
        }
    }
    Ok(SUCCESS)
}

fn collect() -> EnvInfo {
    let host_byte_order = if cfg!(target_endian = "little") {
        "little-endian"
    } else {
        "big-endian"
    };
    let config = SigConfig::default();

    EnvInfo {
        schema_id: "https://schemas.3leaps.dev/spsprims/cli/v1/envinfo.schema.json",
        version: env!("CARGO_PKG_VERSION"),
        target: option_env!("SPSPRIMS_BUILD_TARGET").unwrap_or("unknown"),
        features: [
            ("call", cfg!(feature = "call")),
            ("sig", cfg!(feature = "sig")),
            ("cli", cfg!(feature = "cli")),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect(),
        wire: WireInfo {
            byte_order: "little-endian",
            host_byte_order,
            byte_swapping: cfg!(target_endian = "big"),
            sequence_length_size: SEQUENCE_LENGTH_SIZE,
            max_zero_width_elements: MAX_ZERO_WIDTH_ELEMENTS,
            widths: fixed_widths(),
        },
        sig_limits: SigLimits {
            max_depth: config.max_depth,
            max_sequence_len: config.max_sequence_len,
        },
        dispatch_configured: jit_dispatch().is_configured(),
        environment: LOG_VARIABLES
            .into_iter()
            .map(|key| (key, std::env::var(key).ok()))
            .collect(),
    }
}

fn fixed_widths() -> BTreeMap<String, usize> {
    FIXED_WIDTH_SHAPES
        .iter()
        .filter_map(|shape| Some((shape.to_string(), shape.fixed_size()?)))
        .collect()
}

fn rows(info: &EnvInfo) -> Vec<(String, String)> {
    let mut rows = vec![
        ("version".to_string(), info.version.to_string()),
        ("target".to_string(), info.target.to_string()),
        ("features".to_string(), info.features.join(",")),
        ("wire.byte_order".to_string(), info.wire.byte_order.to_string()),
        ("wire.host_byte_order".to_string(), info.wire.host_byte_order.to_string()),
        ("wire.byte_swapping".to_string(), info.wire.byte_swapping.to_string()),
        (
            "wire.sequence_length_size".to_string(),
            info.wire.sequence_length_size.to_string(),
        ),
        (
            "wire.max_zero_width_elements".to_string(),
            info.wire.max_zero_width_elements.to_string(),
        ),
    ];
    rows.extend(
        info.wire
            .widths
            .iter()
            .map(|(shape, width)| (format!("wire.width.{shape}"), width.to_string())),
    );
    rows.push(("sig.max_depth".to_string(), info.sig_limits.max_depth.to_string()));
    rows.push((
        "sig.max_sequence_len".to_string(),
        info.sig_limits.max_sequence_len.to_string(),
    ));
    rows.push((
        "dispatch.configured".to_string(),
        info.dispatch_configured.to_string(),
    ));
    rows.extend(info.environment.iter().map(|(key, value)| {
        (
            format!("env.{key}"),
            value.clone().unwrap_or_else(|| "(not set)".to_string()),
        )
    }));
    rows
}

fn table(info: &EnvInfo) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["KEY", "VALUE"]);
    for (key, value) in rows(info) {
        table.add_row(vec![key, value]);
    }
    table
}
