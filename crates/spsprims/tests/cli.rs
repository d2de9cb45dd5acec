#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn spsprims(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spsprims"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("spsprims should run")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn unique_temp_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "spsprims-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn encode_prints_hex_for_string_keyed_map() {
    let output = spsprims(&["--format", "json", "encode", "map<string,u32>", "--json", r#"{"a":1}"#]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["shape"], "map<string,u32>");
    assert_eq!(json["size"], 21);
    assert_eq!(json["hex"], "01000000000000000100000000000000"
        .to_string()
        + "6101000000");
}

#[test]
fn decode_reads_expected_value() {
    let output = spsprims(&["--format", "json", "decode", "expected<u32>", "--hex", "0x01 07000000"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert!(json["schema_id"].as_str().unwrap().ends_with("decoded-value.schema.json"));
    assert_eq!(json["size"], 5);
    assert_eq!(json["value"]["value"], 7);
}

#[test]
fn decode_rejects_trailing_bytes_as_invalid_data() {
    let output = spsprims(&["--format", "json", "decode", "u8", "--hex", "0102"]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("trailing bytes"));
}

#[test]
fn malformed_shape_is_a_usage_error() {
    let output = spsprims(&["encode", "seq<u32", "--json", "[]"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn encode_from_file_writes_raw_bytes() {
    let path = unique_temp_file("encode");
    std::fs::write(&path, r#"[true, "hi"]"#).expect("value file should be writable");

    let output = spsprims(&[
        "--format",
        "raw",
        "encode",
        "tuple<bool,string>",
        "--file",
        path.to_str().expect("temp path should be UTF-8"),
    ]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    assert_eq!(output.stdout, [1, 2, 0, 0, 0, 0, 0, 0, 0, b'h', b'i']);
}

#[test]
fn decode_from_file_round_trips_encoded_bytes() {
    let path = unique_temp_file("decode");
    std::fs::write(&path, [3, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3]).expect("wire file should be writable");

    let output = spsprims(&[
        "--format",
        "json",
        "decode",
        "seq<u8>",
        "--file",
        path.to_str().expect("temp path should be UTF-8"),
    ]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["value"], serde_json::json!([1, 2, 3]));
}

#[test]
fn doctor_passes_every_loopback_check() {
    let output = spsprims(&["--format", "json", "doctor"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["overall"], "pass");
    let checks = json["checks"].as_array().expect("checks should be an array");
    assert!(checks.iter().any(|c| c["name"] == "c_dispatch" && c["status"] == "pass"));
}

#[test]
fn version_prints_package_version() {
    let output = spsprims(&["version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("spsprims {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn envinfo_reports_wire_layout_and_limits() {
    let output = spsprims(&["--format", "json", "envinfo"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["wire"]["byte_order"], "little-endian");
    assert_eq!(json["wire"]["sequence_length_size"], 8);
    assert_eq!(json["wire"]["widths"]["u32"], 4);
    assert_eq!(json["sig_limits"]["max_depth"], 32);
    assert_eq!(json["dispatch_configured"], false);
}

#[test]
fn envinfo_raw_prints_key_value_lines() {
    let output = spsprims(&["--format", "raw", "envinfo"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|line| line == "wire.width.addr=8"));
}
