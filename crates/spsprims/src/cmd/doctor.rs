use std::collections::BTreeMap;
use std::ffi::c_void;
use std::fmt;

use serde::Serialize;
use serde_json::json;
use spsprims_call::{
    registry_dispatch, CallError, JitDispatch, WrapperFunction, WrapperFunctionRegistry,
    ARGUMENT_DESERIALIZATION_FAILED,
};
use spsprims_codec::{
    ExecutorAddr, SpsEmpty, SpsError, SpsExpected, SpsMap, SpsSequence, SpsString, SpsTuple,
    WrapperError,
};
use spsprims_sig::Signature;
use tracing::debug;

use crate::cmd::DoctorArgs;
use crate::exit::{CliError, CliResult, HEALTH_CHECK_FAILED, INTERNAL, SUCCESS};
use crate::output::OutputFormat;

const ADD: ExecutorAddr = ExecutorAddr::new(0x1000);
const GREET: ExecutorAddr = ExecutorAddr::new(0x1008);
const TALLY: ExecutorAddr = ExecutorAddr::new(0x1010);
const SWAP: ExecutorAddr = ExecutorAddr::new(0x1018);
const CHECK: ExecutorAddr = ExecutorAddr::new(0x1020);
const PARSE: ExecutorAddr = ExecutorAddr::new(0x1028);
const NOOP: ExecutorAddr = ExecutorAddr::new(0x1030);
const UNREGISTERED: ExecutorAddr = ExecutorAddr::new(0xdead_0000);

type Outcome = Result<String, String>;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Info,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = loopback_registry().map_err(|err| {
        CliError::new(INTERNAL, format!("failed to build loopback registry: {err}"))
    })?;

    let checks = run_checks(&registry);

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput {
        schema_id: "https://schemas.3leaps.dev/spsprims/cli/v1/doctor-report.schema.json",
        checks,
        overall,
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn run_checks(registry: &WrapperFunctionRegistry) -> Vec<CheckResult> {
    vec![
        check("primitives", primitives_check(registry)),
        check("string", string_check(registry)),
        check("sequence_map", sequence_map_check(registry)),
        check("tuple", tuple_check(registry)),
        check("error", error_check(registry)),
        check("expected", expected_check(registry)),
        check("empty", empty_check(registry)),
        check("out_of_band", out_of_band_check(registry)),
        check("malformed_args", malformed_args_check(registry)),
        check("runtime_signature", runtime_signature_check(registry)),
        check("c_dispatch", c_dispatch_check(registry)),
        compiled_features_check(),
    ]
}

/// One handler per tag family, all served in-process.
fn loopback_registry() -> Result<WrapperFunctionRegistry, CallError> {
    let mut registry = WrapperFunctionRegistry::new();

    registry.register_function::<u64, (u64, u64), _, _>(ADD, "add", |a: u64, b: u64| {
        a.wrapping_add(b)
    })?;
    registry.register_function::<SpsString, (SpsString,), _, _>(GREET, "greet", |name: String| {
        format!("hello, {name}")
    })?;
    registry.register_function::<SpsMap<SpsString, u32>, (SpsSequence<SpsString>,), _, _>(
        TALLY,
        "tally",
        |words: Vec<String>| {
            let mut counts = BTreeMap::new();
            for word in words {
                *counts.entry(word).or_insert(0u32) += 1;
            }
            counts
        },
    )?;
    registry.register_function::<SpsTuple<(u8, bool)>, (SpsTuple<(bool, u8)>,), _, _>(
        SWAP,
        "swap",
        |(flag, n): (bool, u8)| (n, flag),
    )?;
    registry.register_function::<SpsError, (bool,), _, _>(CHECK, "check", |accept: bool| {
        if accept {
            Ok(())
        } else {
            Err("value rejected")
        }
    })?;
    registry.register_function::<SpsExpected<u32>, (SpsString,), _, _>(
        PARSE,
        "parse",
        |text: String| text.parse::<u32>(),
    )?;
    registry.register_function::<SpsEmpty, (), _, _>(NOOP, "noop", || ())?;

    Ok(registry)
}

fn check(name: &str, outcome: Outcome) -> CheckResult {
    match outcome {
        Ok(detail) => CheckResult {
            name: name.to_string(),
            status: CheckStatus::Pass,
            detail,
        },
        Err(detail) => {
            debug!(check = name, %detail, "doctor check failed");
            CheckResult {
                name: name.to_string(),
                status: CheckStatus::Fail,
                detail,
            }
        }
    }
}

fn failed(err: impl fmt::Display) -> String {
    err.to_string()
}

fn expect_eq<T: PartialEq + fmt::Debug>(what: &str, got: T, want: T) -> Outcome {
    if got == want {
        Ok(format!("{what} = {got:?}"))
    } else {
        Err(format!("{what} = {got:?}, expected {want:?}"))
    }
}

fn primitives_check(registry: &WrapperFunctionRegistry) -> Outcome {
    let sum: u64 = WrapperFunction::<u64, (u64, u64)>::call_with(registry, ADD, &(40u64, 2u64))
        .map_err(failed)?;
    expect_eq("add(40, 2)", sum, 42)
}

fn string_check(registry: &WrapperFunctionRegistry) -> Outcome {
    let reply: String =
        WrapperFunction::<SpsString, (SpsString,)>::call_with(registry, GREET, &("sps",))
            .map_err(failed)?;
    expect_eq("greet(\"sps\")", reply.as_str(), "hello, sps")
}

fn sequence_map_check(registry: &WrapperFunctionRegistry) -> Outcome {
    let words = vec!["wire", "tag", "wire"];
    let counts: BTreeMap<String, u32> =
        WrapperFunction::<SpsMap<SpsString, u32>, (SpsSequence<SpsString>,)>::call_with(
            registry,
            TALLY,
            &(words,),
        )
        .map_err(failed)?;
    let want = BTreeMap::from([("tag".to_string(), 1), ("wire".to_string(), 2)]);
    expect_eq("tally([wire, tag, wire])", counts, want)
}

fn tuple_check(registry: &WrapperFunctionRegistry) -> Outcome {
    let swapped: (u8, bool) =
        WrapperFunction::<SpsTuple<(u8, bool)>, (SpsTuple<(bool, u8)>,)>::call_with(
            registry,
            SWAP,
            &((true, 7u8),),
        )
        .map_err(failed)?;
    expect_eq("swap((true, 7))", swapped, (7, true))
}

fn error_check(registry: &WrapperFunctionRegistry) -> Outcome {
    type Check = WrapperFunction<SpsError, (bool,)>;

    let accepted: Result<(), WrapperError> =
        Check::call_with(registry, CHECK, &(true,)).map_err(failed)?;
    if let Err(err) = accepted {
        return Err(format!("check(true) reported an error: {err}"));
    }

    let rejected: Result<(), WrapperError> =
        Check::call_with(registry, CHECK, &(false,)).map_err(failed)?;
    match rejected {
        Err(err) => expect_eq("check(false)", err.message(), "value rejected"),
        Ok(()) => Err("check(false) reported success".to_string()),
    }
}

fn expected_check(registry: &WrapperFunctionRegistry) -> Outcome {
    type Parse = WrapperFunction<SpsExpected<u32>, (SpsString,)>;

    let parsed: Result<u32, WrapperError> =
        Parse::call_with(registry, PARSE, &("17",)).map_err(failed)?;
    match parsed {
        Ok(17) => {}
        Ok(other) => return Err(format!("parse(\"17\") = {other}")),
        Err(err) => return Err(format!("parse(\"17\") failed: {err}")),
    }

    let invalid: Result<u32, WrapperError> =
        Parse::call_with(registry, PARSE, &("seventeen",)).map_err(failed)?;
    match invalid {
        Err(err) => Ok(format!("parse(\"seventeen\") failed with \"{err}\"")),
        Ok(value) => Err(format!("parse(\"seventeen\") = {value}")),
    }
}

fn empty_check(registry: &WrapperFunctionRegistry) -> Outcome {
    let result =
        WrapperFunction::<SpsEmpty, ()>::call_raw_with(registry, NOOP, &()).map_err(failed)?;
    expect_eq("noop() payload size", result.size(), 0)
}

fn out_of_band_check(registry: &WrapperFunctionRegistry) -> Outcome {
    match WrapperFunction::<u64, ()>::call_with::<_, u64, _>(registry, UNREGISTERED, &()) {
        Err(CallError::OutOfBand(message)) => Ok(message),
        Err(other) => Err(format!("unexpected failure: {other}")),
        Ok(value) => Err(format!("call to unregistered target returned {value}")),
    }
}

fn malformed_args_check(registry: &WrapperFunctionRegistry) -> Outcome {
    let result = registry.run(ADD, &[1, 2, 3]);
    let message = result.out_of_band_error();
    expect_eq(
        "add(<3 bytes>)",
        message.as_deref(),
        Some(ARGUMENT_DESERIALIZATION_FAILED),
    )
}

fn runtime_signature_check(registry: &WrapperFunctionRegistry) -> Outcome {
    let signature: Signature = "u64(u64, u64)".parse().map_err(failed)?;
    let args = signature.encode_args(&json!([40, 2])).map_err(failed)?;
    let result = registry.run(ADD, &args);
    if let Some(message) = result.out_of_band_error() {
        return Err(message.into_owned());
    }
    let value = signature.decode_return(result.data()).map_err(failed)?;
    expect_eq("u64(u64, u64) add", value, json!(42))
}

fn c_dispatch_check(registry: &WrapperFunctionRegistry) -> Outcome {
    let ctx = registry as *const WrapperFunctionRegistry as *mut c_void;
    // SAFETY: `registry_dispatch` expects a registry context, which outlives
    // every call made through `dispatch`.
    let dispatch = unsafe { JitDispatch::new(ctx, Some(registry_dispatch)) };
    let sum: u64 = WrapperFunction::<u64, (u64, u64)>::call_with(&dispatch, ADD, &(1u64, 2u64))
        .map_err(failed)?;
    expect_eq("add(1, 2) via registry_dispatch", sum, 3)
}

fn compiled_features_check() -> CheckResult {
    let mut features = Vec::new();
    if cfg!(feature = "call") {
        features.push("call");
    }
    if cfg!(feature = "sig") {
        features.push("sig");
    }
    if cfg!(feature = "cli") {
        features.push("cli");
    }

    CheckResult {
        name: "compiled_features".to_string(),
        status: CheckStatus::Info,
        detail: features.join(", "),
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("spsprims doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<18} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Info => "INFO",
    }
}
