use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use formula_xfunctions::{
    ArgValue, Array, EngineConfig, ErrorKind, LookupError, MatchOutcome, Projected, RangeRef,
    ReferenceHost, Value, XFunctions,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "formula-xfunctions-cli")]
#[command(about = "Evaluate XMATCH / XLOOKUP cases against the reference host and emit deterministic JSON.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a JSON array of cases and print one result per case.
    Eval(EvalArgs),
}

#[derive(Debug, Parser)]
struct EvalArgs {
    /// Optional input file path. If omitted, reads the cases from stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Engine configuration as JSON (e.g. `{"matchType": {"largestLessOrEqual": 1}}`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum FunctionName {
    Xmatch,
    Xlookup,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Case {
    function: FunctionName,
    #[serde(default)]
    lookup_value: Option<JsonValue>,
    lookup_array: JsonValue,
    #[serde(default)]
    return_array: Option<JsonValue>,
    #[serde(default)]
    return_range: Option<RangeRef>,
    #[serde(default)]
    match_mode: Option<JsonValue>,
    #[serde(default)]
    search_mode: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseResult {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Human-readable reason for `#VALUE!` results.
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl CaseResult {
    fn value(value: JsonValue) -> Self {
        Self {
            ok: true,
            value: Some(value),
            error: None,
            detail: None,
        }
    }

    fn error(kind: ErrorKind, detail: Option<String>) -> Self {
        Self {
            ok: false,
            value: None,
            error: Some(kind.as_code().to_string()),
            detail,
        }
    }
}

fn main() {
    init_logging();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    // `log` records from the engine are bridged into the subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Eval(args) => eval(args),
    }
}

fn eval(args: EvalArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str::<EngineConfig>(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let input = read_input(args.input.as_ref())?;
    let cases: Vec<Case> = serde_json::from_str(&input).context("parse cases")?;
    log::debug!("evaluating {} cases", cases.len());

    let fns = XFunctions::with_config(ReferenceHost::new(), config);
    let mut results = Vec::with_capacity(cases.len());
    for (idx, case) in cases.into_iter().enumerate() {
        let result = eval_case(&fns, case).with_context(|| format!("case {idx}"))?;
        results.push(result);
    }

    let report = if args.pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    write_stdout(&report)
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("read cases from stdin")?;
            Ok(buf)
        }
    }
}

/// A closed stdout (e.g. piping into `head`) is not an error.
fn write_stdout(report: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match writeln!(stdout, "{report}").and_then(|()| stdout.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("write report"),
    }
}

fn eval_case(fns: &XFunctions<ReferenceHost>, case: Case) -> Result<CaseResult> {
    let lookup_value = optional_arg(case.lookup_value)?;
    let lookup_array = json_to_arg(case.lookup_array)?;
    let match_mode = optional_arg(case.match_mode)?;
    let search_mode = optional_arg(case.search_mode)?;

    let result = match case.function {
        FunctionName::Xmatch => {
            match fns.xmatch(lookup_value, lookup_array, match_mode, search_mode) {
                MatchOutcome::Found(pos) => CaseResult::value(JsonValue::from(pos)),
                MatchOutcome::NotFound => CaseResult::error(ErrorKind::NA, None),
                MatchOutcome::InvalidRequest(reason) => {
                    CaseResult::error(reason.error_kind(), Some(reason.to_string()))
                }
            }
        }
        FunctionName::Xlookup => {
            let return_array = match (case.return_array, case.return_range) {
                (Some(_), Some(_)) => bail!("returnArray and returnRange are mutually exclusive"),
                (Some(json), None) => json_to_arg(json)?,
                (None, Some(range)) => ArgValue::Reference(range),
                (None, None) => bail!("XLOOKUP needs returnArray or returnRange"),
            };
            match fns.xlookup(lookup_value, lookup_array, return_array, match_mode, search_mode) {
                Ok(projected) => CaseResult::value(projected_to_json(projected)?),
                Err(LookupError::NotApplicable) => CaseResult::error(ErrorKind::NA, None),
                Err(err) => CaseResult::error(err.error_kind(), Some(err.to_string())),
            }
        }
    };
    Ok(result)
}

fn optional_arg(json: Option<JsonValue>) -> Result<ArgValue> {
    match json {
        None => Ok(ArgValue::Missing),
        Some(json) => json_to_arg(json),
    }
}

/// Scalars become single values, a flat array a single row, and nested arrays a 2D block.
fn json_to_arg(json: JsonValue) -> Result<ArgValue> {
    let JsonValue::Array(items) = json else {
        return Ok(ArgValue::Scalar(json_to_value(json)?));
    };
    if !items.iter().any(JsonValue::is_array) {
        let row = items.into_iter().map(json_to_value).collect::<Result<Vec<_>>>()?;
        return Ok(ArgValue::Array(Array::row(row)));
    }

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let JsonValue::Array(cells) = item else {
            bail!("2D arrays must contain only rows");
        };
        rows.push(cells.into_iter().map(json_to_value).collect::<Result<Vec<_>>>()?);
    }
    match Array::from_rows(rows) {
        Some(arr) => Ok(ArgValue::Array(arr)),
        None => bail!("2D array rows must all have the same length"),
    }
}

fn json_to_value(json: JsonValue) -> Result<Value> {
    Ok(match json {
        JsonValue::Null => Value::Blank,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => match n.as_f64() {
            Some(n) => Value::Number(n),
            None => bail!("number {n} is not representable as f64"),
        },
        JsonValue::String(s) => match ErrorKind::from_code(&s) {
            Some(kind) => Value::Error(kind),
            None => Value::Text(s),
        },
        JsonValue::Array(_) | JsonValue::Object(_) => bail!("expected a scalar cell value"),
    })
}

fn value_to_json(value: Value) -> JsonValue {
    match value {
        Value::Number(n) => JsonValue::from(n),
        Value::Text(s) => JsonValue::String(s),
        Value::Bool(b) => JsonValue::Bool(b),
        Value::Blank => JsonValue::Null,
        Value::Error(e) => JsonValue::String(e.as_code().to_string()),
    }
}

fn projected_to_json(projected: Projected) -> Result<JsonValue> {
    Ok(match projected {
        Projected::Value(value) => value_to_json(value),
        Projected::Array(arr) => JsonValue::Array(
            arr.iter_rows()
                .map(|row| JsonValue::Array(row.iter().cloned().map(value_to_json).collect()))
                .collect(),
        ),
        Projected::Reference(range) => serde_json::json!({ "range": serde_json::to_value(range)? }),
    })
}
