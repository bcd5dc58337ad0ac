use std::io::Write;

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::{json, Value as JsonValue};

fn eval(cases: JsonValue, extra_args: &[&str]) -> JsonValue {
    let output = Command::new(assert_cmd::cargo::cargo_bin!("formula-xfunctions-cli"))
        .arg("eval")
        .args(extra_args)
        .write_stdin(cases.to_string())
        .output()
        .expect("run formula-xfunctions-cli");
    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn evaluates_xmatch_and_xlookup_cases() {
    let cases = json!([
        { "function": "XMATCH", "lookupValue": 5, "lookupArray": [5, 3, 5], "searchMode": -1 },
        { "function": "XMATCH", "lookupValue": 99, "lookupArray": [1, 2, 3] },
        { "function": "XMATCH", "lookupValue": 1, "lookupArray": [[1, 2], [3, 4]] },
        {
            "function": "XLOOKUP",
            "lookupValue": "b",
            "lookupArray": [["a"], ["b"], ["c"]],
            "returnArray": [[1, 10], [2, 20], [3, 30]]
        },
        {
            "function": "XLOOKUP",
            "lookupValue": 300,
            "lookupArray": [100, 200, 300],
            "returnRange": { "sheetId": 1, "rowFirst": 1, "rowLast": 4, "colFirst": 1, "colLast": 3 }
        }
    ]);

    let results = eval(cases, &[]);
    assert_eq!(
        results,
        json!([
            { "ok": true, "value": 3 },
            { "ok": false, "error": "#N/A" },
            {
                "ok": false,
                "error": "#VALUE!",
                "detail": "lookup_array must be a single row or a single column"
            },
            { "ok": true, "value": [[2.0, 20.0]] },
            {
                "ok": true,
                "value": {
                    "range": { "sheetId": 1, "rowFirst": 1, "rowLast": 4, "colFirst": 3, "colLast": 3 }
                }
            }
        ])
    );
}

#[test]
fn config_file_overrides_the_match_type_convention() {
    // With the approximate signs swapped, the host's MATCH is asked for "smallest >=" on an
    // ascending vector and finds nothing.
    let mut config = tempfile::NamedTempFile::new().expect("temp config");
    write!(
        config,
        r#"{{"matchType": {{"largestLessOrEqual": -1, "smallestGreaterOrEqual": 1}}}}"#
    )
    .expect("write config");

    let cases = json!([
        { "function": "XMATCH", "lookupValue": 4, "lookupArray": [1, 3, 5], "matchMode": -1, "searchMode": 2 }
    ]);

    let default = eval(cases.clone(), &[]);
    assert_eq!(default, json!([{ "ok": true, "value": 2 }]));

    let path = config.path().to_str().expect("utf-8 temp path");
    let swapped = eval(cases, &["--config", path]);
    assert_eq!(swapped, json!([{ "ok": false, "error": "#N/A" }]));
}

#[test]
fn malformed_cases_fail_with_context() {
    let output = Command::new(assert_cmd::cargo::cargo_bin!("formula-xfunctions-cli"))
        .arg("eval")
        .write_stdin(r#"[{"function": "XLOOKUP", "lookupValue": 1, "lookupArray": [1]}]"#)
        .output()
        .expect("run formula-xfunctions-cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("case 0"), "stderr:\n{stderr}");
}

#[test]
fn inverted_return_ranges_are_normalized() {
    let cases = json!([
        {
            "function": "XLOOKUP",
            "lookupValue": 300,
            "lookupArray": [100, 200, 300],
            "returnRange": { "sheetId": 1, "rowFirst": 4, "rowLast": 1, "colFirst": 3, "colLast": 1 }
        }
    ]);
    assert_eq!(
        eval(cases, &[]),
        json!([{
            "ok": true,
            "value": {
                "range": { "sheetId": 1, "rowFirst": 1, "rowLast": 4, "colFirst": 3, "colLast": 3 }
            }
        }])
    );
}
