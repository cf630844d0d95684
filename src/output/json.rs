use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use super::{ledger_cases, list_cases};
use crate::cli::Args;
use crate::ledger;
use crate::scanner::{scan, NoopProgress};
use crate::units::Unit;

#[derive(Serialize)]
struct JsonOutput {
    version: u8,
    results: Vec<JsonResult>,
    meta: JsonMeta,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonResult {
    case_id: String,
    bytes: u64,
    files: u64,
    size: f64,
    unit: Unit,
    timestamp: String,
    real_path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMeta {
    results_count: usize,
    run_duration: u64,
    ledger: String,
    malformed_lines: usize,
}

pub fn run(args: &Args, unit: Option<Unit>) -> Result<()> {
    let start = Instant::now();
    let mut results = Vec::new();
    let mut malformed_lines = 0;

    let cases = list_cases(&args.base)
        .with_context(|| format!("Failed to list {}", args.base.display()))?;

    for case in ledger_cases(cases) {
        let measurement = scan(&case.path, unit, &mut NoopProgress)?;
        let outcome = ledger::update(&args.ledger, &case.id, &measurement, &case.path)?;
        malformed_lines += outcome.malformed;

        results.push(JsonResult {
            case_id: case.id,
            bytes: measurement.bytes,
            files: measurement.files,
            size: (measurement.total_size() * 100.0).round() / 100.0,
            unit: measurement.unit,
            timestamp: outcome.record.timestamp,
            real_path: outcome.record.real_path,
        });
    }

    let results_count = results.len();
    let output = JsonOutput {
        version: 1,
        results,
        meta: JsonMeta {
            results_count,
            run_duration: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            ledger: args.ledger.to_string_lossy().to_string(),
            malformed_lines,
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
