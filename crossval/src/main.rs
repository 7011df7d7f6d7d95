//! Command-line runner.
//!
//! Reads argument records as JSON lines (a file path argument, or stdin),
//! runs each through the dispatcher, and prints one JSON report line per
//! case. Exit status is non-zero when any case fails.
//!
//! ```text
//! oxblas-crossval cases.jsonl
//! echo '{"function":"gemm","m":64,"n":64,"k":64}' | oxblas-crossval
//! ```

use anyhow::{Context, Result};
use oxblas_crossval::{run_case, Arguments, TestOutcome};
use serde_json::json;
use std::io::{BufReader, Read};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut input = String::new();
    match std::env::args().nth(1) {
        Some(path) => {
            BufReader::new(
                std::fs::File::open(&path).with_context(|| format!("opening {path}"))?,
            )
            .read_to_string(&mut input)?;
        }
        None => {
            std::io::stdin().lock().read_to_string(&mut input)?;
        }
    }

    let mut failures = 0usize;
    for (lineno, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let args: Arguments = serde_json::from_str(line)
            .with_context(|| format!("parsing case on line {}", lineno + 1))?;
        match run_case(&args) {
            Ok(TestOutcome::Ran(report)) => {
                println!("{}", serde_json::to_string(&report)?);
            }
            Ok(TestOutcome::Skipped) => {
                println!("{}", json!({ "function": args.function, "skipped": true }));
            }
            Ok(TestOutcome::Unsupported) => {
                println!("{}", json!({ "function": args.function, "unsupported": true }));
            }
            Err(err) => {
                failures += 1;
                log::error!("{} failed: {err:#}", args.function);
                println!("{}", json!({ "function": args.function, "error": format!("{err:#}") }));
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} case(s) failed");
    }
    Ok(())
}
