//! CLI for the Tessera asset registry.
//!
//! `replay`: read NDJSON calls -> execute one at a time -> NDJSON outcomes.
//! `check`: run metadata validation without touching a registry.

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::error::Error;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;
use tessera_core::validation;
use tessera_core::{AssetMetadata, Position, Principal};
use tessera_registry::sink::json_stream::JsonStreamSink;
use tessera_registry::sink::{OutcomeRow, SummaryRow};
use tessera_registry::{Call, Registry};
use tessera_store::{CallContext, FixedIdentity, MemoryStore, SequentialPositions};

#[derive(Parser, Debug)]
#[command(name = "tessera", version, about = "Digital asset registry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a script of calls against a fresh in-memory registry.
    Replay {
        /// NDJSON script, one call per line; "-" reads stdin.
        #[arg(short, long, env = "TESSERA_SCRIPT", default_value = "-")]
        script: String,

        /// Write NDJSON rows to this file instead of stdout.
        #[arg(short, long, env = "TESSERA_OUTPUT")]
        output: Option<String>,

        /// Also emit one row per committed event.
        #[arg(long, default_value_t = false)]
        events: bool,
    },
    /// Validate one metadata set and report every rule.
    Check {
        #[arg(long)]
        name: String,

        #[arg(long)]
        size: u64,

        #[arg(long)]
        description: String,

        /// Repeat for each tag.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

/// One script line: who calls, optionally at which position, and what.
#[derive(Debug, Deserialize)]
struct Step {
    caller: Principal,
    #[serde(default)]
    position: Option<Position>,
    #[serde(flatten)]
    call: Call,
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            output,
            events,
        } => replay(&script, output.as_deref(), events),
        Commands::Check {
            name,
            size,
            description,
            tags,
        } => check(AssetMetadata::new(name, size, description, tags)),
    }
}

fn replay(
    script: &str,
    output: Option<&str>,
    emit_events: bool,
) -> Result<ExitCode, Box<dyn Error>> {
    let input: Box<dyn BufRead> = if script == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(std::fs::File::open(script)?))
    };
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(io::stdout()),
    };

    tracing::info!(script, output = output.unwrap_or("stdout"), "starting replay");
    replay_script(input, writer, emit_events)?;
    Ok(ExitCode::SUCCESS)
}

/// Runs every call in `input` against a fresh in-memory registry and writes
/// one outcome row per call, optional event rows, then a summary row.
///
/// Aborts on an unreadable line or on an explicit position below the next
/// one the sequence would hand out. Rejected calls are rows, not errors.
fn replay_script<R: BufRead, W: Write>(
    input: R,
    output: W,
    emit_events: bool,
) -> Result<SummaryRow, Box<dyn Error>> {
    let mut sink = JsonStreamSink::new(output);
    let mut registry = Registry::open(MemoryStore::new())?.with_journal();
    let positions = SequentialPositions::default();
    let mut summary = SummaryRow::default();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let step: Step = serde_json::from_str(trimmed)
            .map_err(|e| format!("line {line_no}: malformed call: {e}"))?;

        let ctx = match step.position {
            Some(position) => {
                let position = positions.claim(position).map_err(|next| {
                    format!("line {line_no}: position {position} is below next position {next}")
                })?;
                CallContext::new(step.caller, position)
            }
            None => CallContext::capture(&FixedIdentity(step.caller), &positions),
        };

        let op = step.call.name();
        let asset = step.call.asset();
        let result = registry.execute(&ctx, step.call);

        let row = OutcomeRow::from_result(line_no, op, ctx.caller, ctx.position, asset, &result);
        summary.record(&row);
        sink.write_outcome(&row)?;

        let committed = registry.drain_events();
        summary.events += committed.len();
        if emit_events {
            sink.write_events(&committed)?;
        }
    }

    summary.total_registered = registry.total_registered();
    sink.write_summary(&summary)?;
    let rows = sink.finish()?;

    tracing::info!(
        calls = summary.calls,
        succeeded = summary.succeeded,
        rejected = summary.rejected,
        rows,
        "replay complete"
    );

    Ok(summary)
}

fn check(metadata: AssetMetadata) -> Result<ExitCode, Box<dyn Error>> {
    let report = serde_json::json!({
        "name": validation::is_valid_name(&metadata.asset_name),
        "content_size": validation::is_valid_content_size(metadata.content_size),
        "description": validation::is_valid_description(&metadata.asset_description),
        "tags": validation::is_valid_tag_list(&metadata.category_tags),
    });

    match validation::validate_metadata(&metadata) {
        Ok(()) => {
            println!("{}", serde_json::json!({ "valid": true, "rules": report }));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": false,
                    "rules": report,
                    "error_kind": e.kind(),
                    "error": e.to_string(),
                })
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::AssetId;

    #[test]
    fn step_flattens_call_fields() {
        let step: Step = serde_json::from_str(
            r#"{"caller":"0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa","op":"set_permission","asset":1,"principal":"0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb","granted":true}"#,
        )
        .unwrap();

        assert_eq!(step.caller, Principal::repeat_byte(0xaa));
        assert_eq!(step.position, None);
        assert_eq!(
            step.call,
            Call::SetPermission {
                asset: AssetId::new(1),
                principal: Principal::repeat_byte(0xbb),
                granted: true,
            }
        );
    }

    #[test]
    fn step_accepts_explicit_position() {
        let step: Step = serde_json::from_str(
            r#"{"caller":"0x0000000000000000000000000000000000000001","position":77,"op":"get","asset":3}"#,
        )
        .unwrap();
        assert_eq!(step.position, Some(77));
        assert_eq!(step.call.name(), "get");
    }

    const ALICE: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const BOB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    type Replayed = (Result<SummaryRow, String>, Vec<serde_json::Value>);

    fn run(script: &str, emit_events: bool) -> Replayed {
        let mut out = Vec::new();
        let result =
            replay_script(script.as_bytes(), &mut out, emit_events).map_err(|e| e.to_string());
        let rows: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (result, rows)
    }

    fn register_line(caller: &str) -> String {
        format!(
            concat!(
                r#"{{"caller":"{}","op":"register","#,
                r#""name":"doc","content_size":500,"description":"x","tags":["a"]}}"#
            ),
            caller
        )
    }

    #[test]
    fn replay_writes_outcomes_and_summary() {
        let script = [
            "# setup".to_string(),
            register_line(ALICE),
            String::new(),
            format!(r#"{{"caller":"{BOB}","op":"remove","asset":1}}"#),
            format!(r#"{{"caller":"{BOB}","op":"get","asset":1}}"#),
            format!(r#"{{"caller":"{ALICE}","op":"remove","asset":1}}"#),
            format!(r#"{{"caller":"{BOB}","op":"get","asset":1}}"#),
        ]
        .join("\n");

        let (summary, rows) = run(&script, false);
        let summary = summary.unwrap();
        assert_eq!((summary.calls, summary.succeeded, summary.rejected), (5, 4, 1));
        assert_eq!(summary.events, 2);
        assert_eq!(summary.total_registered, 1);

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["line"], 2);
        assert_eq!(rows[0]["output"]["asset"], 1);
        assert_eq!(rows[1]["line"], 4);
        assert_eq!(rows[1]["error_kind"], "ownership_verification_failed");
        assert_eq!(rows[2]["output"]["record"]["asset_name"], "doc");
        assert!(rows[3].get("output").is_none());
        assert_eq!(rows[4]["output"], serde_json::json!({ "record": null }));
        assert_eq!(rows[5]["calls"], 5);
        assert_eq!(rows[5]["events"], 2);
    }

    #[test]
    fn replay_emits_event_rows_when_asked() {
        let grant = format!(
            r#"{{"caller":"{ALICE}","op":"set_permission","asset":1,"principal":"{BOB}","granted":true}}"#
        );
        let script = [register_line(ALICE), grant].join("\n");

        let (summary, rows) = run(&script, true);
        assert_eq!(summary.unwrap().events, 2);

        let kinds: Vec<&str> = rows
            .iter()
            .map(|r| r.get("event").and_then(|e| e.as_str()).unwrap_or("-"))
            .collect();
        assert_eq!(kinds, ["-", "registered", "-", "permission_set", "-"]);
    }

    #[test]
    fn replay_aborts_on_malformed_line() {
        let bad = format!(r#"{{"caller":"{ALICE}","op":"explode"}}"#);
        let script = [register_line(ALICE), bad].join("\n");

        let (result, rows) = run(&script, false);
        let err = result.unwrap_err();
        assert!(err.starts_with("line 2: malformed call"), "{err}");
        // No summary row after an abort.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["op"], "register");
    }

    #[test]
    fn replay_rejects_decreasing_positions() {
        let script = [
            format!(r#"{{"caller":"{ALICE}","position":100,"op":"get","asset":1}}"#),
            format!(r#"{{"caller":"{ALICE}","op":"get","asset":1}}"#),
            format!(r#"{{"caller":"{ALICE}","position":5,"op":"get","asset":1}}"#),
        ]
        .join("\n");

        let (result, _) = run(&script, false);
        assert_eq!(
            result.unwrap_err(),
            "line 3: position 5 is below next position 102"
        );
    }

    #[test]
    fn explicit_positions_must_strictly_increase() {
        let script = [
            format!(r#"{{"caller":"{ALICE}","position":10,"op":"get","asset":1}}"#),
            format!(r#"{{"caller":"{ALICE}","position":10,"op":"get","asset":1}}"#),
        ]
        .join("\n");
        let (result, _) = run(&script, false);
        assert_eq!(
            result.unwrap_err(),
            "line 2: position 10 is below next position 11"
        );

        let script = [
            format!(r#"{{"caller":"{ALICE}","position":10,"op":"get","asset":1}}"#),
            register_line(ALICE),
        ]
        .join("\n");
        let (result, rows) = run(&script, false);
        assert_eq!(result.unwrap().calls, 2);
        assert_eq!(rows[0]["position"], 10);
        assert_eq!(rows[1]["position"], 11);
    }
}
