//! Machine-readable output for replayed calls.
//!
//! Three row schemas:
//! - [`OutcomeRow`] — one per executed call, success or rejection
//! - [`RegistryEvent`](tessera_core::RegistryEvent) — one per committed mutation
//! - [`SummaryRow`] — one per replay
//!
//! Rows are written as NDJSON by [`json_stream::JsonStreamSink`].

pub mod json_stream;

use crate::CallOutput;
use serde::Serialize;
use tessera_core::{AssetId, Position, Principal, RegistryError};

/// One row per executed call.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRow {
    /// 1-based line number in the source script.
    pub line: usize,
    pub op: &'static str,
    pub caller: Principal,
    pub position: Position,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetId>,
    /// Absent for calls that return nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CallOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutcomeRow {
    pub fn from_result(
        line: usize,
        op: &'static str,
        caller: Principal,
        position: Position,
        asset: Option<AssetId>,
        result: &Result<CallOutput, RegistryError>,
    ) -> Self {
        let mut row = Self {
            line,
            op,
            caller,
            position,
            ok: result.is_ok(),
            asset,
            output: None,
            error_kind: None,
            error: None,
        };
        match result {
            Ok(CallOutput::Done) => {}
            Ok(output) => {
                if let CallOutput::Registered { asset } = output {
                    row.asset = Some(*asset);
                }
                row.output = Some(output.clone());
            }
            Err(e) => {
                row.error_kind = Some(e.kind());
                row.error = Some(e.to_string());
            }
        }
        row
    }
}

/// One row per replay — totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryRow {
    pub calls: usize,
    pub succeeded: usize,
    pub rejected: usize,
    pub events: usize,
    pub total_registered: u64,
}

impl SummaryRow {
    pub fn record(&mut self, outcome: &OutcomeRow) {
        self.calls += 1;
        if outcome.ok {
            self.succeeded += 1;
        } else {
            self.rejected += 1;
        }
    }
}
