use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::snapshot::{AnalysisSnapshot, TransactionGraph};

pub fn load_snapshot(path: &Path) -> Result<AnalysisSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read analysis result {}", path.display()))?;
    parse_snapshot(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parses an analysis result. A malformed `graph` object is dropped with a
/// warning instead of failing the whole snapshot, so the viewer can still show
/// its empty state next to the summary and ring table.
pub fn parse_snapshot(raw: &str) -> Result<AnalysisSnapshot> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in analysis result")?;
    let Value::Object(mut object) = parsed else {
        return Err(anyhow!("analysis result must be a JSON object"));
    };

    let graph = match object.remove("graph") {
        None | Some(Value::Null) => None,
        Some(value) => match TransactionGraph::deserialize(&value) {
            Ok(graph) => Some(graph),
            Err(error) => {
                tracing::warn!("ignoring malformed graph in analysis result: {error}");
                None
            }
        },
    };

    let mut snapshot = AnalysisSnapshot::deserialize(Value::Object(object))
        .context("unexpected shape for suspicious_accounts, fraud_rings or summary")?;
    snapshot.graph = graph;

    tracing::info!(
        nodes = snapshot.graph.as_ref().map_or(0, |graph| graph.nodes.len()),
        edges = snapshot.graph.as_ref().map_or(0, |graph| graph.edges.len()),
        flagged = snapshot.suspicious_accounts.len(),
        rings = snapshot.fraud_rings.len(),
        "parsed analysis result"
    );

    Ok(snapshot)
}
