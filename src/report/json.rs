use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::FusionConfig;
use crate::pipeline::BatchEntry;
use crate::pipeline::stage5_assemble::FusionResult;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisStat {
    pub label: String,
    pub name: String,
    pub count: usize,
    pub fraction: f64,
    pub confidence_median: f64,
}

/// Gap-adjustment policies applied across every scored model.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdjustmentStats {
    pub untouched: usize,
    pub pair_split: usize,
    pub flattened: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub config: FusionConfig,
    pub n_requests: usize,
    pub n_fused: usize,
    pub n_failed: usize,
    pub single_modality_fraction: f64,
    pub excluded_inputs: usize,
    pub diagnoses: Vec<DiagnosisStat>,
    pub failures: BTreeMap<String, usize>,
    pub adjustments: AdjustmentStats,
}

#[derive(Debug, Serialize)]
struct EntryJson<'a> {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a FusionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn render_results_json(entries: &[BatchEntry]) -> serde_json::Result<String> {
    let rows = entries
        .iter()
        .map(|entry| match &entry.outcome {
            Ok(result) => EntryJson {
                index: entry.index,
                id: entry.id.as_deref(),
                status: "ok",
                result: Some(result),
                error: None,
            },
            Err(err) => EntryJson {
                index: entry.index,
                id: entry.id.as_deref(),
                status: err.kind(),
                result: None,
                error: Some(err.to_string()),
            },
        })
        .collect::<Vec<_>>();
    serde_json::to_string_pretty(&rows)
}

pub fn render_summary_json(data: &SummaryData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}
