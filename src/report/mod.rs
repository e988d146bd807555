pub mod json;
pub mod text;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::FusionConfig;
use crate::model::label::LabelCatalog;
use crate::model::modality::{Modality, modality_order};
use crate::model::scores::GapPolicy;
use crate::pipeline::BatchEntry;
use crate::pipeline::stage5_assemble::FusionResult;
use crate::report::json::{
    AdjustmentStats, DiagnosisStat, SummaryData, ToolMeta, render_results_json,
    render_summary_json,
};
use crate::report::text::render_report_text;

#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub entries: &'a [BatchEntry],
    pub config: &'a FusionConfig,
    pub catalog: &'a LabelCatalog,
    pub tool: ToolMeta,
}

pub fn write_reports(input: &ReportInput<'_>, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    write_results_tsv(input.entries, &out_dir.join("fusion.tsv"))?;

    let results = render_results_json(input.entries).map_err(std::io::Error::other)?;
    write_text(&out_dir.join("fusion.json"), &results)?;

    let summary = build_summary(input);
    let json = render_summary_json(&summary).map_err(std::io::Error::other)?;
    write_text(&out_dir.join("summary.json"), &json)?;

    let report = render_report_text(input.entries, input.config);
    write_text(&out_dir.join("report.txt"), &report)?;

    tracing::info!(
        out_dir = %out_dir.display(),
        n_requests = summary.n_requests,
        n_failed = summary.n_failed,
        "reports written"
    );
    Ok(())
}

fn write_results_tsv(entries: &[BatchEntry], path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let header = [
        "index",
        "id",
        "status",
        "diagnosis",
        "diagnosis_name",
        "confidence",
        "text_weight",
        "image_weight",
        "modalities",
        "excluded",
        "error",
    ]
    .join("\t");
    writeln!(w, "{}", header)?;

    for entry in entries {
        let id = entry.id.clone().unwrap_or_default();
        let row = match &entry.outcome {
            Ok(result) => {
                let modalities = result
                    .modality_scores
                    .keys()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                vec![
                    entry.index.to_string(),
                    id,
                    "ok".to_string(),
                    result.diagnosis.label.to_string(),
                    result.diagnosis.name.clone(),
                    format_f64_6(result.diagnosis.confidence),
                    format_f64_6(weight_used(result, Modality::Text)),
                    format_f64_6(weight_used(result, Modality::Image)),
                    modalities,
                    result.excluded.len().to_string(),
                    String::new(),
                ]
            }
            Err(err) => vec![
                entry.index.to_string(),
                id,
                err.kind().to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                sanitize_field(&err.to_string()),
            ],
        }
        .join("\t");
        writeln!(w, "{}", row)?;
    }
    w.flush()
}

pub fn build_summary(input: &ReportInput<'_>) -> SummaryData {
    let mut n_fused = 0usize;
    let mut single_modality = 0usize;
    let mut excluded_inputs = 0usize;
    let mut failures: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut by_label: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut adjustments = AdjustmentStats::default();

    for entry in input.entries {
        match &entry.outcome {
            Ok(result) => {
                n_fused += 1;
                excluded_inputs += result.excluded.len();
                if result.modality_scores.len() < modality_order().len() {
                    single_modality += 1;
                }
                by_label
                    .entry(result.diagnosis.label.to_string())
                    .or_default()
                    .push(result.diagnosis.confidence);
                for trail in &result.model_scores {
                    match trail.adjustment {
                        GapPolicy::Untouched => adjustments.untouched += 1,
                        GapPolicy::PairSplit { .. } => adjustments.pair_split += 1,
                        GapPolicy::Flattened => adjustments.flattened += 1,
                    }
                }
            }
            Err(err) => *failures.entry(err.kind()).or_insert(0) += 1,
        }
    }

    let mut diagnoses = by_label
        .into_iter()
        .map(|(label, confidences)| {
            let name = input
                .catalog
                .resolve(&label)
                .map(|id| input.catalog.display_name(&id).to_string())
                .unwrap_or_else(|| label.clone());
            DiagnosisStat {
                count: confidences.len(),
                fraction: fraction(confidences.len(), n_fused),
                confidence_median: median(&confidences),
                label,
                name,
            }
        })
        .collect::<Vec<_>>();
    diagnoses.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    let n_requests = input.entries.len();
    SummaryData {
        tool: input.tool.clone(),
        config: input.config.clone(),
        n_requests,
        n_fused,
        n_failed: n_requests - n_fused,
        single_modality_fraction: fraction(single_modality, n_fused),
        excluded_inputs,
        diagnoses,
        failures: failures
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        adjustments,
    }
}

fn weight_used(result: &FusionResult, modality: Modality) -> f64 {
    result.weights_used.get(&modality).copied().unwrap_or(0.0)
}

fn sanitize_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64
}

pub fn quantile_indexed(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    sorted[idx]
}

pub fn median(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.5)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
