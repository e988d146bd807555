use crate::config::FusionConfig;
use crate::model::modality::modality_order;
use crate::model::scores::ModelScoreMap;
use crate::pipeline::BatchEntry;
use crate::pipeline::stage5_assemble::{FusionResult, ModelTrail};
use crate::report::format_f64_6;

pub fn render_report_text(entries: &[BatchEntry], config: &FusionConfig) -> String {
    let mut out = String::new();

    out.push_str("Multi-Model Diagnosis Fusion Report\n");
    out.push_str("===================================\n\n");

    out.push_str("Scoring rules\n");
    out.push_str("- Each model's top-3 labels receive 3, 2 and 1 points.\n");
    out.push_str(&format!(
        "- A pair is close when |p_i - p_j| / mean(p_i, p_j) <= {}.\n",
        format_f64_6(config.gap_threshold)
    ));
    out.push_str("- All three pairs close: every label gets 2 points.\n");
    out.push_str(
        "- One close pair (the closer one when two are close): the pair shares its points evenly.\n",
    );
    out.push_str(&format!(
        "- Modality weights: text {}, image {}; rescaled to sum to 1 when a modality is missing.\n",
        format_f64_6(config.weights.text),
        format_f64_6(config.weights.image)
    ));
    out.push_str(
        "- Equal fused scores: higher points in the top-weighted modality, then label id.\n\n",
    );

    for entry in entries {
        let title = match &entry.id {
            Some(id) => format!("Request {} ({})", entry.index, id),
            None => format!("Request {}", entry.index),
        };
        out.push_str(&title);
        out.push('\n');
        out.push_str(&"-".repeat(title.len()));
        out.push('\n');
        match &entry.outcome {
            Ok(result) => render_result(&mut out, result),
            Err(err) => out.push_str(&format!("Failed: {}\n", err)),
        }
        out.push('\n');
    }

    out
}

fn render_result(out: &mut String, result: &FusionResult) {
    if let Some(preset) = &result.preset {
        out.push_str(&format!("Preset: {}\n", preset));
    }
    out.push_str(&format!(
        "Diagnosis: {} ({}), fused score {}\n",
        result.diagnosis.label,
        result.diagnosis.name,
        format_f64_6(result.diagnosis.confidence)
    ));

    let weights = modality_order()
        .iter()
        .filter_map(|m| {
            result
                .weights_used
                .get(m)
                .map(|w| format!("{} {}", m, format_f64_6(*w)))
        })
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!("Weights used: {}\n", weights));

    for trail in &result.model_scores {
        render_trail(out, trail);
    }

    for (modality, scores) in &result.modality_scores {
        let line = scores
            .iter()
            .map(|(label, points)| format!("{}={}", label, points))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!("{} modality: {}\n", modality, line));
    }

    let ranking = result
        .top_predictions
        .iter()
        .map(|r| format!("{} {}", r.label, format_f64_6(r.score)))
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!("Top predictions: {}\n", ranking));

    for excluded in &result.excluded {
        match &excluded.model {
            Some(model) => out.push_str(&format!(
                "Excluded {} / {}: {}\n",
                excluded.modality, model, excluded.reason
            )),
            None => out.push_str(&format!(
                "Excluded {}: {}\n",
                excluded.modality, excluded.reason
            )),
        }
    }
}

fn render_trail(out: &mut String, trail: &ModelTrail) {
    out.push_str(&format!(
        "  {} / {}: {}\n",
        trail.modality,
        trail.model,
        trail.adjustment.describe()
    ));
    for (rank, entry) in trail.top3.entries().iter().enumerate() {
        out.push_str(&format!(
            "    #{} {} p={} points {} -> {}\n",
            rank + 1,
            entry.label,
            format_f64_6(entry.probability),
            points_at(&trail.initial, rank),
            points_at(&trail.adjusted, rank)
        ));
    }
    out.push_str(&format!(
        "    gaps 1-2 {} | 1-3 {} | 2-3 {}\n",
        format_f64_6(trail.gaps[0]),
        format_f64_6(trail.gaps[1]),
        format_f64_6(trail.gaps[2])
    ));
}

fn points_at(scores: &ModelScoreMap, rank: usize) -> String {
    scores.entries()[rank].points.to_string()
}
