use itertools_num::linspace;
use plotly::common::Mode;
use plotly::layout::{Axis, Layout};
use plotly::{Histogram, Plot, Scatter};

use crate::data_handling::LABEL_QUOTATION;
use crate::stats::{RocCurve, RocPoint};

/// Plot a histogram of predicted quotation probabilities, split by true
/// class.
pub fn plot_score_histogram(
    probs: &[f64],
    labels: &[i32],
    title: &str,
) -> Result<Plot, String> {
    if probs.len() != labels.len() {
        return Err("Probabilities and labels must have the same length".to_string());
    }

    let mut scores_quotation = Vec::new();
    let mut scores_noise = Vec::new();

    for (prob, label) in probs.iter().zip(labels.iter()) {
        if *label == LABEL_QUOTATION {
            scores_quotation.push(*prob);
        } else {
            scores_noise.push(*prob);
        }
    }

    let trace_quotation = Histogram::new(scores_quotation).name("Quotation");
    let trace_noise = Histogram::new(scores_noise).name("Noise");

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("Predicted probability"))
        .y_axis(Axis::new().title("Count"));

    let mut plot = Plot::new();
    plot.add_trace(trace_quotation);
    plot.add_trace(trace_noise);
    plot.set_layout(layout);

    Ok(plot)
}

/// Plot an ROC curve with a chance diagonal and markers at representative
/// thresholds.
pub fn plot_roc(curve: &RocCurve, annotated: &[RocPoint], title: &str) -> Result<Plot, String> {
    if curve.is_empty() {
        return Err("ROC curve has no points".to_string());
    }

    // Curve path from the origin through every observed operating point.
    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    for point in curve.iter() {
        fpr.push(point.fpr);
        tpr.push(point.tpr);
    }

    let roc_trace = Scatter::new(fpr, tpr).mode(Mode::Lines).name("ROC");

    let diagonal: Vec<f64> = linspace(0.0, 1.0, 50).collect();
    let chance_trace = Scatter::new(diagonal.clone(), diagonal)
        .mode(Mode::Lines)
        .name("Chance");

    let marker_fpr: Vec<f64> = annotated.iter().map(|p| p.fpr).collect();
    let marker_tpr: Vec<f64> = annotated.iter().map(|p| p.tpr).collect();
    let marker_text: Vec<String> = annotated
        .iter()
        .map(|p| format!("t = {:.2}", p.threshold))
        .collect();
    let marker_trace = Scatter::new(marker_fpr, marker_tpr)
        .mode(Mode::Markers)
        .text_array(marker_text)
        .name("Thresholds");

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("False positive rate"))
        .y_axis(Axis::new().title("True positive rate"));

    let mut plot = Plot::new();
    plot.add_trace(roc_trace);
    plot.add_trace(chance_trace);
    plot.add_trace(marker_trace);
    plot.set_layout(layout);

    Ok(plot)
}
