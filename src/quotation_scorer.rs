//! End-to-end helpers tying the loader, scaler, models, and statistics
//! together: fit a configured model, join predictions with true labels, and
//! derive accuracy reports and ROC curves for a chosen split.
use anyhow::Result;

use crate::config::ModelConfig;
use crate::data_handling::{Dataset, Split, SplitDatasets};
use crate::error::DataError;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory;
use crate::stats::{auc, AccuracyReport, ConfusionMatrix, RocCurve};

/// Predictors used by the default modeling formula. `sim_total` is loaded
/// and scaled but stays out of the formula.
pub const DEFAULT_MODEL_FEATURES: [&str; 5] =
    ["tokens", "tfidf", "proportion", "runs_pval", "sim_mean"];

/// Representative thresholds annotated on ROC plots.
pub const ROC_ANNOTATION_THRESHOLDS: [f64; 5] = [0.5, 0.6, 0.7, 0.8, 0.9];

/// One row's evaluation output: the true label joined with the predicted
/// class and the predicted quotation probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub truth: i32,
    pub label: i32,
    pub prob: f64,
}

/// Fit a model of the configured family on the training dataset.
///
/// Fails before fitting when the training data is empty or contains a single
/// class; the model families themselves assume two classes.
pub fn fit_model(config: ModelConfig, train: &Dataset) -> Result<Box<dyn ClassifierModel>> {
    if train.n_rows() == 0 {
        return Err(DataError::NotEnoughRows(0).into());
    }
    if train.quotation_count() == 0 || train.noise_count() == 0 {
        return Err(DataError::SingleClass.into());
    }

    let mut model = factory::build_model(config);
    let y = train.y.to_vec();
    model.fit(&train.x, &y)?;
    Ok(model)
}

/// Predict labels and quotation probabilities for every record in the chosen
/// split, joined with the true labels. Row order is preserved; no state is
/// modified.
pub fn predict(
    model: &dyn ClassifierModel,
    data: &SplitDatasets,
    split: Split,
) -> Result<Vec<Prediction>> {
    let dataset = data.select(split);
    let labels = model.predict(&dataset.x)?;
    let probs = model.predict_proba(&dataset.x)?;

    Ok(dataset
        .y
        .iter()
        .zip(labels.into_iter())
        .zip(probs.into_iter())
        .map(|((&truth, label), prob)| Prediction { truth, label, prob })
        .collect())
}

/// Confusion-matrix summary statistics and AUC for the chosen split.
pub fn evaluate(
    model: &dyn ClassifierModel,
    data: &SplitDatasets,
    split: Split,
) -> Result<AccuracyReport> {
    let predictions = predict(model, data, split)?;
    report_from_predictions(&predictions)
}

/// Derive an `AccuracyReport` from already-joined predictions.
pub fn report_from_predictions(predictions: &[Prediction]) -> Result<AccuracyReport> {
    let truth: Vec<i32> = predictions.iter().map(|p| p.truth).collect();
    let labels: Vec<i32> = predictions.iter().map(|p| p.label).collect();
    let probs: Vec<f64> = predictions.iter().map(|p| p.prob).collect();

    let cm = ConfusionMatrix::from_labels(&truth, &labels)?;
    Ok(AccuracyReport::new(cm, auc(&truth, &probs)))
}

/// ROC curve over every observed probability value in the chosen split.
pub fn roc_curve(
    model: &dyn ClassifierModel,
    data: &SplitDatasets,
    split: Split,
) -> Result<RocCurve> {
    let predictions = predict(model, data, split)?;
    let truth: Vec<i32> = predictions.iter().map(|p| p.truth).collect();
    let probs: Vec<f64> = predictions.iter().map(|p| p.prob).collect();
    Ok(RocCurve::from_scores(&truth, &probs)?)
}

/// Fit every configured model family on the training split and evaluate each
/// on the chosen split, returning one report per family.
///
/// This makes the compare-the-models workflow an explicit, reproducible loop
/// instead of manual re-invocation with a different family each time.
pub fn compare_models(
    configs: &[ModelConfig],
    data: &SplitDatasets,
    split: Split,
) -> Result<Vec<(String, AccuracyReport)>> {
    let mut results = Vec::with_capacity(configs.len());
    for config in configs {
        let model = fit_model(config.clone(), data.training())?;
        let report = evaluate(model.as_ref(), data, split)?;
        log::info!(
            "{}: accuracy {:.4}, auc {:.4}",
            model.name(),
            report.accuracy,
            report.auc
        );
        results.push((model.name().to_string(), report));
    }
    Ok(results)
}
