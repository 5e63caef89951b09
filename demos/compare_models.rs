//! Train every model family on the quotation data and compare accuracy.
//!
//! Usage: `compare_models [training.csv testing.csv]`. Without arguments a
//! synthetic train/test pair is generated so the demo runs standalone; with
//! arguments the two CSV files must carry the nine-column schema
//! (`verse_id`, `doc_id`, `match`, `tokens`, `tfidf`, `proportion`,
//! `runs_pval`, `sim_total`, `sim_mean`).
use anyhow::Result;
use maud::html;
use ndarray::{Array1, Array2};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;

use apb_classifiers::config::{ModelConfig, ModelType};
use apb_classifiers::data_handling::{
    Dataset, Split, SplitDatasets, VerseMetadata, LABEL_NOISE, LABEL_QUOTATION,
};
use apb_classifiers::io::read_dataset;
use apb_classifiers::preprocessing::scale_split;
use apb_classifiers::quotation_scorer::{
    evaluate, fit_model, predict, roc_curve, DEFAULT_MODEL_FEATURES, ROC_ANNOTATION_THRESHOLDS,
};
use apb_classifiers::report::plots::{plot_roc, plot_score_histogram};
use apb_classifiers::report::{Report, ReportSection};

const FEATURE_NAMES: [&str; 6] = [
    "tokens",
    "tfidf",
    "proportion",
    "runs_pval",
    "sim_total",
    "sim_mean",
];

/// Per-class feature distributions for the synthetic fallback data, as
/// (mean, std) per feature in `FEATURE_NAMES` order.
const QUOTATION_DISTRIBUTIONS: [(f64, f64); 6] = [
    (9.0, 3.0),
    (4.0, 1.2),
    (0.6, 0.15),
    (0.05, 0.03),
    (30.0, 8.0),
    (0.7, 0.1),
];
const NOISE_DISTRIBUTIONS: [(f64, f64); 6] = [
    (25.0, 10.0),
    (1.5, 0.8),
    (0.2, 0.1),
    (0.5, 0.2),
    (10.0, 5.0),
    (0.3, 0.1),
];

fn synthetic_dataset(n_per_class: usize, seed: u64) -> Result<Dataset> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut features = Vec::with_capacity(n_per_class * 2 * FEATURE_NAMES.len());
    let mut labels = Vec::with_capacity(n_per_class * 2);
    let mut verse_ids = Vec::with_capacity(n_per_class * 2);
    let mut doc_ids = Vec::with_capacity(n_per_class * 2);

    for (class, distributions) in [
        (LABEL_QUOTATION, &QUOTATION_DISTRIBUTIONS),
        (LABEL_NOISE, &NOISE_DISTRIBUTIONS),
    ] {
        for i in 0..n_per_class {
            for (feature, &(mean, std)) in FEATURE_NAMES.iter().zip(distributions.iter()) {
                let dist = Normal::new(mean, std)?;
                let mut value = dist.sample(&mut rng);
                // token counts are integers, probabilities live in [0, 1]
                if *feature == "tokens" {
                    value = value.round().max(1.0);
                } else if *feature == "runs_pval" || *feature == "proportion" {
                    value = value.clamp(0.0, 1.0);
                }
                features.push(value);
            }
            labels.push(class);
            let tag = if class == LABEL_QUOTATION { "q" } else { "n" };
            verse_ids.push(format!("verse_{}_{}", tag, i));
            doc_ids.push(format!("doc_{}", i % 17));
        }
    }

    let n_rows = labels.len();
    let x = Array2::from_shape_vec((n_rows, FEATURE_NAMES.len()), features)?;
    let y = Array1::from_vec(labels);
    let metadata = VerseMetadata {
        verse_id: verse_ids,
        doc_id: doc_ids,
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
    };
    Ok(Dataset::new(x, y, metadata)?)
}

fn model_configs() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new(
            0.1,
            ModelType::LogisticRegression {
                penalty: 1.0,
                max_iterations: 200,
            },
        ),
        ModelConfig::new(
            0.3,
            ModelType::DecisionTree {
                max_depth: 6,
                min_leaf_size: 2,
                num_boost_round: 1,
            },
        ),
        ModelConfig::new(0.1, ModelType::Knn { neighbors: 7 }),
    ]
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let (training, testing) = if args.len() >= 3 {
        (read_dataset(&args[1])?, read_dataset(&args[2])?)
    } else {
        log::info!("No CSV paths given; generating synthetic train/test data");
        (synthetic_dataset(120, 42)?, synthetic_dataset(60, 1042)?)
    };
    training.log_summary("training");
    testing.log_summary("testing");

    let data = SplitDatasets::new(training, testing)?;
    let data = data.select_features(&DEFAULT_MODEL_FEATURES)?;
    let data = scale_split(&data)?;

    let mut report = Report::new(
        "Quotation Model Comparison",
        "Logistic regression, decision tree, and k-NN on the held-out testing split",
    );
    let mut summary = ReportSection::new("Summary");
    let mut summary_rows: Vec<(String, f64, f64, f64, f64)> = Vec::new();

    for config in model_configs() {
        let model = fit_model(config, data.training())?;
        let accuracy = evaluate(model.as_ref(), &data, Split::Testing)?;

        println!("=== {} ===", model.name());
        println!("{}", accuracy.format());

        let predictions = predict(model.as_ref(), &data, Split::Testing)?;
        let probs: Vec<f64> = predictions.iter().map(|p| p.prob).collect();
        let truth: Vec<i32> = predictions.iter().map(|p| p.truth).collect();
        let curve = roc_curve(model.as_ref(), &data, Split::Testing)?;
        let annotated = curve.annotate(&ROC_ANNOTATION_THRESHOLDS);

        let mut section = ReportSection::new(model.name());
        section.add_content(html! {
            pre { (accuracy.format()) }
        });
        let histogram = plot_score_histogram(
            &probs,
            &truth,
            &format!("{} score distribution", model.name()),
        )
        .map_err(anyhow::Error::msg)?;
        section.add_plot(histogram);
        let roc_plot = plot_roc(&curve, &annotated, &format!("{} ROC", model.name()))
            .map_err(anyhow::Error::msg)?;
        section.add_plot(roc_plot);
        report.add_section(section);

        summary_rows.push((
            model.name().to_string(),
            accuracy.accuracy,
            accuracy.sensitivity,
            accuracy.specificity,
            accuracy.auc,
        ));
    }

    summary.add_content(html! {
        table {
            tr {
                th { "Model" }
                th { "Accuracy" }
                th { "Sensitivity" }
                th { "Specificity" }
                th { "AUC" }
            }
            @for (name, accuracy, sensitivity, specificity, auc) in &summary_rows {
                tr {
                    td { (name) }
                    td { (format!("{:.4}", accuracy)) }
                    td { (format!("{:.4}", sensitivity)) }
                    td { (format!("{:.4}", specificity)) }
                    td { (format!("{:.4}", auc)) }
                }
            }
        }
    });
    report.add_section(summary);

    report.save_to_file("model-comparison.html")?;
    println!("Report saved to model-comparison.html");

    Ok(())
}
