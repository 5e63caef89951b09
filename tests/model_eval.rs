//! End-to-end tests: scale, fit each model family, and evaluate.

use ndarray::{Array1, Array2};

use apb_classifiers::config::{ModelConfig, ModelType};
use apb_classifiers::data_handling::{
    Dataset, Split, SplitDatasets, VerseMetadata, LABEL_NOISE, LABEL_QUOTATION,
};
use apb_classifiers::error::DataError;
use apb_classifiers::models::factory;
use apb_classifiers::preprocessing::scale_split;
use apb_classifiers::quotation_scorer::{
    compare_models, evaluate, fit_model, predict, roc_curve, DEFAULT_MODEL_FEATURES,
};

const FEATURE_NAMES: [&str; 6] = [
    "tokens",
    "tfidf",
    "proportion",
    "runs_pval",
    "sim_total",
    "sim_mean",
];

/// Deterministic feature vector for one row. Non-token features track the
/// class with a small per-row drift so no training column is degenerate.
fn feature_row(tokens: f64, class: i32, i: usize) -> [f64; 6] {
    let j = i as f64;
    if class == LABEL_QUOTATION {
        [
            tokens,
            4.0 + 0.05 * j,
            0.6 + 0.002 * j,
            0.05 + 0.003 * j,
            30.0 + 0.1 * j,
            0.7 + 0.004 * j,
        ]
    } else {
        [
            tokens,
            1.5 + 0.05 * j,
            0.2 + 0.002 * j,
            0.5 + 0.003 * j,
            10.0 + 0.1 * j,
            0.3 + 0.004 * j,
        ]
    }
}

fn build_dataset(rows: &[(f64, i32)]) -> Dataset {
    let mut features = Vec::with_capacity(rows.len() * 6);
    let mut labels = Vec::with_capacity(rows.len());
    for (i, &(tokens, class)) in rows.iter().enumerate() {
        features.extend_from_slice(&feature_row(tokens, class, i));
        labels.push(class);
    }
    let x = Array2::from_shape_vec((rows.len(), 6), features).unwrap();
    let y = Array1::from_vec(labels);
    let metadata = VerseMetadata {
        verse_id: (0..rows.len()).map(|i| format!("verse_{}", i)).collect(),
        doc_id: (0..rows.len()).map(|i| format!("doc_{}", i)).collect(),
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
    };
    Dataset::new(x, y, metadata).unwrap()
}

/// Short quotations vs. long noise spans, well separated on every feature.
fn separable_split(n_per_class: usize) -> SplitDatasets {
    let mut train_rows = Vec::new();
    let mut test_rows = Vec::new();
    for i in 0..n_per_class {
        let j = i as f64;
        train_rows.push((4.0 + 0.1 * j, LABEL_QUOTATION));
        train_rows.push((45.0 + 0.2 * j, LABEL_NOISE));
        test_rows.push((5.0 + 0.13 * j, LABEL_QUOTATION));
        test_rows.push((48.0 + 0.17 * j, LABEL_NOISE));
    }
    SplitDatasets::new(build_dataset(&train_rows), build_dataset(&test_rows)).unwrap()
}

fn prepared(data: SplitDatasets) -> SplitDatasets {
    let data = data.select_features(&DEFAULT_MODEL_FEATURES).unwrap();
    scale_split(&data).unwrap()
}

fn knn_config(neighbors: usize) -> ModelConfig {
    ModelConfig::new(0.1, ModelType::Knn { neighbors })
}

// ---------------------------------------------------------------------------
// Spec scenario: 4 training rows, perfectly separated token counts
// ---------------------------------------------------------------------------

#[test]
fn nearest_neighbor_perfectly_separates_token_counts() {
    let train = build_dataset(&[
        (5.0, LABEL_QUOTATION),
        (6.0, LABEL_QUOTATION),
        (50.0, LABEL_NOISE),
        (60.0, LABEL_NOISE),
    ]);
    let test = build_dataset(&[(7.0, LABEL_QUOTATION), (55.0, LABEL_NOISE)]);
    let data = prepared(SplitDatasets::new(train, test).unwrap());

    let model = fit_model(knn_config(1), data.training()).unwrap();
    let report = evaluate(model.as_ref(), &data, Split::Training).unwrap();

    assert_eq!(report.accuracy, 1.0);
    assert_eq!(report.auc, 1.0);
    assert_eq!(report.confusion_matrix.fp, 0);
    assert_eq!(report.confusion_matrix.fn_, 0);

    // The held-out rows also fall on the right side of the token gap.
    let test_report = evaluate(model.as_ref(), &data, Split::Testing).unwrap();
    assert_eq!(test_report.accuracy, 1.0);
}

// ---------------------------------------------------------------------------
// Row-order independence
// ---------------------------------------------------------------------------

#[test]
fn evaluation_is_invariant_to_row_order() {
    let data = prepared(separable_split(10));
    let model = fit_model(knn_config(3), data.training()).unwrap();

    let report = evaluate(model.as_ref(), &data, Split::Testing).unwrap();

    // Reverse the testing rows and evaluate again.
    let n = data.testing().n_rows();
    let reversed: Vec<usize> = (0..n).rev().collect();
    let permuted = SplitDatasets::new(
        data.training().clone(),
        data.testing().select_rows(&reversed),
    )
    .unwrap();
    let permuted_report = evaluate(model.as_ref(), &permuted, Split::Testing).unwrap();

    assert_eq!(report.confusion_matrix, permuted_report.confusion_matrix);
    assert_eq!(report.accuracy, permuted_report.accuracy);
    assert!((report.auc - permuted_report.auc).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Predictions and ROC plumbing
// ---------------------------------------------------------------------------

#[test]
fn predictions_join_truth_labels_and_probabilities() {
    let data = prepared(separable_split(5));
    let model = fit_model(knn_config(3), data.training()).unwrap();

    let predictions = predict(model.as_ref(), &data, Split::Testing).unwrap();
    assert_eq!(predictions.len(), data.testing().n_rows());
    for (prediction, &truth) in predictions.iter().zip(data.testing().y.iter()) {
        assert_eq!(prediction.truth, truth);
        assert!((0.0..=1.0).contains(&prediction.prob));
        assert!(prediction.label == LABEL_QUOTATION || prediction.label == LABEL_NOISE);
    }
}

#[test]
fn roc_curve_reaches_the_top_right_corner() {
    let data = prepared(separable_split(5));
    let model = fit_model(knn_config(3), data.training()).unwrap();

    let curve = roc_curve(model.as_ref(), &data, Split::Testing).unwrap();
    assert!(!curve.is_empty());
    let last = curve.points().last().unwrap();
    assert!((last.tpr - 1.0).abs() < 1e-12);
    assert!((last.fpr - 1.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Model families
// ---------------------------------------------------------------------------

#[test]
fn factory_builds_every_family() {
    let names: Vec<String> = [
        "logistic".parse::<ModelType>().unwrap(),
        "tree".parse::<ModelType>().unwrap(),
        "knn".parse::<ModelType>().unwrap(),
    ]
    .into_iter()
    .map(|model_type| {
        factory::build_model(ModelConfig::new(0.1, model_type))
            .name()
            .to_string()
    })
    .collect();

    assert_eq!(names, vec!["logistic_regression", "decision_tree", "knn"]);
}

#[test]
fn all_families_learn_separable_data() {
    let data = prepared(separable_split(20));
    let configs = vec![
        ModelConfig::new(
            0.1,
            ModelType::LogisticRegression {
                penalty: 0.1,
                max_iterations: 200,
            },
        ),
        ModelConfig::new(
            0.3,
            ModelType::DecisionTree {
                max_depth: 3,
                min_leaf_size: 1,
                num_boost_round: 5,
            },
        ),
        ModelConfig::new(0.1, ModelType::Knn { neighbors: 5 }),
    ];

    let results = compare_models(&configs, &data, Split::Testing).unwrap();
    assert_eq!(results.len(), 3);

    let names: Vec<&str> = results.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["logistic_regression", "decision_tree", "knn"]);

    for (name, report) in &results {
        assert!(
            report.accuracy >= 0.9,
            "{} accuracy {} below 0.9 on separable data",
            name,
            report.accuracy
        );
        assert!(
            report.auc >= 0.9,
            "{} auc {} below 0.9 on separable data",
            name,
            report.auc
        );
    }
}

// ---------------------------------------------------------------------------
// Trainer preconditions
// ---------------------------------------------------------------------------

#[test]
fn single_class_training_data_is_rejected() {
    let train = build_dataset(&[(5.0, LABEL_QUOTATION), (6.0, LABEL_QUOTATION)]);
    let err = fit_model(knn_config(1), &train).unwrap_err();
    match err.downcast_ref::<DataError>() {
        Some(DataError::SingleClass) => {}
        other => panic!("expected SingleClass, got {:?}", other),
    }
}

#[test]
fn empty_training_data_is_rejected() {
    let train = build_dataset(&[]);
    assert!(fit_model(knn_config(1), &train).is_err());
}
