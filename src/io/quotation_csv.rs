//! CSV reader for the precomputed quotation-feature tables.
//!
//! The files carry a header row and nine named columns: two string
//! identifiers, one two-level label, one integer count, and five real-valued
//! scores. Column order is not significant; names (case-insensitive) and
//! declared types are. Any schema violation aborts the load with enough
//! context to fix the offending cell.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array2};

use crate::data_handling::{Dataset, VerseMetadata, LABEL_NOISE, LABEL_QUOTATION};
use crate::error::DataError;

/// Parsed feature table ready for model training or evaluation.
#[derive(Debug)]
pub struct QuotationData {
    pub x: Array2<f64>,
    pub y: Array1<i32>,
    pub metadata: VerseMetadata,
}

/// Configuration for reading quotation-feature CSV files.
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// Column holding the quotation/noise labels.
    pub label_column: String,
    /// Column identifying the biblical verse.
    pub verse_id_column: String,
    /// Column identifying the source document.
    pub doc_id_column: String,
    /// Feature columns to load, in matrix column order.
    pub feature_columns: Vec<String>,
    /// Feature columns coerced as integers rather than reals.
    pub integer_columns: Vec<String>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            label_column: "match".to_string(),
            verse_id_column: "verse_id".to_string(),
            doc_id_column: "doc_id".to_string(),
            feature_columns: vec![
                "tokens".to_string(),
                "tfidf".to_string(),
                "proportion".to_string(),
                "runs_pval".to_string(),
                "sim_total".to_string(),
                "sim_mean".to_string(),
            ],
            integer_columns: vec!["tokens".to_string()],
        }
    }
}

/// Read a quotation-feature CSV file into arrays and metadata.
pub fn read_quotation_csv<P: AsRef<Path>>(path: P) -> Result<QuotationData> {
    read_quotation_csv_with_config(path, &CsvReaderConfig::default())
}

/// Read a quotation-feature CSV file using a custom configuration.
pub fn read_quotation_csv_with_config<P: AsRef<Path>>(
    path: P,
    config: &CsvReaderConfig,
) -> Result<QuotationData> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open CSV file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| DataError::MissingColumn(config.label_column.clone()))?;
    let verse_idx = find_column(&headers, &config.verse_id_column)
        .ok_or_else(|| DataError::MissingColumn(config.verse_id_column.clone()))?;
    let doc_idx = find_column(&headers, &config.doc_id_column)
        .ok_or_else(|| DataError::MissingColumn(config.doc_id_column.clone()))?;

    let mut feature_indices = Vec::with_capacity(config.feature_columns.len());
    for name in &config.feature_columns {
        let idx =
            find_column(&headers, name).ok_or_else(|| DataError::MissingColumn(name.clone()))?;
        feature_indices.push(idx);
    }

    let integer_columns: HashSet<String> = config
        .integer_columns
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();

    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut verse_ids = Vec::new();
    let mut doc_ids = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Failed to read row {}", row))?;

        labels.push(parse_label(cell(&record, label_idx), row)?);
        verse_ids.push(cell(&record, verse_idx).trim().to_string());
        doc_ids.push(cell(&record, doc_idx).trim().to_string());

        for &idx in &feature_indices {
            let column = headers.get(idx).unwrap_or("");
            let value = cell(&record, idx).trim();
            let parsed = if integer_columns.contains(&column.to_ascii_lowercase()) {
                value.parse::<i64>().map(|v| v as f64)
            } else {
                value.parse::<f64>()
            }
            .map_err(|_| DataError::InvalidValue {
                column: column.to_string(),
                row,
                value: value.to_string(),
            })?;
            if !parsed.is_finite() {
                return Err(DataError::InvalidValue {
                    column: column.to_string(),
                    row,
                    value: value.to_string(),
                }
                .into());
            }
            features.push(parsed);
        }
    }

    let n_samples = labels.len();
    let n_features = feature_indices.len();
    let x = Array2::from_shape_vec((n_samples, n_features), features)
        .context("Failed to build feature matrix")?;
    let y = Array1::from_vec(labels);

    let feature_names = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    log::info!(
        "Loaded {} rows and {} feature columns from {}",
        n_samples,
        n_features,
        path.as_ref().display()
    );

    Ok(QuotationData {
        x,
        y,
        metadata: VerseMetadata {
            verse_id: verse_ids,
            doc_id: doc_ids,
            feature_names,
        },
    })
}

/// Convenience helper to directly build a `Dataset` from a CSV file.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let data = read_quotation_csv(path)?;
    Ok(Dataset::new(data.x, data.y, data.metadata)?)
}

fn cell<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or_default()
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn parse_label(raw: &str, row: usize) -> Result<i32, DataError> {
    match raw.trim() {
        "quotation" => Ok(LABEL_QUOTATION),
        "noise" => Ok(LABEL_NOISE),
        other => Err(DataError::UnknownLabel {
            row,
            value: other.to_string(),
        }),
    }
}
