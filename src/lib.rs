//! apb-classifiers: model training and evaluation for biblical quotation detection.
//!
//! This crate trains binary classifiers that separate genuine quotations of a
//! reference biblical text from incidental textual noise, using precomputed
//! per-verse statistics (token counts, TF-IDF scores, runs-test p-values,
//! similarity measures). It provides CSV loading against a fixed schema,
//! training-set-only standardization, interchangeable model families behind a
//! small trait, and confusion-matrix/ROC reporting helpers used by the demo
//! binaries.
//!
//! The design favors small, testable modules: loading and scaling never look
//! at testing-set statistics, fitted models are read-only, and every
//! evaluation is recomputed from its inputs.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;
pub mod preprocessing;
pub mod quotation_scorer;
pub mod report;
pub mod stats;
