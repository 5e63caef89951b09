//! IO utilities for loading the precomputed feature tables.

pub mod quotation_csv;

pub use quotation_csv::{
    read_dataset, read_quotation_csv, read_quotation_csv_with_config, CsvReaderConfig,
    QuotationData,
};
