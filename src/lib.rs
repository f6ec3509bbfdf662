//! Reshapes advertising-performance exports into bandit-ready tables.
//!
//! Tables are Arrow [`RecordBatch`](arrow::record_batch::RecordBatch)es. The
//! [`prepare`] module holds the three stages (normalize, index options, add
//! recency); [`ingest`] and [`config`] are thin edges for reading CSV exports
//! and YAML settings.

pub mod config;
pub mod error;
pub mod ingest;
pub mod prepare;

pub use config::{PrepConfig, Weights};
pub use error::PrepError;
pub use prepare::{prepare_for_bandit, prepare_with_config, Prepared};
