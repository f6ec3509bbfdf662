// src/prepare/mod.rs
pub mod columns;
pub mod convert;
pub mod date_parser;
pub mod normalize;
pub mod options;
pub mod recency;
pub mod utils;

pub use normalize::normalize;
pub use options::index_options;
pub use recency::{add_days_ago, add_days_ago_from_today};

use crate::config::{PrepConfig, Weights};
use crate::error::PrepError;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use tracing::info;

/// Output of a full run: the distinct options and the annotated rows.
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Descriptive columns only; row position is the `option_id`.
    pub options: RecordBatch,
    /// Normalized rows with `option_id` and `days_ago` appended.
    pub data: RecordBatch,
}

/// Normalize → index options → add `days_ago` relative to `today`.
#[tracing::instrument(level = "info", skip(batch, weights), fields(rows = batch.num_rows()))]
pub fn prepare_for_bandit(
    batch: &RecordBatch,
    weights: &Weights,
    today: NaiveDate,
) -> Result<Prepared, PrepError> {
    let normalized = normalize(batch, weights)?;
    let (options, indexed) = index_options(&normalized)?;
    let data = add_days_ago(&indexed, today)?;
    info!(
        rows = data.num_rows(),
        options = options.num_rows(),
        "prepared for bandit"
    );
    Ok(Prepared { options, data })
}

/// [`prepare_for_bandit`] with weights and reference date taken from `cfg`.
pub fn prepare_with_config(batch: &RecordBatch, cfg: &PrepConfig) -> Result<Prepared, PrepError> {
    prepare_for_bandit(batch, &cfg.weights, cfg.reference_date_or_today())
}

#[cfg(test)]
pub(crate) mod testing {
    use arrow::{
        array::{ArrayRef, StringArray},
        datatypes::{DataType, Field, Schema},
        record_batch::RecordBatch,
    };
    use std::sync::Arc;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    pub fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,bandit_prep=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    /// All-Utf8 batch, the shape a CSV export arrives in.
    pub fn string_batch(cols: Vec<(&str, Vec<Option<&str>>)>) -> RecordBatch {
        let fields: Vec<Field> = cols
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
            .collect();
        let arrays: Vec<ArrayRef> = cols
            .into_iter()
            .map(|(_, values)| Arc::new(StringArray::from(values)) as ArrayRef)
            .collect();
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{init_test_logging, string_batch};
    use super::*;
    use arrow::array::AsArray;
    use arrow::datatypes::{Date32Type, Int64Type, UInt64Type};

    fn example() -> RecordBatch {
        string_batch(vec![
            ("ad_id", vec![Some("A1")]),
            ("date", vec![Some("2024-01-01")]),
            ("impressions", vec![Some("100")]),
            ("engagements", vec![Some("10")]),
            ("clicks", vec![Some("5")]),
            ("conversions", vec![Some("2")]),
        ])
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        init_test_logging();
        let prepared = prepare_for_bandit(
            &example(),
            &Weights::new(1.0, 1.0, 1.0).unwrap(),
            ymd(2024, 1, 5),
        )
        .unwrap();

        assert_eq!(prepared.options.num_rows(), 1);
        assert_eq!(prepared.options.num_columns(), 1);
        assert_eq!(
            prepared.options.column(0).as_string::<i32>().value(0),
            "A1"
        );

        let data = &prepared.data;
        let names: Vec<_> = data
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(
            names,
            vec!["ad_id", "date", "trials", "successes", "option_id", "days_ago"]
        );
        let col = |name: &str| data.column_by_name(name).unwrap().clone();
        assert_eq!(col("trials").as_primitive::<Int64Type>().value(0), 100);
        assert_eq!(col("successes").as_primitive::<Int64Type>().value(0), 17);
        assert_eq!(col("option_id").as_primitive::<UInt64Type>().value(0), 0);
        assert_eq!(col("days_ago").as_primitive::<Int64Type>().value(0), 4);
        assert_eq!(
            Date32Type::to_naive_date(col("date").as_primitive::<Date32Type>().value(0)),
            ymd(2024, 1, 1)
        );
    }

    #[test]
    fn test_end_to_end_cap() {
        init_test_logging();
        let prepared = prepare_for_bandit(
            &example(),
            &Weights::new(10.0, 1.0, 1.0).unwrap(),
            ymd(2024, 1, 5),
        )
        .unwrap();
        let successes = prepared.data.column_by_name("successes").unwrap();
        assert_eq!(successes.as_primitive::<Int64Type>().value(0), 100);
    }

    #[test]
    fn test_with_config_uses_reference_date() {
        init_test_logging();
        let cfg = PrepConfig::from_yaml_str(
            "weights: {engagement_weight: 1, click_weight: 1, conversion_weight: 1}\nreference_date: 2024-01-02\n",
        )
        .unwrap();
        let prepared = prepare_with_config(&example(), &cfg).unwrap();
        let days = prepared.data.column_by_name("days_ago").unwrap();
        assert_eq!(days.as_primitive::<Int64Type>().value(0), 1);
    }

    #[test]
    fn test_no_partial_output_on_bad_date() {
        init_test_logging();
        let batch = string_batch(vec![
            ("ad_id", vec![Some("A1"), Some("A2")]),
            ("day", vec![Some("2024-01-01"), Some("yesterday")]),
            ("impressions", vec![Some("100"), Some("5")]),
            ("engagements", vec![Some("10"), Some("1")]),
            ("clicks", vec![Some("5"), Some("")]),
            ("conversions", vec![Some("2"), Some("0")]),
        ]);
        let err = prepare_for_bandit(
            &batch,
            &Weights::new(1.0, 1.0, 1.0).unwrap(),
            ymd(2024, 1, 5),
        )
        .unwrap_err();
        assert!(matches!(err, PrepError::InvalidDate { row: 1, .. }));
    }
}
