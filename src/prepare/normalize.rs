// src/prepare/normalize.rs

use crate::config::Weights;
use crate::error::PrepError;
use crate::prepare::columns::{
    canonical_name, standardize_name, CLICKS, CONVERSIONS, DROPPED, ENGAGEMENTS, IMPRESSIONS,
    REQUIRED, SIGNALS, SUCCESSES, TRIALS,
};
use crate::prepare::convert::{metric_values, narrow};
use crate::prepare::utils::blank_to_null;
use arrow::{
    array::ArrayRef,
    datatypes::{Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

/// Map an ad-platform export onto the canonical `trials`/`successes` schema.
///
/// - Column names are lower-cased with spaces replaced by underscores, then
///   Facebook (`reporting_ends`, `post_engagement`, `link_clicks`, `purchases`)
///   and Google (`day`) names are mapped to `date`/`engagements`/`clicks`/`conversions`.
///   `reporting_starts` is dropped.
/// - Empty strings become nulls; missing metric values count as zero.
/// - `successes = min(engagements*w_e + clicks*w_c + conversions*w_v, impressions)`
///   is appended, the three signal columns are dropped and `impressions`
///   becomes `trials` in place.
#[tracing::instrument(level = "debug", skip_all, fields(rows = batch.num_rows()))]
pub fn normalize(batch: &RecordBatch, weights: &Weights) -> Result<RecordBatch, PrepError> {
    weights.validate()?;

    // 1) Canonical names, in input order
    let schema = batch.schema();
    let mut names: Vec<String> = Vec::with_capacity(batch.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());
    for (field, arr) in schema.fields().iter().zip(batch.columns()) {
        let standardized = standardize_name(field.name());
        if DROPPED.contains(&standardized.as_str()) {
            debug!(column = %field.name(), "dropping unused column");
            continue;
        }
        let name = canonical_name(&standardized).to_string();
        if &name != field.name() {
            debug!(from = %field.name(), to = %name, "renamed column");
        }
        if names.contains(&name) {
            return Err(PrepError::DuplicateColumn { column: name });
        }
        names.push(name);
        columns.push(blank_to_null(arr));
    }

    for required in REQUIRED {
        column_index(&names, required)?;
    }
    // output names must not already be taken by an input column
    for produced in [TRIALS, SUCCESSES] {
        if names.iter().any(|n| n == produced) {
            return Err(PrepError::DuplicateColumn {
                column: produced.to_string(),
            });
        }
    }

    // 2) Metrics, zero-filled
    let metric = |name: &str| -> Result<Vec<f64>, PrepError> {
        let idx = column_index(&names, name)?;
        metric_values(name, &columns[idx])
    };
    let impressions = metric(IMPRESSIONS)?;
    let engagements = metric(ENGAGEMENTS)?;
    let clicks = metric(CLICKS)?;
    let conversions = metric(CONVERSIONS)?;

    // 3) Weighted successes, capped at impressions
    let successes: Vec<f64> = impressions
        .iter()
        .zip(&engagements)
        .zip(&clicks)
        .zip(&conversions)
        .map(|(((imp, eng), clk), conv)| {
            let raw = eng * weights.engagement_weight
                + clk * weights.click_weight
                + conv * weights.conversion_weight;
            raw.min(*imp)
        })
        .collect();

    // 4) Assemble: drop signals, impressions → trials, successes last
    let mut fields = Vec::with_capacity(names.len());
    let mut out: Vec<ArrayRef> = Vec::with_capacity(names.len());
    for (name, arr) in names.iter().zip(columns) {
        if SIGNALS.contains(&name.as_str()) {
            continue;
        }
        if name == IMPRESSIONS {
            let trials = narrow(&impressions);
            fields.push(Field::new(TRIALS, trials.data_type().clone(), false));
            out.push(trials);
        } else {
            fields.push(Field::new(name, arr.data_type().clone(), true));
            out.push(arr);
        }
    }
    let successes = narrow(&successes);
    fields.push(Field::new(SUCCESSES, successes.data_type().clone(), false));
    out.push(successes);

    debug!(columns = ?fields.iter().map(|f| f.name().as_str()).collect::<Vec<_>>(), "normalized");
    RecordBatch::try_new(Arc::new(Schema::new(fields)), out).map_err(Into::into)
}

fn column_index(names: &[String], column: &str) -> Result<usize, PrepError> {
    names
        .iter()
        .position(|n| n == column)
        .ok_or_else(|| PrepError::MissingColumn {
            column: column.to_string(),
        })
}
