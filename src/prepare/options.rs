// src/prepare/options.rs

use crate::error::PrepError;
use crate::prepare::columns::{AD_ID, NON_DESCRIPTIVE, OPTION_ID};
use arrow::{
    array::{ArrayRef, UInt64Array},
    compute::take_record_batch,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
    row::{Row, RowConverter, SortField},
};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// Split a normalized table into its distinct options and the rows tagged with `option_id`.
///
/// Descriptive columns are every column except `date`, `trials`, `successes`
/// and the derived `option_id`/`days_ago` of an earlier run. Each distinct
/// combination gets a dense id in first-seen order; the options table is those
/// combinations, row position = id.
/// Nulls compare equal, so rows with a missing `ad_id` share one option.
#[tracing::instrument(level = "debug", skip_all, fields(rows = batch.num_rows()))]
pub fn index_options(batch: &RecordBatch) -> Result<(RecordBatch, RecordBatch), PrepError> {
    let schema = batch.schema();
    if schema.column_with_name(AD_ID).is_none() {
        return Err(PrepError::MissingColumn {
            column: AD_ID.to_string(),
        });
    }

    let descriptive: Vec<usize> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| !NON_DESCRIPTIVE.contains(&f.name().as_str()))
        .map(|(i, _)| i)
        .collect();
    let keys = batch.project(&descriptive)?;

    let (codes, first_rows) = dictionary_encode(keys.columns())?;
    let options = take_record_batch(&keys, &UInt64Array::from(first_rows))?;
    debug!(options = options.num_rows(), "indexed options");

    let mut fields: Vec<Field> = Vec::with_capacity(batch.num_columns() + 1);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns() + 1);
    for (field, arr) in schema.fields().iter().zip(batch.columns()) {
        if field.name() == OPTION_ID {
            continue;
        }
        fields.push(field.as_ref().clone());
        columns.push(arr.clone());
    }
    fields.push(Field::new(OPTION_ID, DataType::UInt64, false));
    columns.push(Arc::new(UInt64Array::from(codes)));

    let data = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    Ok((options, data))
}

/// Dense codes per row plus the row index where each code first appeared.
fn dictionary_encode(columns: &[ArrayRef]) -> Result<(Vec<u64>, Vec<u64>), PrepError> {
    let converter = RowConverter::new(
        columns
            .iter()
            .map(|c| SortField::new(c.data_type().clone()))
            .collect(),
    )?;
    let rows = converter.convert_columns(columns)?;

    let mut seen: HashMap<Row<'_>, u64> = HashMap::new();
    let mut codes = Vec::with_capacity(rows.num_rows());
    let mut first_rows = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let next = seen.len() as u64;
        let code = *seen.entry(row).or_insert(next);
        if code == next {
            first_rows.push(idx as u64);
        }
        codes.push(code);
    }
    Ok((codes, first_rows))
}
