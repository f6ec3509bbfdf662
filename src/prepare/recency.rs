// src/prepare/recency.rs

use crate::error::PrepError;
use crate::prepare::columns::{DATE, DAYS_AGO};
use crate::prepare::date_parser::{date32_to_naive, parse_ymd};
use arrow::{
    array::{ArrayRef, AsArray, Date32Array, Int64Array},
    datatypes::{DataType, Date32Type, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

/// Parse `date` and append `days_ago = today - date` in whole days.
///
/// `date` is replaced by a `Date32` column. Future dates give negative values.
/// Any missing or malformed date fails the whole batch; text must be exactly
/// `YYYY-MM-DD` with no surrounding whitespace or quotes.
#[tracing::instrument(level = "debug", skip(batch), fields(rows = batch.num_rows()))]
pub fn add_days_ago(batch: &RecordBatch, today: NaiveDate) -> Result<RecordBatch, PrepError> {
    let schema = batch.schema();
    let (date_idx, _) = schema
        .column_with_name(DATE)
        .ok_or_else(|| PrepError::MissingColumn {
            column: DATE.to_string(),
        })?;
    let dates = parse_dates(batch.column(date_idx))?;

    let days_ago: Vec<i64> = dates.iter().map(|d| (today - *d).num_days()).collect();
    let date_col: ArrayRef = Arc::new(Date32Array::from(
        dates
            .iter()
            .map(|d| Date32Type::from_naive_date(*d))
            .collect::<Vec<_>>(),
    ));

    let mut fields: Vec<Field> = Vec::with_capacity(batch.num_columns() + 1);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns() + 1);
    for (i, (field, arr)) in schema.fields().iter().zip(batch.columns()).enumerate() {
        if i == date_idx {
            fields.push(Field::new(DATE, DataType::Date32, false));
            columns.push(date_col.clone());
        } else if field.name() != DAYS_AGO {
            fields.push(field.as_ref().clone());
            columns.push(arr.clone());
        }
    }
    fields.push(Field::new(DAYS_AGO, DataType::Int64, false));
    columns.push(Arc::new(Int64Array::from(days_ago)));

    debug!(%today, "added days_ago");
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}

/// [`add_days_ago`] relative to the local clock.
pub fn add_days_ago_from_today(batch: &RecordBatch) -> Result<RecordBatch, PrepError> {
    add_days_ago(batch, chrono::Local::now().date_naive())
}

fn parse_dates(arr: &ArrayRef) -> Result<Vec<NaiveDate>, PrepError> {
    match arr.data_type() {
        DataType::Utf8 => parse_strings(arr.as_string::<i32>().iter()),
        DataType::LargeUtf8 => parse_strings(arr.as_string::<i64>().iter()),
        DataType::Utf8View => parse_strings(arr.as_string_view().iter()),
        DataType::Date32 => arr
            .as_primitive::<Date32Type>()
            .iter()
            .enumerate()
            .map(|(row, v)| {
                let days = v.ok_or_else(|| missing_date(row))?;
                date32_to_naive(days).ok_or_else(|| PrepError::InvalidDate {
                    column: DATE.to_string(),
                    row,
                    value: days.to_string(),
                })
            })
            .collect(),
        other => Err(PrepError::UnsupportedType {
            column: DATE.to_string(),
            data_type: other.clone(),
        }),
    }
}

fn parse_strings<'a>(
    values: impl Iterator<Item = Option<&'a str>>,
) -> Result<Vec<NaiveDate>, PrepError> {
    values
        .enumerate()
        .map(|(row, opt)| {
            let raw = opt
                .filter(|s| !s.is_empty())
                .ok_or_else(|| missing_date(row))?;
            parse_ymd(raw).ok_or_else(|| PrepError::InvalidDate {
                column: DATE.to_string(),
                row,
                value: raw.to_string(),
            })
        })
        .collect()
}

fn missing_date(row: usize) -> PrepError {
    PrepError::MissingDate {
        column: DATE.to_string(),
        row,
    }
}
