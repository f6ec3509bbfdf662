use crate::error::PrepError;
use crate::prepare::utils::{clean_str, is_whole};
use arrow::{
    array::{ArrayRef, AsArray, Float64Array, Int64Array},
    compute::cast,
    datatypes::{DataType, Float64Type},
};
use std::sync::Arc;

/// Read a metric column as `f64`, filling nulls, empty strings and NaN with zero.
///
/// String columns are parsed after trimming; numeric columns of any width are cast.
pub fn metric_values(column: &str, arr: &ArrayRef) -> Result<Vec<f64>, PrepError> {
    match arr.data_type() {
        DataType::Utf8 => parse_strings(column, arr.as_string::<i32>().iter()),
        DataType::LargeUtf8 => parse_strings(column, arr.as_string::<i64>().iter()),
        DataType::Utf8View => parse_strings(column, arr.as_string_view().iter()),
        DataType::Null => Ok(vec![0.0; arr.len()]),
        dt if dt.is_numeric() => {
            let floats = cast(arr, &DataType::Float64)?;
            Ok(floats
                .as_primitive::<Float64Type>()
                .iter()
                .map(fill_missing)
                .collect())
        }
        other => Err(PrepError::UnsupportedType {
            column: column.to_string(),
            data_type: other.clone(),
        }),
    }
}

fn parse_strings<'a>(
    column: &str,
    values: impl Iterator<Item = Option<&'a str>>,
) -> Result<Vec<f64>, PrepError> {
    values
        .enumerate()
        .map(|(row, opt)| {
            let cleaned = match opt.map(clean_str) {
                None | Some("") => return Ok(0.0),
                Some(c) => c,
            };
            cleaned
                .parse::<f64>()
                .map(|v| fill_missing(Some(v)))
                .map_err(|_| PrepError::NonNumeric {
                    column: column.to_string(),
                    row,
                    value: cleaned.to_string(),
                })
        })
        .collect()
}

fn fill_missing(v: Option<f64>) -> f64 {
    match v {
        Some(x) if !x.is_nan() => x,
        _ => 0.0,
    }
}

/// Build the narrowest column for `values`: `Int64` if every value is whole, else `Float64`.
pub fn narrow(values: &[f64]) -> ArrayRef {
    if values.iter().all(|v| is_whole(*v)) {
        Arc::new(Int64Array::from(
            values.iter().map(|v| *v as i64).collect::<Vec<_>>(),
        ))
    } else {
        Arc::new(Float64Array::from(values.to_vec()))
    }
}
