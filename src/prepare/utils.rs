use arrow::array::{ArrayRef, LargeStringArray, StringArray, StringViewArray};
use std::sync::Arc;

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Replace empty strings with nulls in string columns; other arrays are returned as-is.
pub fn blank_to_null(arr: &ArrayRef) -> ArrayRef {
    if let Some(sarr) = arr.as_any().downcast_ref::<StringArray>() {
        if sarr.iter().any(|v| v == Some("")) {
            let out: StringArray = sarr.iter().map(|v| v.filter(|s| !s.is_empty())).collect();
            return Arc::new(out);
        }
    } else if let Some(sarr) = arr.as_any().downcast_ref::<LargeStringArray>() {
        if sarr.iter().any(|v| v == Some("")) {
            let out: LargeStringArray =
                sarr.iter().map(|v| v.filter(|s| !s.is_empty())).collect();
            return Arc::new(out);
        }
    } else if let Some(sarr) = arr.as_any().downcast_ref::<StringViewArray>() {
        if sarr.iter().any(|v| v == Some("")) {
            let out: StringViewArray = sarr.iter().map(|v| v.filter(|s| !s.is_empty())).collect();
            return Arc::new(out);
        }
    }
    arr.clone()
}

/// True when `v` can be stored as an `i64` without loss.
pub fn is_whole(v: f64) -> bool {
    v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64
}
