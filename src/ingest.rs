// src/ingest.rs
use anyhow::{Context, Result};
use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{fs, io::Cursor, path::Path, sync::Arc};
use tracing::debug;

const BATCH_SIZE: usize = 64 * 1024;

/// Read an ad-platform CSV export into one all-`Utf8` batch.
///
/// Headers are kept verbatim (the normalizer standardizes them) and every
/// column is read as text so ids stay opaque and blank cells arrive as missing.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<RecordBatch> {
    let data = fs::read(&path)
        .with_context(|| format!("Failed to open CSV export: {:?}", path.as_ref()))?;
    read_csv_bytes(&data).with_context(|| format!("Failed to parse CSV export: {:?}", path.as_ref()))
}

pub fn read_csv_str(text: &str) -> Result<RecordBatch> {
    read_csv_bytes(text.as_bytes())
}

fn read_csv_bytes(data: &[u8]) -> Result<RecordBatch> {
    // 1) Header only: names come from the file, types are forced to text
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(data), Some(0))
        .context("reading CSV header")?;
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    // 2) Full read, then stitch batches into one table
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(Cursor::new(data))
        .context("creating CSV reader")?;
    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .context("reading CSV rows")?;
    let table = concat_batches(&schema, &batches).context("concatenating CSV batches")?;

    debug!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "loaded CSV export"
    );
    Ok(table)
}
