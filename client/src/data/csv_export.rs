use crate::error::ClientError;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use shared::catalog::Resource;
use shared::models::{ColumnDescriptor, Row};
use shared::table::value::display_text;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes `rows` as CSV: one header row of labels, then one record per row
/// with a cell for every visible column. Returns the number of records.
pub fn write_csv<W, L>(
    writer: W,
    rows: &[&Row],
    columns: &[ColumnDescriptor],
    label: L,
) -> Result<usize, ClientError>
where
    W: Write,
    L: Fn(&ColumnDescriptor) -> String,
{
    let visible: Vec<&ColumnDescriptor> = columns.iter().filter(|c| c.visible).collect();
    let mut wtr = WriterBuilder::new().from_writer(writer);

    wtr.write_record(visible.iter().map(|c| label(*c)))?;
    for row in rows {
        wtr.write_record(visible.iter().map(|c| display_text(row.get(&c.name))))?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

// e.g. "work_orders_20261016.csv"
pub fn export_file_name(resource: Resource, now: DateTime<Utc>) -> String {
    format!("{}_{}.csv", resource.path().replace('-', "_"), now.format("%Y%m%d"))
}

pub fn export_to_path<L>(
    path: &Path,
    rows: &[&Row],
    columns: &[ColumnDescriptor],
    label: L,
) -> Result<usize, ClientError>
where
    L: Fn(&ColumnDescriptor) -> String,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let count = write_csv(file, rows, columns, label)?;
    tracing::info!(path = %path.display(), count, "CSV export written");
    Ok(count)
}
