// Multi-column equality filter used by every list page.
use super::value::js_string;
use crate::models::{visible_names, ColumnDescriptor, Row};
use std::collections::BTreeMap;

/// Column name to expected value, as typed into the filter inputs.
pub type FilterMap = BTreeMap<String, String>;

/// Keeps the rows whose visible-column values equal every non-empty filter,
/// ignoring case. Filters on hidden or unknown columns impose no constraint.
pub fn filter_rows<'a>(
    rows: &'a [Row],
    filters: &FilterMap,
    columns: &[ColumnDescriptor],
) -> Vec<&'a Row> {
    let active: Vec<(&str, String)> = filters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter(|(key, _)| visible_names(columns).any(|name| name == key.as_str()))
        .map(|(key, value)| (key.as_str(), value.to_lowercase()))
        .collect();

    rows.iter()
        .filter(|row| {
            active
                .iter()
                .all(|(key, expected)| js_string(row.get(*key)).to_lowercase() == *expected)
        })
        .collect()
}
