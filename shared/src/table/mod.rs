//! List-table utility shared by every list page: filter predicate, sort
//! comparator with its header-click state, and paging.
//!
//! [`TableQuery::apply`] runs the three steps in that order over rows the
//! caller already fetched.
pub mod filter;
pub mod paginate;
pub mod sort;
pub mod value;

pub use filter::{filter_rows, FilterMap};
pub use paginate::{paginate, Page, Pagination, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use sort::{compare_rows, compare_values, sort_rows, SortState};

use crate::models::{ColumnDescriptor, Row};
use serde::{Deserialize, Serialize};

/// Filters, sort keys and page of one list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub filters: FilterMap,
    #[serde(default)]
    pub sort: SortState,
    #[serde(default)]
    pub pagination: Pagination,
}

impl TableQuery {
    /// Sets or clears (empty value) one filter and returns to the first page.
    pub fn set_filter(&mut self, column: &str, value: &str) {
        if value.is_empty() {
            self.filters.remove(column);
        } else {
            self.filters.insert(column.to_string(), value.to_string());
        }
        self.pagination.page = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.pagination.page = 0;
    }

    /// Filtered and sorted rows, before paging.
    pub fn arrange<'a>(&self, rows: &'a [Row], columns: &[ColumnDescriptor]) -> Vec<&'a Row> {
        let mut kept = filter_rows(rows, &self.filters, columns);
        sort_rows(&mut kept, &self.sort.effective(columns));
        kept
    }

    pub fn apply<'a>(&self, rows: &'a [Row], columns: &[ColumnDescriptor]) -> Page<&'a Row> {
        paginate(self.arrange(rows, columns), self.pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortDirection;
    use serde_json::json;

    fn data() -> Vec<Row> {
        (1..=30)
            .map(|i| {
                let city = if i % 2 == 0 { "Pune" } else { "Delhi" };
                json!({
                    "id": i,
                    "city": city,
                    "amount": (31 - i) * 10,
                })
                .as_object()
                .cloned()
                .unwrap()
            })
            .collect()
    }

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("columns.id", "id"),
            ColumnDescriptor::new("columns.city", "city"),
            ColumnDescriptor::new("columns.amount", "amount"),
        ]
    }

    #[test]
    fn test_apply_filters_sorts_then_pages() {
        let rows = data();
        let mut query = TableQuery::default();
        query.set_filter("city", "pune");
        query.sort.set("amount", SortDirection::Asc);
        query.pagination = Pagination::new(1, 10);

        let page = query.apply(&rows, &columns());
        assert_eq!(page.total_items, 15);
        assert_eq!(page.total_pages, 2);
        let ids: Vec<i64> = page.items.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        // Pune rows are the even ids; ascending amount means descending id.
        assert_eq!(ids, vec![10, 8, 6, 4, 2]);
    }

    #[test]
    fn test_set_filter_resets_page_and_empty_value_removes() {
        let mut query = TableQuery::default();
        query.pagination.page = 4;
        query.set_filter("city", "Pune");
        assert_eq!(query.pagination.page, 0);
        query.set_filter("city", "");
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_sort_on_hidden_column_is_ignored() {
        let rows = data();
        let mut cols = columns();
        cols[2].visible = false;
        let mut query = TableQuery::default();
        query.sort.set("amount", SortDirection::Asc);
        let arranged = query.arrange(&rows, &cols);
        assert_eq!(arranged[0]["id"], json!(1));
    }

    #[test]
    fn test_query_deserializes_with_missing_sections() {
        let query: TableQuery = serde_json::from_str(r#"{"filters":{"city":"Pune"}}"#).unwrap();
        assert_eq!(query.pagination, Pagination::default());
        assert!(query.sort.is_empty());
    }
}
