//! List shell: the view model behind every list page.
//!
//! Holds the page's columns, its [`TableQuery`], the rows last fetched and
//! the selected row ids. Filtering, sorting and paging run client-side over
//! the fetched rows; delete and download act on the selection and on the
//! filtered + sorted rows respectively.

use super::table_frame::{FrameRow, HeaderCell, TableFrame};
use crate::state::ViewState;
use chrono::{DateTime, Utc};
use client::data::{export_file_name, export_to_path};
use client::error::ClientError;
use client::i18n::Translator;
use client::services::{delete_many, BatchReport};
use client::AppContext;
use shared::catalog::Resource;
use shared::models::{ColumnDescriptor, Row, SortDirection};
use shared::table::value::display_text;
use shared::table::{Page, TableQuery, PAGE_SIZE_OPTIONS};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub struct ListShell {
    resource: Resource,
    columns: Vec<ColumnDescriptor>,
    query: TableQuery,
    rows: Vec<Row>,
    selected: BTreeSet<String>,
}

impl ListShell {
    pub fn new(resource: Resource, view: ViewState) -> Self {
        Self {
            resource,
            columns: view.columns,
            query: view.query,
            rows: Vec::new(),
            selected: BTreeSet::new(),
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn query(&self) -> &TableQuery {
        &self.query
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            columns: self.columns.clone(),
            query: self.query.clone(),
        }
    }

    /// Fetches the rows. On failure the table is emptied and an error notice
    /// is recorded.
    pub async fn load(&mut self, ctx: &mut AppContext) -> Result<usize, ClientError> {
        let result = ctx.api().list(self.resource).await;
        match result {
            Ok(rows) => {
                self.set_rows(rows);
                Ok(self.rows.len())
            }
            Err(e) => {
                self.set_rows(Vec::new());
                let title = ctx.translator().t(&self.resource.title_key());
                let fallback = ctx.translator().t_with("messages.load_failed", &[("resource", &title)]);
                ctx.notices_mut().from_error(&e, &fallback);
                Err(e)
            }
        }
    }

    /// Replaces the rows; selections whose row is gone are dropped.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        let present: BTreeSet<String> = self.rows.iter().filter_map(|r| self.row_id(r)).collect();
        self.selected.retain(|id| present.contains(id));
    }

    pub fn row_id(&self, row: &Row) -> Option<String> {
        Some(display_text(row.get(self.resource.id_field()))).filter(|id| !id.is_empty())
    }

    pub fn set_filter(&mut self, column: &str, value: &str) {
        self.query.set_filter(column, value);
    }

    pub fn clear_filters(&mut self) {
        self.query.clear_filters();
    }

    pub fn toggle_sort(&mut self, column: &str) -> Option<SortDirection> {
        self.query.sort.toggle(column)
    }

    pub fn set_sort(&mut self, column: &str, direction: SortDirection) {
        self.query.sort.set(column, direction);
    }

    /// Shows or hides a column. Returns false for an unknown column.
    pub fn set_column_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => {
                column.visible = visible;
                self.query.pagination.page = 0;
                true
            }
            None => false,
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.query.pagination.page = page;
    }

    pub fn set_page_size(&mut self, per_page: usize) -> Result<(), ClientError> {
        if !PAGE_SIZE_OPTIONS.contains(&per_page) {
            return Err(ClientError::ValidationError(format!(
                "page size must be one of {:?}",
                PAGE_SIZE_OPTIONS
            )));
        }
        self.query.pagination.per_page = per_page;
        self.query.pagination.page = 0;
        Ok(())
    }

    /// Returns whether `id` is selected afterwards.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Selects every row on the current page.
    pub fn select_page(&mut self) {
        let ids: Vec<String> = self.page().items.iter().filter_map(|r| self.row_id(r)).collect();
        self.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Filtered and sorted rows, all pages.
    pub fn arranged(&self) -> Vec<&Row> {
        self.query.arrange(&self.rows, &self.columns)
    }

    pub fn page(&self) -> Page<&Row> {
        self.query.apply(&self.rows, &self.columns)
    }

    pub fn frame(&self, translator: &Translator) -> TableFrame {
        let page = self.page();
        let visible: Vec<&ColumnDescriptor> = self.columns.iter().filter(|c| c.visible).collect();
        let effective = self.query.sort.effective(&self.columns);
        let multi = effective.len() > 1;

        let headers = visible
            .iter()
            .map(|c| {
                let spec = effective.iter().find(|s| s.column == c.name);
                HeaderCell {
                    name: c.name.clone(),
                    label: translator.t(&c.label),
                    sort: spec.map(|s| s.direction),
                    order: spec.filter(|_| multi).map(|s| s.order),
                }
            })
            .collect();

        let rows = page
            .items
            .iter()
            .map(|row| {
                let id = self.row_id(row);
                FrameRow {
                    selected: id.as_ref().map_or(false, |id| self.selected.contains(id)),
                    id,
                    cells: visible.iter().map(|c| display_text(row.get(&c.name))).collect(),
                }
            })
            .collect();

        let mut footer = match page.range() {
            Some((first, last)) => translator.t_with(
                "table.range",
                &[
                    ("first", &first.to_string()),
                    ("last", &last.to_string()),
                    ("total", &page.total_items.to_string()),
                ],
            ),
            None => translator.t("table.empty"),
        };
        if !self.selected.is_empty() {
            let selected = translator.t_with("table.selected", &[("count", &self.selected.len().to_string())]);
            footer = format!("{} · {}", footer, selected);
        }

        TableFrame {
            title: translator.t(&self.resource.title_key()),
            headers,
            rows,
            footer,
            empty_text: translator.t("table.empty"),
            page: page.page,
            total_pages: page.total_pages,
        }
    }

    /// Deletes the selected rows one by one. Deleted rows leave the table and
    /// the selection; failed ones stay selected.
    pub async fn delete_selected(&mut self, ctx: &mut AppContext) -> Result<BatchReport<String>, ClientError> {
        if self.selected.is_empty() {
            let err = ClientError::ValidationError(ctx.translator().t("messages.nothing_selected"));
            ctx.notices_mut().from_error(&err, "");
            return Err(err);
        }
        let ids: Vec<String> = self.selected.iter().cloned().collect();
        let report = delete_many(ctx.api(), self.resource, &ids).await?;

        let deleted: BTreeSet<&String> = report.succeeded.iter().collect();
        let id_field = self.resource.id_field();
        self.rows
            .retain(|r| !deleted.contains(&display_text(r.get(id_field))));
        for id in &report.succeeded {
            self.selected.remove(id);
        }

        let tr = ctx.translator();
        let text = if report.failed.is_empty() {
            tr.t_with("messages.delete_success", &[("count", &report.succeeded_count().to_string())])
        } else if report.succeeded.is_empty() {
            let title = tr.t(&self.resource.title_key());
            tr.t_with("messages.delete_failed", &[("resource", &title)])
        } else {
            tr.t_with(
                "messages.delete_partial",
                &[
                    ("ok", &report.succeeded_count().to_string()),
                    ("failed", &report.failed_count().to_string()),
                ],
            )
        };
        if report.failed.is_empty() {
            ctx.notices_mut().success(text);
        } else {
            ctx.notices_mut().error(text);
        }
        Ok(report)
    }

    /// Writes the filtered and sorted rows, visible columns only, to
    /// `<dir>/<resource>_<yyyymmdd>.csv` (or to `target` itself when it
    /// names a `.csv` file).
    pub fn download(&self, ctx: &mut AppContext, target: &Path, now: DateTime<Utc>) -> Result<PathBuf, ClientError> {
        let path = if target.extension().map_or(false, |e| e.eq_ignore_ascii_case("csv")) {
            target.to_path_buf()
        } else {
            target.join(export_file_name(self.resource, now))
        };

        let rows = self.arranged();
        let tr = ctx.translator();
        match export_to_path(&path, &rows, &self.columns, |c| tr.t(&c.label)) {
            Ok(count) => {
                let text = tr.t_with(
                    "messages.export_success",
                    &[("count", &count.to_string()), ("path", &path.display().to_string())],
                );
                ctx.notices_mut().success(text);
                Ok(path)
            }
            Err(e) => {
                let title = tr.t(&self.resource.title_key());
                let fallback = tr.t_with("messages.export_failed", &[("resource", &title)]);
                ctx.notices_mut().from_error(&e, &fallback);
                Err(e)
            }
        }
    }
}
