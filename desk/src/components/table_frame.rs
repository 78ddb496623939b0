// One rendered page of a list table: translated headers with sort markers,
// display cells and the "first–last of total" footer.
use serde::Serialize;
use shared::models::SortDirection;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    pub name: String,
    pub label: String,
    pub sort: Option<SortDirection>,
    /// Priority among the sorted columns; only set when more than one
    /// column is sorted.
    pub order: Option<usize>,
}

impl HeaderCell {
    pub fn caption(&self) -> String {
        let arrow = match self.sort {
            Some(SortDirection::Asc) => " ▲",
            Some(SortDirection::Desc) => " ▼",
            None => "",
        };
        match self.order {
            Some(n) => format!("{}{}{}", self.label, arrow, n),
            None => format!("{}{}", self.label, arrow),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRow {
    pub id: Option<String>,
    pub selected: bool,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableFrame {
    pub title: String,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<FrameRow>,
    pub footer: String,
    /// Shown instead of rows when there are none.
    pub empty_text: String,
    pub page: usize,
    pub total_pages: usize,
}

impl TableFrame {
    /// Aligned plain-text table with a selection marker column.
    pub fn render(&self) -> String {
        let captions: Vec<String> = self.headers.iter().map(HeaderCell::caption).collect();
        let mut widths: Vec<usize> = captions.iter().map(|c| width(c)).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(&row.cells) {
                *w = (*w).max(width(cell));
            }
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        push_line(&mut out, "   ", &captions, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, "   ", &rule, &widths);

        if self.rows.is_empty() {
            let _ = writeln!(out, "   {}", self.empty_text);
        }
        for row in &self.rows {
            let marker = if row.selected { "[x]" } else { "[ ]" };
            push_line(&mut out, marker, &row.cells, &widths);
        }

        let _ = write!(out, "{}", self.footer);
        if self.total_pages > 1 {
            let _ = write!(out, " (page {}/{})", self.page + 1, self.total_pages);
        }
        out.push('\n');
        out
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn push_line(out: &mut String, marker: &str, cells: &[String], widths: &[usize]) {
    let mut line = marker.to_string();
    for (cell, w) in cells.iter().zip(widths) {
        line.push_str("  ");
        line.push_str(cell);
        line.push_str(&" ".repeat(w - width(cell)));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
