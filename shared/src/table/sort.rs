// Multi-key row comparator and the header-click sort state.
use super::value::{js_number, js_string, locale_cmp};
use crate::models::{is_visible, ColumnDescriptor, Row, SortDirection, SortSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Compares two cells. Null and missing cells go last in either direction.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = match (js_number(a), js_number(b)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => locale_cmp(&js_string(Some(a)), &js_string(Some(b))),
            };
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// Applies `specs` in slice order; the first non-equal key decides.
pub fn compare_rows(a: &Row, b: &Row, specs: &[SortSpec]) -> Ordering {
    specs
        .iter()
        .map(|spec| compare_values(a.get(&spec.column), b.get(&spec.column), spec.direction))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Stable in-place sort; rows equal under every spec keep their order.
///
/// Mixed columns make `compare_rows` intransitive ("9" < "10" numerically,
/// "10" < "10a" < "9" as text), so this must not assume a total order.
pub fn sort_rows<R: Borrow<Row>>(rows: &mut [R], specs: &[SortSpec]) {
    if specs.is_empty() || rows.len() < 2 {
        return;
    }
    let mut order: Vec<usize> = (0..rows.len()).collect();
    {
        let rows = &*rows;
        let mut scratch = Vec::with_capacity(order.len());
        merge_sort(&mut order, &mut scratch, &mut |a, b| {
            compare_rows(rows[a].borrow(), rows[b].borrow(), specs)
        });
    }
    permute(rows, &order);
}

fn merge_sort<F>(items: &mut [usize], scratch: &mut Vec<usize>, cmp: &mut F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    if items.len() < 2 {
        return;
    }
    let mid = items.len() / 2;
    merge_sort(&mut items[..mid], scratch, cmp);
    merge_sort(&mut items[mid..], scratch, cmp);

    scratch.clear();
    let (left, right) = items.split_at(mid);
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        // Take from the right only when strictly smaller.
        if cmp(right[j], left[i]) == Ordering::Less {
            scratch.push(right[j]);
            j += 1;
        } else {
            scratch.push(left[i]);
            i += 1;
        }
    }
    scratch.extend_from_slice(&left[i..]);
    scratch.extend_from_slice(&right[j..]);
    items.copy_from_slice(scratch);
}

// Moves `rows[order[i]]` to position `i` by following each cycle with swaps.
fn permute<R>(rows: &mut [R], order: &[usize]) {
    let mut placed = vec![false; rows.len()];
    for start in 0..rows.len() {
        if placed[start] {
            continue;
        }
        let mut pos = start;
        loop {
            placed[pos] = true;
            let next = order[pos];
            if next == start {
                break;
            }
            rows.swap(pos, next);
            pos = next;
        }
    }
}

/// Active sort keys of one table, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState {
    specs: Vec<SortSpec>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn specs(&self) -> &[SortSpec] {
        &self.specs
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.specs
            .iter()
            .find(|s| s.column == column)
            .map(|s| s.direction)
    }

    /// 1-based priority of `column`, if it is sorted.
    pub fn order_of(&self, column: &str) -> Option<usize> {
        self.specs.iter().find(|s| s.column == column).map(|s| s.order)
    }

    /// Header click: unsorted -> ascending -> descending -> unsorted.
    /// Returns the column's direction after the click.
    pub fn toggle(&mut self, column: &str) -> Option<SortDirection> {
        match self.specs.iter().position(|s| s.column == column) {
            None => {
                self.specs.push(SortSpec::new(column, SortDirection::Asc));
                self.renumber();
                Some(SortDirection::Asc)
            }
            Some(idx) if self.specs[idx].direction == SortDirection::Asc => {
                self.specs[idx].direction = SortDirection::Desc;
                Some(SortDirection::Desc)
            }
            Some(idx) => {
                self.specs.remove(idx);
                self.renumber();
                None
            }
        }
    }

    /// Sets the direction of `column`, appending it when not yet sorted.
    pub fn set(&mut self, column: &str, direction: SortDirection) {
        match self.specs.iter_mut().find(|s| s.column == column) {
            Some(spec) => spec.direction = direction,
            None => {
                self.specs.push(SortSpec::new(column, direction));
                self.renumber();
            }
        }
    }

    pub fn remove(&mut self, column: &str) -> bool {
        let before = self.specs.len();
        self.specs.retain(|s| s.column != column);
        self.renumber();
        self.specs.len() != before
    }

    pub fn clear(&mut self) {
        self.specs.clear();
    }

    /// Drops keys whose column is no longer visible.
    pub fn retain_visible(&mut self, columns: &[ColumnDescriptor]) {
        self.specs.retain(|s| is_visible(columns, &s.column));
        self.renumber();
    }

    /// Specs restricted to visible columns, without touching the state.
    pub fn effective(&self, columns: &[ColumnDescriptor]) -> Vec<SortSpec> {
        self.specs
            .iter()
            .filter(|s| is_visible(columns, &s.column))
            .cloned()
            .collect()
    }

    pub fn sort<R: Borrow<Row>>(&self, rows: &mut [R]) {
        sort_rows(rows, &self.specs);
    }

    fn renumber(&mut self) {
        for (idx, spec) in self.specs.iter_mut().enumerate() {
            spec.order = idx + 1;
        }
    }
}
