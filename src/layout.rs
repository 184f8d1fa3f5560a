//! Column layout for the menu.
//!
//! Literal entries print as their own line. Each group is packed into the
//! fewest rows that still fit the requested width: one column count is
//! picked for the whole menu so the blocks stay aligned, and every column's
//! width is the longest item string it holds across all groups.

use crate::menu::{Menu, MenuEntry};

/// Render the menu as printable text no wider than `max_width`.
pub fn render(menu: &Menu, max_width: usize) -> String {
    let widths = pick_widths(menu.entries(), max_width);
    let mut lines: Vec<String> = Vec::new();
    for entry in menu.entries() {
        match entry {
            MenuEntry::Literal(text) => lines.push(text.clone()),
            MenuEntry::Group(items) => render_group(&mut lines, items, &widths),
        }
    }
    lines.join("\n")
}

/// Try column counts 2..=9 in order and keep the widths of the last count
/// that fits; stop at the first one that does not. One column is the
/// fallback, rendered without padding so it is never too wide.
///
/// The fit test is a strict `<` against `max_width`, and the two-space
/// separator budget `2 * (count - 1)` is charged even when ceiling division
/// leaves trailing columns empty. Both quirks affect which count wins at
/// boundary widths and are kept as-is.
fn pick_widths(entries: &[MenuEntry], max_width: usize) -> Vec<usize> {
    let mut widths = vec![0];
    for count in 2..10 {
        let candidate = column_widths(entries, count);
        let total = candidate.iter().sum::<usize>() + 2 * (candidate.len() - 1);
        if total < max_width {
            widths = candidate;
        } else {
            break;
        }
    }
    widths
}

/// Per-column widths for a candidate column count, maximized over every
/// group so columns line up across group blocks.
fn column_widths(entries: &[MenuEntry], count: usize) -> Vec<usize> {
    let mut widths = vec![0; count];
    for entry in entries {
        let MenuEntry::Group(items) = entry else {
            continue;
        };
        let strs = item_strings(items);
        if strs.is_empty() {
            continue;
        }
        let rows = strs.len().div_ceil(count);
        for (idx, chunk) in strs.chunks(rows).enumerate() {
            for item in chunk {
                widths[idx] = widths[idx].max(item.len());
            }
        }
    }
    widths
}

/// Lay one group out row by row: items run down each column, columns are
/// left-justified and joined with two spaces, rows are right-trimmed.
fn render_group(lines: &mut Vec<String>, items: &[(String, String)], widths: &[usize]) {
    let strs = item_strings(items);
    if strs.is_empty() {
        return;
    }
    let rows = strs.len().div_ceil(widths.len());
    let columns: Vec<&[String]> = strs.chunks(rows).collect();
    for row in 0..rows {
        let mut cells = Vec::new();
        for (column, width) in columns.iter().zip(widths.iter().copied()) {
            if let Some(item) = column.get(row) {
                cells.push(format!("{item:<width$}"));
            }
        }
        let mut line = cells.join("  ");
        line.truncate(line.trim_end().len());
        lines.push(line);
    }
}

fn item_strings(items: &[(String, String)]) -> Vec<String> {
    items
        .iter()
        .map(|(key, desc)| format!("{key}: {desc}"))
        .collect()
}
