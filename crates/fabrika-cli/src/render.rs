//! Plain-text rendering of grid rows.

use fabrika_core::{Entity, Record};

/// Widest a cell is printed before it is cut.
const MAX_CELL: usize = 32;

/// Columns whose values are never printed.
const MASKED: &[&str] = &["password"];

/// Render rows as an aligned table with an `id` column followed by
/// `columns`.
pub fn render_table<E: Entity>(rows: &[&Record<E>], columns: &[&str]) -> String {
    let mut header = vec!["id".to_string()];
    header.extend(columns.iter().map(|c| {
        E::field_spec(c).map_or_else(|_| c.to_string(), |s| s.label.to_string())
    }));

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.id.to_string()];
            cells.extend(
                columns
                    .iter()
                    .map(|c| cell(&display_value(row, c))),
            );
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        for (w, c) in widths.iter_mut().zip(line) {
            *w = (*w).max(c.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for line in &body {
        push_line(&mut out, line, &widths);
    }
    out
}

/// Render one record as `label: value` lines, every field included.
pub fn render_record<E: Entity>(record: &Record<E>) -> String {
    let width = E::fields()
        .iter()
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);
    let mut out = format!("{:<width$}  {}\n", "id", record.id);
    for spec in E::fields() {
        let value = display_value(record, spec.name);
        out.push_str(&format!("{:<width$}  {}\n", spec.label, value));
    }
    out
}

fn display_value<E: Entity>(record: &Record<E>, field: &str) -> String {
    match record.get(field) {
        Some(v) if MASKED.contains(&field) && !v.is_blank() => "********".to_string(),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn cell(text: &str) -> String {
    let flat = text.replace(|c: char| c == '\n' || c == '\t', " ");
    if flat.chars().count() <= MAX_CELL {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL - 1).collect();
    cut.push('…');
    cut
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| {
            let pad = w.saturating_sub(c.chars().count());
            format!("{c}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
