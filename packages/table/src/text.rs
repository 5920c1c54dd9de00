//! Plain-text renderer for terminal output.

use std::fmt::Write as _;

use car_map_car_models::CarRecord;

use crate::{Column, TableSink, heading};

/// Renders rows as left-aligned text columns.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    text: String,
}

impl TextTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// The text from the most recent render.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl TableSink for TextTable {
    fn show_records(&mut self, records: &[&CarRecord], location: Option<&str>) {
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| Column::all().iter().map(|c| c.value(record)).collect())
            .collect();

        let widths: Vec<usize> = Column::all()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                rows.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(column.as_ref().len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut text = heading(location, records.len());
        text.push('\n');

        let header: Vec<String> = Column::all().iter().map(ToString::to_string).collect();
        push_row(&mut text, &header, &widths);
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        text.push_str(&"-".repeat(rule_len));
        text.push('\n');

        for row in &rows {
            push_row(&mut text, row, &widths);
        }

        self.text = text;
    }

    fn show_placeholder(&mut self, message: &str) {
        self.text = format!("{message}\n");
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{cell:<width$}");
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
