//! HTML fragment renderer for the page's `results` element.

use std::fmt::Write as _;

use car_map_car_models::CarRecord;

use crate::{Column, TableSink, heading};

/// Renders rows as an HTML `<table>` fragment.
#[derive(Debug, Clone, Default)]
pub struct HtmlTable {
    html: String,
}

impl HtmlTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            html: String::new(),
        }
    }

    /// The fragment from the most recent render.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}

impl TableSink for HtmlTable {
    fn show_records(&mut self, records: &[&CarRecord], location: Option<&str>) {
        let mut html = String::new();
        let _ = writeln!(html, "<h2>{}</h2>", escape(&heading(location, records.len())));
        html.push_str("<table>\n  <thead>\n    <tr>");
        for column in Column::all() {
            let _ = write!(html, "<th>{column}</th>");
        }
        html.push_str("</tr>\n  </thead>\n  <tbody>\n");
        for record in records {
            html.push_str("    <tr>");
            for column in Column::all() {
                let _ = write!(html, "<td>{}</td>", escape(&column.value(record)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("  </tbody>\n</table>\n");
        self.html = html;
    }

    fn show_placeholder(&mut self, message: &str) {
        self.html = format!("<p class=\"placeholder\">{}</p>\n", escape(message));
    }
}

/// Escapes text for use inside HTML elements and attribute values.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::car;

    #[test]
    fn renders_one_row_per_record() {
        let ford = car("Ford", "GT", "2006", "Austin", "TX");
        let honda = car("Honda", "S2000", "2001", "Denver", "CO");
        let mut table = HtmlTable::new();
        table.show_records(&[&ford, &honda], None);

        let html = table.html();
        assert!(html.contains("<h2>All results (2 cars)</h2>"));
        assert!(html.contains("<th>Make</th><th>Model</th><th>Year</th><th>City</th><th>State</th>"));
        assert!(html.contains("<td>Ford</td><td>GT</td><td>2006</td><td>Austin</td><td>TX</td>"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn location_replaces_default_heading() {
        let ford = car("Ford", "GT", "2006", "Austin", "TX");
        let mut table = HtmlTable::new();
        table.show_records(&[&ford], Some("Austin, TX"));
        assert!(table.html().starts_with("<h2>Austin, TX (1 car)</h2>"));
    }

    #[test]
    fn each_render_replaces_the_previous_one() {
        let ford = car("Ford", "GT", "2006", "Austin", "TX");
        let mut table = HtmlTable::new();
        table.show_records(&[&ford], None);
        table.show_placeholder("Click a marker");
        assert_eq!(table.html(), "<p class=\"placeholder\">Click a marker</p>\n");

        table.show_records(&[], None);
        assert!(table.html().contains("All results (0 cars)"));
        assert!(!table.html().contains("<td>"));
    }

    #[test]
    fn escapes_cell_text() {
        let weird = car("A&B", "<script>", "1999", "O'Fallon", "\"MO\"");
        let mut table = HtmlTable::new();
        table.show_records(&[&weird], None);
        let html = table.html();
        assert!(html.contains("<td>A&amp;B</td>"));
        assert!(html.contains("<td>&lt;script&gt;</td>"));
        assert!(html.contains("<td>O&#39;Fallon</td>"));
        assert!(html.contains("<td>&quot;MO&quot;</td>"));
        assert!(!html.contains("<script>"));
    }
}
