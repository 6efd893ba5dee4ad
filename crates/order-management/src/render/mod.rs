//! Bordered console tables.
//!
//! Converts a rectangular string matrix plus header labels into a
//! Unicode box-drawing table. Widths, centering and truncation follow
//! fixed rules so that identical input always renders to identical
//! bytes. Lengths are counted in characters, not bytes — most of the
//! data is Cyrillic.

/// Minimum content width of a column, before the +2 margin.
const MIN_COLUMN_WIDTH: usize = 8;

/// A materialized result set ready for rendering.
///
/// Headers, every row, and the width vector all have the same arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl RenderedTable {
    /// Build a table, computing per-column widths:
    /// `max(header, widest cell, 8) + 2`.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let widths = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let mut max = char_len(header);
                for row in &rows {
                    max = max.max(char_len(&row[i]));
                }
                max.max(MIN_COLUMN_WIDTH) + 2
            })
            .collect();

        Self {
            headers,
            rows,
            widths,
        }
    }

    /// Column headers, verbatim as supplied.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Computed column widths.
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Render to output lines: top border, centered header line,
    /// separator, one line per row, bottom border.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 4);

        lines.push(border_line('┌', '┬', '┐', &self.widths));

        let mut header_line = String::from("│");
        for (header, width) in self.headers.iter().zip(&self.widths) {
            header_line.push(' ');
            header_line.push_str(&pad_center(header, *width));
            header_line.push_str(" │");
        }
        lines.push(header_line);

        lines.push(border_line('├', '┼', '┤', &self.widths));

        for row in &self.rows {
            let mut data_line = String::from("│");
            for (cell, width) in row.iter().zip(&self.widths) {
                data_line.push(' ');
                data_line.push_str(&pad_right(cell, *width));
                data_line.push_str(" │");
            }
            lines.push(data_line);
        }

        lines.push(border_line('└', '┴', '┘', &self.widths));
        lines
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        for line in self.to_lines() {
            println!("{}", line);
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn border_line(left: char, middle: char, right: char, widths: &[usize]) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, width) in widths.iter().enumerate() {
        // Each cell renders as " content " — width plus two margins.
        line.push_str(&"─".repeat(width + 2));
        line.push(if i < widths.len() - 1 { middle } else { right });
    }
    line
}

/// Center `s` in `width` characters; an odd remainder goes to the right.
/// Oversized input is cut at `width` without an ellipsis.
fn pad_center(s: &str, width: usize) -> String {
    let len = char_len(s);
    if len >= width {
        return s.chars().take(width).collect();
    }
    let padding = width - len;
    format!(
        "{}{}{}",
        " ".repeat(padding / 2),
        s,
        " ".repeat(padding - padding / 2)
    )
}

/// Left-align `s` in `width` characters; oversized input is truncated
/// to `width - 3` characters plus `...`.
fn pad_right(s: &str, width: usize) -> String {
    let len = char_len(s);
    if len > width {
        let truncated: String = s.chars().take(width - 3).collect();
        format!("{}...", truncated)
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_the_min8_plus2_rule() {
        let table = RenderedTable::new(
            vec!["a".into(), "longer_name".into()],
            vec![vec!["x".into(), "y".into()]],
        );
        assert_eq!(table.widths(), &[10, 13]);
    }

    #[test]
    fn widest_cell_wins_over_header() {
        let table = RenderedTable::new(
            vec!["id".into()],
            vec![vec!["123456789012".into()], vec!["7".into()]],
        );
        assert_eq!(table.widths(), &[14]);
    }

    #[test]
    fn header_centering_puts_odd_space_on_the_right() {
        // width 13, header of 11 chars: one space left, one extra right.
        assert_eq!(pad_center("longer_name", 13), " longer_name ");
        // width 10, header of 1 char: 4 left, 5 right.
        assert_eq!(pad_center("a", 10), "    a     ");
    }

    #[test]
    fn oversized_cells_truncate_with_ellipsis() {
        let padded = pad_right("abcdefghijklm", 10);
        assert_eq!(padded, "abcdefg...");
        assert_eq!(padded.chars().count(), 10);
    }

    #[test]
    fn cyrillic_is_measured_in_characters() {
        let table = RenderedTable::new(
            vec!["Статус".into()],
            vec![vec!["Завершен".into()]],
        );
        assert_eq!(table.widths(), &[10]);

        let lines = table.to_lines();
        // Every line spans the same number of characters.
        let expected = lines[0].chars().count();
        for line in &lines {
            assert_eq!(line.chars().count(), expected);
        }
    }

    #[test]
    fn rendering_is_byte_identical_and_uses_box_drawing() {
        let table = RenderedTable::new(
            vec!["a".into(), "longer_name".into()],
            vec![vec!["x".into(), "y".into()]],
        );
        let lines = table.to_lines();
        assert_eq!(lines, table.to_lines());
        assert_eq!(
            lines[0],
            "┌────────────┬───────────────┐"
        );
        assert_eq!(lines[1], "│     a      │  longer_name  │");
        assert_eq!(
            lines[2],
            "├────────────┼───────────────┤"
        );
        assert_eq!(lines[3], "│ x          │ y             │");
        assert_eq!(
            lines[4],
            "└────────────┴───────────────┘"
        );
    }

    #[test]
    fn headers_survive_rendering_verbatim() {
        let headers = vec!["Номер заказа".to_string(), "Статус".to_string()];
        let table = RenderedTable::new(headers.clone(), vec![]);
        assert_eq!(table.headers(), headers.as_slice());
    }
}
