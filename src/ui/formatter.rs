//! Pure formatting functions for terminal output.
//!
//! Nothing here touches the terminal; [super::TerminalReporter] styles and
//! prints what these functions lay out.

/// Answers accepted by a yes/no confirmation
const CONFIRMATION_RESPONSES: [&str; 2] = ["y", "Y"];

/// Suffix printed after a confirmation prompt
pub const CONFIRMATION_TEXT: &str = "[y/N]: ";

/// True only for an explicit affirmative answer; Enter means no
pub fn is_affirmative(input: &str) -> bool {
    CONFIRMATION_RESPONSES.contains(&input.trim())
}

/// Width of every column: the widest of header and cells, in characters
pub fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }
    widths
}

/// Left-align `cell` to `width`
pub fn pad(cell: &str, width: usize) -> String {
    format!("{:<width$}", cell, width = width)
}

/// Lay out a table as plain lines, columns separated by two spaces
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths = column_widths(headers, rows);
    let mut lines = Vec::with_capacity(rows.len() + 1);

    let header_cells: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    lines.push(header_cells.join("  ").trim_end().to_string());

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i]))
            .collect();
        lines.push(cells.join("  ").trim_end().to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y\n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yes"));
        assert!(!is_affirmative("n"));
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            vec!["release-gr".to_string(), "10:00 UTC".to_string()],
            vec!["mx".to_string(), "10:25 UTC".to_string()],
        ];
        let lines = render_table(&["Branch", "Start Time"], &rows);
        assert_eq!(
            lines,
            vec![
                "Branch      Start Time",
                "release-gr  10:00 UTC",
                "mx          10:25 UTC",
            ]
        );
    }

    #[test]
    fn test_render_table_without_rows() {
        let lines = render_table(&["Branch", "Behind", "Ahead"], &[]);
        assert_eq!(lines, vec!["Branch  Behind  Ahead"]);
    }

    #[test]
    fn test_column_widths_counts_chars() {
        let rows = vec![vec!["ñandú".to_string()]];
        assert_eq!(column_widths(&["A"], &rows), vec![5]);
    }
}
