use super::model::{Block, RenderModel, SafeText, Severity, TableBlock};

/// Display width of each column: the widest of header and cells.
pub fn column_widths(table: &TableBlock) -> Vec<usize> {
    table
        .header
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let header_width = width(col);
            let max_value_width = table
                .rows
                .iter()
                .map(|row| row.get(i).map(width).unwrap_or(0))
                .max()
                .unwrap_or(0);
            header_width.max(max_value_width)
        })
        .collect()
}

fn width(text: &SafeText) -> usize {
    text.to_plain().chars().count()
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

pub fn format_row(cells: &[SafeText], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| pad(&cell.to_plain(), w))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn separator(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|&w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join("-+-")
}

/// Header, separator, rows and a row count footer.
pub fn table_lines(table: &TableBlock) -> Vec<String> {
    let widths = column_widths(table);
    let mut lines = Vec::with_capacity(table.rows.len() + 3);

    lines.push(format_row(&table.header, &widths));
    lines.push(separator(&widths));
    for row in &table.rows {
        lines.push(format_row(row, &widths));
    }
    lines.push(format!("({} rows)", table.rows.len()));

    lines
}

pub fn message_line(severity: Severity, text: &SafeText) -> String {
    match severity {
        Severity::Error => format!("Error: {}", text.to_plain()),
        Severity::Ok | Severity::Neutral => text.to_plain().into_owned(),
    }
}

/// Plain-text rendering for terminals and pipes.
pub fn to_table(model: &RenderModel) -> String {
    let mut lines = Vec::new();
    for block in &model.blocks {
        match block {
            Block::Message(annotation) => {
                lines.push(message_line(annotation.severity, &annotation.text))
            }
            Block::Table(table) => lines.extend(table_lines(table)),
        }
    }
    lines.join("\n")
}

/// CSV for the tables in `model`; messages are skipped.
pub fn to_csv(model: &RenderModel) -> String {
    let mut out = String::new();
    for table in model.tables() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&csv_line(&table.header));
        out.push('\n');
        for row in &table.rows {
            out.push_str(&csv_line(row));
            out.push('\n');
        }
    }
    out
}

fn csv_line(cells: &[SafeText]) -> String {
    cells
        .iter()
        .map(|cell| {
            let s = cell.to_plain();
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ResultSet, Value};
    use crate::render::render;

    fn model() -> RenderModel {
        let rs = ResultSet::with_rows(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![Value::Integer(1), Value::Text("Alice".to_string())],
                vec![Value::Integer(2), Value::Text("a, \"b\"".to_string())],
            ],
        );
        render(&[rs], None)
    }

    #[test]
    fn test_to_table() {
        let text = to_table(&model());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id | name  ");
        assert_eq!(lines[1], "---+-------");
        assert_eq!(lines[2], "1  | Alice ");
        assert_eq!(lines[3], "2  | a, \"b\"");
        assert_eq!(lines[4], "(2 rows)");
    }

    #[test]
    fn test_to_csv_quotes() {
        let csv = to_csv(&model());
        assert_eq!(csv, "id,name\n1,Alice\n2,\"a, \"\"b\"\"\"\n");
    }

    #[test]
    fn test_error_line() {
        let model = crate::render::render_error("no such table: x");
        assert_eq!(to_table(&model), "Error: no such table: x");
    }

    #[test]
    fn test_widths_count_chars() {
        let rs = ResultSet::with_rows(
            vec!["c".to_string()],
            vec![vec![Value::Text("café".to_string())]],
        );
        let model = render(&[rs], None);
        let widths = column_widths(model.tables().next().unwrap());
        assert_eq!(widths, vec![4]);
    }
}
