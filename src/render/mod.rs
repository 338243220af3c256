//! Turns statement output into a [`RenderModel`].
//!
//! Rendering is a pure function of its inputs; drawing the model is left to
//! the adapters in [`text`], [`html`] and the terminal UI.

pub mod html;
mod model;
pub mod text;

pub use model::{Annotation, Block, RenderModel, SafeText, Severity, TableBlock};

use crate::engine::{ResultSet, TableSummary};

pub const NO_ROWS_MESSAGE: &str = "Statement executed. No rows returned.";
pub const NO_TABLES_MESSAGE: &str = "No user tables found.";
/// Header of the schema summary table.
pub const SCHEMA_HEADER: [&str; 2] = ["table", "columns"];

/// Renders a batch of result sets.
///
/// A non-empty `info` is carried as an ok annotation ahead of any table. An
/// empty batch without `info` yields the neutral "no rows" annotation. With
/// more than one result set, each table is preceded by a `Result set N` label.
pub fn render(batch: &[ResultSet], info: Option<&str>) -> RenderModel {
    let mut model = RenderModel::new();
    let info = info.filter(|text| !text.is_empty());

    if let Some(text) = info {
        model.push_message(Severity::Ok, text);
    }

    if batch.is_empty() {
        if info.is_none() {
            model.push_message(Severity::Neutral, NO_ROWS_MESSAGE);
        }
        return model;
    }

    let labelled = batch.len() > 1;
    for (idx, result) in batch.iter().enumerate() {
        if labelled {
            model.push_message(Severity::Neutral, &format!("Result set {}", idx + 1));
        }
        model.push(Block::Table(table_block(result)));
    }

    model
}

fn table_block(result: &ResultSet) -> TableBlock {
    let header = result.columns.iter().map(|c| SafeText::escape(c)).collect();
    let rows = result
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| SafeText::escape(&cell.display_text()))
                .collect()
        })
        .collect();

    TableBlock::new(header, rows)
}

/// A failed execution: one error annotation carrying the engine's message.
pub fn render_error(message: &str) -> RenderModel {
    RenderModel::message(Severity::Error, message)
}

/// One neutral table with a `table | columns` row per user table, where
/// columns read `name TYPE, ...`. A neutral "no tables" message when there
/// are none.
pub fn render_schema(tables: &[TableSummary]) -> RenderModel {
    if tables.is_empty() {
        return RenderModel::message(Severity::Neutral, NO_TABLES_MESSAGE);
    }

    let header = SCHEMA_HEADER.iter().map(|h| SafeText::escape(h)).collect();
    let rows = tables
        .iter()
        .map(|table| {
            let columns = table
                .columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.declared_type).trim_end().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            vec![SafeText::escape(&table.name), SafeText::escape(&columns)]
        })
        .collect();

    let mut model = RenderModel::new();
    model.push(Block::Table(TableBlock::new(header, rows)));
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ColumnInfo, Value};

    fn result(columns: &[&str], rows: Vec<Vec<Value>>) -> ResultSet {
        ResultSet::with_rows(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn test_empty_batch_without_info() {
        let model = render(&[], None);
        assert_eq!(model, RenderModel::message(Severity::Neutral, NO_ROWS_MESSAGE));
    }

    #[test]
    fn test_empty_batch_with_info() {
        let model = render(&[], Some("Database reset."));
        assert_eq!(model, RenderModel::message(Severity::Ok, "Database reset."));
    }

    #[test]
    fn test_empty_info_counts_as_absent() {
        let model = render(&[], Some(""));
        assert_eq!(model, RenderModel::message(Severity::Neutral, NO_ROWS_MESSAGE));
    }

    #[test]
    fn test_info_with_tables() {
        let batch = vec![result(&["n"], vec![vec![Value::Integer(5)]])];
        let model = render(&batch, Some("done"));

        assert_eq!(model.blocks.len(), 2);
        assert_eq!(model.blocks[0].severity(), Severity::Ok);
        assert!(matches!(model.blocks[1], Block::Table(_)));
    }

    #[test]
    fn test_single_result_set_has_no_label() {
        let batch = vec![result(&["n"], vec![vec![Value::Integer(5)]])];
        let model = render(&batch, None);

        assert_eq!(model.blocks.len(), 1);
        let table = model.tables().next().unwrap();
        assert_eq!(table.header[0].as_markup(), "n");
        assert_eq!(table.rows[0][0].as_markup(), "5");
    }

    #[test]
    fn test_multiple_result_sets_are_labelled() {
        let batch = vec![
            result(&["a"], vec![vec![Value::Integer(1)]]),
            result(&["b"], vec![vec![Value::Integer(2)]]),
        ];
        let model = render(&batch, None);

        let labels: Vec<String> = model.messages().map(|a| a.text.to_string()).collect();
        assert_eq!(labels, vec!["Result set 1", "Result set 2"]);
        assert!(matches!(model.blocks[0], Block::Message(_)));
        assert!(matches!(model.blocks[1], Block::Table(_)));
        assert!(matches!(model.blocks[3], Block::Table(_)));
    }

    #[test]
    fn test_null_renders_empty() {
        let batch = vec![result(&["m"], vec![vec![Value::Null]])];
        let model = render(&batch, None);
        let cell = &model.tables().next().unwrap().rows[0][0];
        assert_eq!(cell.as_markup(), "");
    }

    #[test]
    fn test_markup_is_neutralized() {
        let batch = vec![result(
            &["<th>"],
            vec![vec![Value::Text("<script>alert(1)</script>".to_string())]],
        )];
        let model = render(&batch, None);
        let table = model.tables().next().unwrap();

        assert_eq!(table.header[0].as_markup(), "&lt;th&gt;");
        let cell = table.rows[0][0].as_markup();
        assert!(!cell.contains('<') && !cell.contains('>'));
        assert_eq!(cell, "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[test]
    fn test_duplicate_column_names_are_kept() {
        let batch = vec![result(&["x", "x"], vec![vec![Value::Integer(1), Value::Integer(2)]])];
        let model = render(&batch, None);
        assert_eq!(model.tables().next().unwrap().header.len(), 2);
    }

    #[test]
    fn test_render_error_escapes() {
        let model = render_error("near \"<\": syntax error");
        let annotation = model.messages().next().unwrap();
        assert_eq!(annotation.severity, Severity::Error);
        assert_eq!(annotation.text.as_markup(), "near &quot;&lt;&quot;: syntax error");
    }

    #[test]
    fn test_render_schema() {
        let tables = vec![TableSummary {
            name: "t".to_string(),
            columns: vec![
                ColumnInfo {
                    name: "id".to_string(),
                    declared_type: "INTEGER".to_string(),
                },
                ColumnInfo {
                    name: "x".to_string(),
                    declared_type: String::new(),
                },
            ],
        }];
        let model = render_schema(&tables);

        assert_eq!(model.blocks.len(), 1);
        assert_eq!(model.blocks[0].severity(), Severity::Neutral);
        let table = model.tables().next().unwrap();
        let header: Vec<&str> = table.header.iter().map(|h| h.as_markup()).collect();
        assert_eq!(header, SCHEMA_HEADER);
        assert_eq!(table.rows[0][0].as_markup(), "t");
        assert_eq!(table.rows[0][1].as_markup(), "id INTEGER, x");
    }

    #[test]
    fn test_schema_json_uses_table_kind() {
        let tables = vec![TableSummary {
            name: "t".to_string(),
            columns: vec![ColumnInfo {
                name: "id".to_string(),
                declared_type: "INTEGER".to_string(),
            }],
        }];
        let json = serde_json::to_value(render_schema(&tables)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "blocks": [{
                    "kind": "table",
                    "severity": "neutral",
                    "header": ["table", "columns"],
                    "rows": [["t", "id INTEGER"]]
                }]
            })
        );
    }

    #[test]
    fn test_render_schema_without_tables() {
        let model = render_schema(&[]);
        assert_eq!(model, RenderModel::message(Severity::Neutral, NO_TABLES_MESSAGE));
    }
}
