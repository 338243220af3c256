use super::backend::Engine;
use super::error::Result;
use super::handle::DatabaseHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

/// Keeps only `[A-Za-z0-9_]` so a table name can be interpolated into an
/// introspection statement.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Reads user table structure from the engine catalog.
pub struct SchemaInspector<'a, E: Engine> {
    db: &'a mut DatabaseHandle<E>,
}

impl<'a, E: Engine> SchemaInspector<'a, E> {
    pub fn new(db: &'a mut DatabaseHandle<E>) -> Self {
        Self { db }
    }

    /// Alphabetical, without SQLite's internal `sqlite_*` tables.
    pub fn list_user_tables(&mut self) -> Result<Vec<String>> {
        let batch = self.db.execute(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name;",
        )?;

        Ok(batch
            .first()
            .map(|rs| rs.rows.iter().map(|row| row[0].to_string()).collect())
            .unwrap_or_default())
    }

    /// Column names and declared types in table order. Empty for unknown tables.
    pub fn describe_table(&mut self, name: &str) -> Result<Vec<ColumnInfo>> {
        let ident = sanitize_identifier(name);
        if ident.is_empty() {
            return Ok(Vec::new());
        }

        let batch = self
            .db
            .execute(&format!("PRAGMA table_info(\"{}\");", ident))?;

        // cid, name, type, notnull, dflt_value, pk
        Ok(batch
            .first()
            .map(|rs| {
                rs.rows
                    .iter()
                    .map(|row| ColumnInfo {
                        name: row[1].to_string(),
                        declared_type: row[2].to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    pub fn summary(&mut self) -> Result<Vec<TableSummary>> {
        let mut tables = Vec::new();
        for name in self.list_user_tables()? {
            let columns = self.describe_table(&name)?;
            tables.push(TableSummary { name, columns });
        }
        Ok(tables)
    }
}
