use rusqlite::Batch;
use tracing::{debug, info};

use super::backend::{Connection, Engine};
use super::error::{EngineError, Result};
use super::value::{ResultSet, StatementBatch, Value};

/// In-process SQLite engine. Every opened instance is a private in-memory database.
#[derive(Debug, Clone)]
pub struct SqliteEngine {
    version: String,
}

impl SqliteEngine {
    /// Probes the engine synchronously.
    pub fn new() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| EngineError::Bootstrap(e.to_string()))?;
        let version: String = conn
            .query_row("SELECT sqlite_version()", [], |row| row.get(0))
            .map_err(|e| EngineError::Bootstrap(e.to_string()))?;
        conn.close()
            .map_err(|(_, e)| EngineError::Bootstrap(e.to_string()))?;

        Ok(Self { version })
    }

    /// One-time initialization gate. Nothing may touch the engine before this resolves.
    pub async fn bootstrap() -> Result<Self> {
        let engine = tokio::task::spawn_blocking(Self::new)
            .await
            .map_err(|e| EngineError::Bootstrap(e.to_string()))??;

        info!(version = %engine.version, "SQLite engine ready");
        Ok(engine)
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Engine for SqliteEngine {
    type Connection = SqliteConnection;

    fn open(&self) -> Result<SqliteConnection> {
        let conn = rusqlite::Connection::open_in_memory()?;
        debug!("opened in-memory database");
        Ok(SqliteConnection { conn })
    }
}

pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }
}

fn query_error(err: rusqlite::Error) -> EngineError {
    EngineError::Query(err.to_string())
}

impl Connection for SqliteConnection {
    fn execute_batch(&mut self, sql: &str) -> Result<StatementBatch> {
        let mut results = Vec::new();
        let mut batch = Batch::new(&self.conn, sql);

        while let Some(mut stmt) = batch.next().map_err(query_error)? {
            let columns: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(String::from)
                .collect();

            let mut result = ResultSet::new(columns);
            let column_count = result.column_count();

            // Stepping also runs statements that return no columns (DDL, DML).
            let mut rows = stmt.raw_query();
            while let Some(row) = rows.next().map_err(query_error)? {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(Value::from(row.get_ref(i).map_err(query_error)?));
                }
                result.add_row(values);
            }

            if result.row_count() > 0 {
                results.push(result);
            }
        }

        Ok(results)
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| EngineError::Sqlite(e))?;
        debug!("closed in-memory database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> SqliteConnection {
        SqliteEngine::new().unwrap().open().unwrap()
    }

    #[test]
    fn test_engine_probe() {
        let engine = SqliteEngine::new().unwrap();
        assert!(engine.version().starts_with('3'));
    }

    #[tokio::test]
    async fn test_bootstrap_gate() {
        let engine = SqliteEngine::bootstrap().await.unwrap();
        assert!(!engine.version().is_empty());
    }

    #[test]
    fn test_statements_without_rows_produce_nothing() {
        let mut conn = open();
        let results = conn
            .execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_select_produces_nothing() {
        let mut conn = open();
        let results = conn
            .execute_batch("CREATE TABLE t (x INTEGER); SELECT * FROM t;")
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_multiple_result_sets() {
        let mut conn = open();
        let results = conn
            .execute_batch("SELECT 1 AS a; SELECT 'x' AS b, NULL AS c;")
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].columns, vec!["a"]);
        assert_eq!(results[1].columns, vec!["b", "c"]);
        assert_eq!(results[1].rows[0], vec![Value::Text("x".to_string()), Value::Null]);
    }

    #[test]
    fn test_dynamic_cell_types() {
        let mut conn = open();
        let results = conn
            .execute_batch("SELECT 1, 2.5, 'three', NULL, x'0102';")
            .unwrap();

        assert_eq!(
            results[0].rows[0],
            vec![
                Value::Integer(1),
                Value::Real(2.5),
                Value::Text("three".to_string()),
                Value::Null,
                Value::Blob(vec![1, 2]),
            ]
        );
    }

    #[test]
    fn test_failure_keeps_earlier_statements() {
        let mut conn = open();
        let err = conn
            .execute_batch("CREATE TABLE t (x); SELEKT 1; CREATE TABLE u (y);")
            .unwrap_err();
        assert!(matches!(err, EngineError::Query(ref msg) if msg.contains("SELEKT")));

        let tables = conn
            .execute_batch("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name;")
            .unwrap();
        assert_eq!(tables[0].rows, vec![vec![Value::Text("t".to_string())]]);
    }

    #[test]
    fn test_constraint_violation_is_query_error() {
        let mut conn = open();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY);").unwrap();
        conn.execute_batch("INSERT INTO t VALUES (1);").unwrap();

        let err = conn.execute_batch("INSERT INTO t VALUES (1);").unwrap_err();
        assert!(err.to_string().contains("UNIQUE"));
    }

    #[test]
    fn test_comment_and_blank_tail() {
        let mut conn = open();
        let results = conn.execute_batch("SELECT 1;  -- trailing\n\n").unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_transaction_state() {
        let mut conn = open();
        conn.execute_batch("BEGIN;").unwrap();
        assert!(conn.in_transaction());
        conn.execute_batch("ROLLBACK;").unwrap();
        assert!(!conn.in_transaction());
    }
}
