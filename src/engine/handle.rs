use std::borrow::Cow;

use tracing::{debug, warn};

use super::backend::{Connection, Engine};
use super::error::{EngineError, Result};
use super::seed::{self, SEED_SCRIPT};
use super::value::StatementBatch;

/// Sole owner of the live database instance.
///
/// At most one instance exists at a time: creating a new one first closes the
/// previous one, so no two instances are ever addressable together.
pub struct DatabaseHandle<E: Engine> {
    engine: E,
    instance: Option<E::Connection>,
    seed: Cow<'static, str>,
    generation: u64,
}

impl<E: Engine> DatabaseHandle<E> {
    pub fn new(engine: E) -> Self {
        Self::with_seed(engine, SEED_SCRIPT)
    }

    pub fn with_seed(engine: E, seed: impl Into<Cow<'static, str>>) -> Self {
        Self {
            engine,
            instance: None,
            seed: seed.into(),
            generation: 0,
        }
    }

    /// Releases the current instance, opens a new one and seeds it.
    ///
    /// Only a failure to open is returned. Seed failures are logged and the
    /// new instance is kept as the engine left it.
    pub fn create_database(&mut self) -> Result<()> {
        self.close();

        let mut conn = self.engine.open()?;
        // seed::apply already reported the failure at warn
        if seed::apply(&mut conn, &self.seed).is_err() {
            debug!("continuing with partially seeded database");
        }

        self.instance = Some(conn);
        self.generation += 1;
        debug!(generation = self.generation, "database ready");
        Ok(())
    }

    /// Discards every change made during the session, user tables included.
    pub fn reset(&mut self) -> Result<()> {
        self.create_database()
    }

    pub fn execute(&mut self, sql: &str) -> Result<StatementBatch> {
        let conn = self.instance.as_mut().ok_or(EngineError::NoInstance)?;
        debug!(sql, "executing");
        conn.execute_batch(sql).map_err(|err| {
            debug!(error = %err, "statement failed");
            err
        })
    }

    /// Safe to call with no live instance.
    pub fn close(&mut self) {
        if let Some(conn) = self.instance.take() {
            if let Err(err) = conn.close() {
                warn!(error = %err, "failed to close database instance");
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.instance.is_some()
    }

    /// Number of instances created so far. Bumped on every create/reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

}

impl<E: Engine> Drop for DatabaseHandle<E> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SqliteEngine, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn handle() -> DatabaseHandle<SqliteEngine> {
        let mut db = DatabaseHandle::new(SqliteEngine::new().unwrap());
        db.create_database().unwrap();
        db
    }

    fn count(db: &mut DatabaseHandle<SqliteEngine>, table: &str) -> i64 {
        let batch = db.execute(&format!("SELECT COUNT(*) FROM {}", table)).unwrap();
        batch[0].rows[0][0].as_integer().unwrap()
    }

    #[test]
    fn test_execute_without_instance() {
        let mut db = DatabaseHandle::new(SqliteEngine::new().unwrap());
        assert!(matches!(db.execute("SELECT 1"), Err(EngineError::NoInstance)));
    }

    #[test]
    fn test_seeded_row_counts() {
        let mut db = handle();
        assert_eq!(count(&mut db, "departments"), 3);
        assert_eq!(count(&mut db, "employees"), 5);
        assert_eq!(count(&mut db, "customers"), 4);
        assert_eq!(count(&mut db, "orders"), 5);
    }

    #[test]
    fn test_seed_index_exists() {
        let mut db = handle();
        let batch = db
            .execute("SELECT name FROM sqlite_master WHERE type = 'index' AND name NOT LIKE 'sqlite_%'")
            .unwrap();
        assert_eq!(
            batch[0].rows,
            vec![vec![Value::Text("idx_orders_customer_id".to_string())]]
        );
    }

    #[test]
    fn test_reset_discards_changes() {
        let mut db = handle();
        db.execute("DELETE FROM orders; CREATE TABLE scratch (x);").unwrap();
        assert_eq!(count(&mut db, "orders"), 0);

        db.reset().unwrap();
        assert_eq!(count(&mut db, "orders"), 5);
        assert!(db.execute("SELECT * FROM scratch").is_err());
        assert_eq!(db.generation(), 2);
    }

    #[test]
    fn test_reset_inside_open_transaction() {
        let mut db = handle();
        db.execute("BEGIN; DELETE FROM employees;").unwrap();
        db.reset().unwrap();
        assert_eq!(count(&mut db, "employees"), 5);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut db = handle();
        db.close();
        db.close();
        assert!(!db.is_open());
        assert!(matches!(db.execute("SELECT 1"), Err(EngineError::NoInstance)));
    }

    #[test]
    fn test_seed_failure_is_not_fatal() {
        let mut db = DatabaseHandle::with_seed(
            SqliteEngine::new().unwrap(),
            "BEGIN; CREATE TABLE a (x); SELEKT; COMMIT;",
        );
        db.create_database().unwrap();

        assert!(db.is_open());
        // The failed seed transaction was rolled back, the instance still works.
        let batch = db.execute("SELECT COUNT(*) FROM sqlite_master").unwrap();
        assert_eq!(batch[0].rows[0][0], Value::Integer(0));
    }

    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_seed_failure_warns_once() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));

        tracing::subscriber::with_default(subscriber, || {
            let mut db = DatabaseHandle::with_seed(SqliteEngine::new().unwrap(), "SELEKT;");
            db.create_database().unwrap();
        });

        assert_eq!(warnings.load(Ordering::SeqCst), 1);
    }
}
