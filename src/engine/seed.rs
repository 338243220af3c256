use tracing::{debug, warn};

use super::backend::Connection;
use super::error::{EngineError, Result};

/// Teaching dataset applied to every fresh instance. Four tables, two foreign
/// keys into `departments`/`customers`, one secondary index.
pub const SEED_SCRIPT: &str = "
BEGIN;
CREATE TABLE departments (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL
);
CREATE TABLE employees (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  department_id INTEGER NOT NULL,
  salary REAL NOT NULL,
  hire_date TEXT NOT NULL,
  manager_id INTEGER,
  FOREIGN KEY(department_id) REFERENCES departments(id),
  FOREIGN KEY(manager_id) REFERENCES employees(id)
);
CREATE TABLE customers (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  city TEXT NOT NULL
);
CREATE TABLE orders (
  id INTEGER PRIMARY KEY,
  customer_id INTEGER NOT NULL,
  amount REAL NOT NULL,
  order_date TEXT NOT NULL,
  FOREIGN KEY(customer_id) REFERENCES customers(id)
);

INSERT INTO departments (id, name) VALUES
  (1, 'Engineering'),
  (2, 'Sales'),
  (3, 'HR');

INSERT INTO employees (id, name, department_id, salary, hire_date, manager_id) VALUES
  (1, 'Alice', 1, 120000, '2018-01-15', NULL),
  (2, 'Bob', 1, 90000, '2019-03-20', 1),
  (3, 'Carol', 2, 80000, '2020-07-10', NULL),
  (4, 'Dan', 2, 70000, '2021-04-05', 3),
  (5, 'Erin', 3, 60000, '2017-11-30', NULL);

INSERT INTO customers (id, name, city) VALUES
  (1, 'Acme Corp', 'New York'),
  (2, 'Globex', 'San Francisco'),
  (3, 'Umbrella', 'Chicago'),
  (4, 'Initech', 'New York');

INSERT INTO orders (id, customer_id, amount, order_date) VALUES
  (1, 1, 250.50, '2023-01-10'),
  (2, 1, 99.99, '2023-02-14'),
  (3, 2, 500.00, '2023-03-03'),
  (4, 3, 80.25, '2023-03-05'),
  (5, 4, 200.00, '2023-04-01');

CREATE INDEX idx_orders_customer_id ON orders(customer_id);
COMMIT;";

/// Applies `script` to a fresh instance. A failure is logged and reported as
/// `EngineError::Seed`; an open transaction left behind by the script is rolled back.
pub(crate) fn apply<C: Connection>(conn: &mut C, script: &str) -> Result<()> {
    match conn.execute_batch(script) {
        Ok(_) => {
            debug!("seed dataset applied");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "seed error");
            if let Err(rollback) = conn.execute_batch("ROLLBACK;") {
                debug!(error = %rollback, "nothing to roll back after seed error");
            }
            Err(EngineError::Seed(err.to_string()))
        }
    }
}
