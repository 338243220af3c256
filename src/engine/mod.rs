mod backend;
mod error;
mod handle;
mod schema;
mod seed;
mod sqlite;
mod value;

pub use backend::{Connection, Engine};
pub use error::{EngineError, Result};
pub use handle::DatabaseHandle;
pub use schema::{sanitize_identifier, ColumnInfo, SchemaInspector, TableSummary};
pub use seed::SEED_SCRIPT;
pub use sqlite::{SqliteConnection, SqliteEngine};
pub use value::{ResultSet, StatementBatch, Value};
