use super::error::Result;
use super::value::StatementBatch;

/// An embedded SQL engine able to open fresh, empty database instances.
pub trait Engine {
    type Connection: Connection;

    fn open(&self) -> Result<Self::Connection>;
}

/// One live database instance.
pub trait Connection {
    /// Runs one or more `;`-separated statements. Execution stops at the first
    /// failing statement; statements before it stay applied. Only statements
    /// that produced rows contribute a result set.
    fn execute_batch(&mut self, sql: &str) -> Result<StatementBatch>;

    fn close(self) -> Result<()>;
}
