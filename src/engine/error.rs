use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Engine failed to initialize: {0}")]
    Bootstrap(String),

    #[error("Seeding failed: {0}")]
    Seed(String),

    /// A user-submitted statement failed. Carries the engine's message verbatim.
    #[error("{0}")]
    Query(String),

    #[error("No database instance is open")]
    NoInstance,
}

impl EngineError {
    /// Only a failed bootstrap ends the session; everything else is recoverable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Bootstrap(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_bootstrap_is_fatal() {
        assert!(EngineError::Bootstrap("no engine".to_string()).is_fatal());
        assert!(!EngineError::Seed("bad seed".to_string()).is_fatal());
        assert!(!EngineError::Query("syntax error".to_string()).is_fatal());
        assert!(!EngineError::NoInstance.is_fatal());
    }
}
