pub mod cli;
pub mod codec;
pub mod config;
pub mod engine;
pub mod lessons;
pub mod locator;
pub mod render;
pub mod session;
pub mod tui;

pub use config::AppConfig;
pub use engine::{DatabaseHandle, EngineError, ResultSet, SqliteEngine, Value};
pub use render::{render, RenderModel};
pub use session::{Session, SessionOptions, Share};
