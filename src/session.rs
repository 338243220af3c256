//! The session controller.
//!
//! A [`Session`] only exists once the engine has bootstrapped and the first
//! database has been created, so every action below runs against a ready
//! session. Failures from user actions are absorbed here and come back as
//! render model annotations; only bootstrap errors escape.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::codec;
use crate::config::AppConfig;
use crate::engine::{DatabaseHandle, Engine, EngineError, SchemaInspector, SqliteEngine};
use crate::lessons::{Catalog, GroupView, Lesson};
use crate::locator;
use crate::render::{self, Annotation, RenderModel, Severity};

pub const EMPTY_QUERY_MESSAGE: &str = "Type a SQL statement to run.";
pub const RESET_MESSAGE: &str = "Database reset.";
pub const SHARE_MESSAGE: &str = "Share link updated in the address bar.";

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Lesson to select on start.
    pub start_lesson: Option<String>,
    /// Shared state to restore: a bare locator or a full page address.
    pub shared: Option<String>,
    /// Page address the `sql` parameter is written into on share.
    pub address: String,
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            start_lesson: Some(config.start_lesson.clone()),
            shared: None,
            address: config.share_base_url.clone(),
        }
    }
}

/// Outcome of a share action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub locator: String,
    pub address: String,
}

#[derive(Debug, Clone)]
struct Notice {
    annotation: Annotation,
    expires_at: Instant,
}

pub struct Session<E: Engine = SqliteEngine> {
    db: DatabaseHandle<E>,
    catalog: Catalog,
    query: String,
    selected: Option<&'static Lesson>,
    filter: String,
    results: RenderModel,
    schema: RenderModel,
    notice: Option<Notice>,
    address: String,
}

impl Session<SqliteEngine> {
    /// Awaits the engine bootstrap, then starts a session on it.
    pub async fn bootstrap(options: SessionOptions) -> Result<Self, EngineError> {
        let engine = SqliteEngine::bootstrap().await?;
        Self::start(engine, options)
    }
}

impl<E: Engine> Session<E> {
    /// Creates and seeds the first database, selects the start lesson and
    /// restores shared query text if any was given.
    pub fn start(engine: E, options: SessionOptions) -> Result<Self, EngineError> {
        Self::with_database(DatabaseHandle::new(engine), options)
    }

    pub fn with_database(
        mut db: DatabaseHandle<E>,
        options: SessionOptions,
    ) -> Result<Self, EngineError> {
        db.create_database()
            .map_err(|e| EngineError::Bootstrap(e.to_string()))?;

        let mut session = Self {
            db,
            catalog: Catalog::builtin(),
            query: String::new(),
            selected: None,
            filter: String::new(),
            results: RenderModel::new(),
            schema: RenderModel::new(),
            notice: None,
            address: options.address,
        };

        session.refresh_schema();
        if let Some(id) = options.start_lesson.as_deref() {
            if session.select_lesson(id).is_none() {
                warn!(lesson = id, "unknown start lesson");
            }
        }
        if let Some(shared) = options.shared.as_deref() {
            session.apply_shared(shared);
        }

        Ok(session)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn query_mut(&mut self) -> &mut String {
        &mut self.query
    }

    pub fn results(&self) -> &RenderModel {
        &self.results
    }

    pub fn schema(&self) -> &RenderModel {
        &self.schema
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn database(&self) -> &DatabaseHandle<E> {
        &self.db
    }

    /// Runs the editor text. Blank text never reaches the engine.
    pub fn run(&mut self) -> &RenderModel {
        self.notice = None;

        if self.query.trim().is_empty() {
            self.results = RenderModel::message(Severity::Neutral, EMPTY_QUERY_MESSAGE);
            return &self.results;
        }

        self.results = match self.db.execute(&self.query) {
            Ok(batch) => render::render(&batch, None),
            Err(err) => render::render_error(&err.to_string()),
        };
        &self.results
    }

    /// Restores the pristine seeded database. The editor text is untouched.
    pub fn reset(&mut self) -> &RenderModel {
        self.notice = None;

        self.results = match self.db.reset() {
            Ok(()) => RenderModel::message(Severity::Ok, RESET_MESSAGE),
            Err(err) => render::render_error(&err.to_string()),
        };
        self.refresh_schema();
        &self.results
    }

    pub fn show_schema(&mut self) -> &RenderModel {
        self.refresh_schema();
        &self.schema
    }

    fn refresh_schema(&mut self) {
        self.schema = match SchemaInspector::new(&mut self.db).summary() {
            Ok(tables) => render::render_schema(&tables),
            Err(err) => render::render_error(&err.to_string()),
        };
    }

    pub fn select_lesson(&mut self, id: &str) -> Option<&'static Lesson> {
        let lesson = self.catalog.find_lesson(id)?;
        self.selected = Some(lesson);
        Some(lesson)
    }

    pub fn selected_lesson(&self) -> Option<&'static Lesson> {
        self.selected
    }

    /// Copies the selected lesson's example into the editor. Returns `false`
    /// when no lesson is selected.
    pub fn load_example(&mut self) -> bool {
        match self.selected {
            Some(lesson) => {
                self.query = lesson.editor_text();
                true
            }
            None => false,
        }
    }

    /// Writes the encoded editor text into the page address and raises a
    /// confirmation that disappears after `ttl`.
    pub fn share(&mut self, ttl: Duration) -> Share {
        let locator = codec::encode(&self.query);
        self.address = locator::with_locator(&self.address, &locator);
        self.notice = Some(Notice {
            annotation: Annotation::new(Severity::Ok, SHARE_MESSAGE),
            expires_at: Instant::now() + ttl,
        });
        debug!(address = %self.address, "share link updated");

        Share {
            locator,
            address: self.address.clone(),
        }
    }

    /// The share confirmation, while it has not expired.
    pub fn notice(&self, now: Instant) -> Option<&Annotation> {
        self.notice
            .as_ref()
            .filter(|n| now < n.expires_at)
            .map(|n| &n.annotation)
    }

    pub fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.notice = None;
        }
    }

    /// Restores editor text from a shared locator or page address. Absent or
    /// malformed input leaves the editor as it was.
    pub fn apply_shared(&mut self, shared: &str) -> bool {
        match locator::query_from(shared) {
            Some(query) => {
                self.query = query;
                if shared.contains('?') {
                    self.address = shared.trim().to_string();
                }
                true
            }
            None => {
                debug!("no usable shared query");
                false
            }
        }
    }

    pub fn filter_lessons(&mut self, query: &str) {
        self.filter = query.to_string();
    }

    pub fn lesson_filter(&self) -> &str {
        &self.filter
    }

    pub fn visible_lessons(&self) -> Vec<GroupView> {
        self.catalog.filter(&self.filter)
    }

    /// Releases the database. Safe to call more than once.
    pub fn close(&mut self) {
        self.db.close();
    }
}
