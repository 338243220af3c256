use std::time::{Duration, Instant};

use crate::lessons::Lesson;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Normal,
    Insert,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Lessons,
    Query,
    Results,
}

pub struct App {
    pub session: Session,
    /// Byte offset into the query, always on a char boundary.
    pub cursor_pos: usize,
    pub mode: Mode,
    pub focus: Focus,
    pub should_quit: bool,
    pub command_buffer: String,
    pub status: Option<String>,
    pub result_scroll: u16,
    pub result_horizontal_scroll: u16,
    pub lesson_index: usize,
    pub history: Vec<String>,
    pub history_index: Option<usize>,
    pub notice_ttl: Duration,
}

impl App {
    pub fn new(session: Session, notice_ttl: Duration) -> Self {
        let cursor_pos = session.query().len();
        let mut app = Self {
            session,
            cursor_pos,
            mode: Mode::Normal,
            focus: Focus::Lessons,
            should_quit: false,
            command_buffer: String::new(),
            status: None,
            result_scroll: 0,
            result_horizontal_scroll: 0,
            lesson_index: 0,
            history: Vec::new(),
            history_index: None,
            notice_ttl,
        };
        app.sync_lesson_index();
        app
    }

    pub fn query(&self) -> &str {
        self.session.query()
    }

    pub fn tick(&mut self) {
        self.session.expire_notice(Instant::now());
    }

    pub fn execute_query(&mut self) {
        let query = self.query().to_string();
        if !query.trim().is_empty() && self.history.last() != Some(&query) {
            self.history.push(query);
        }
        self.history_index = None;

        self.session.run();
        self.result_scroll = 0;
        self.result_horizontal_scroll = 0;
    }

    pub fn reset_database(&mut self) {
        self.session.reset();
        self.result_scroll = 0;
    }

    pub fn refresh_schema(&mut self) {
        self.session.show_schema();
    }

    pub fn share(&mut self) {
        let share = self.session.share(self.notice_ttl);
        self.status = Some(share.address);
    }

    pub fn load_example(&mut self) {
        if self.session.load_example() {
            self.cursor_pos = self.query().len();
            self.focus = Focus::Query;
        } else {
            self.status = Some("Select a lesson first".to_string());
        }
    }

    // Lessons

    pub fn visible_lessons(&self) -> Vec<&'static Lesson> {
        self.session
            .visible_lessons()
            .into_iter()
            .flat_map(|group| group.lessons)
            .collect()
    }

    fn sync_lesson_index(&mut self) {
        let selected = self.session.selected_lesson().map(|l| l.id);
        self.lesson_index = self
            .visible_lessons()
            .iter()
            .position(|l| Some(l.id) == selected)
            .unwrap_or(0);
    }

    pub fn next_lesson(&mut self) {
        let count = self.visible_lessons().len();
        if count > 0 && self.lesson_index + 1 < count {
            self.lesson_index += 1;
        }
    }

    pub fn previous_lesson(&mut self) {
        self.lesson_index = self.lesson_index.saturating_sub(1);
    }

    pub fn select_highlighted_lesson(&mut self) {
        if let Some(lesson) = self.visible_lessons().get(self.lesson_index) {
            self.session.select_lesson(lesson.id);
        }
    }

    pub fn select_lesson(&mut self, id: &str) {
        if self.session.select_lesson(id).is_some() {
            self.sync_lesson_index();
        } else {
            self.status = Some(format!("Unknown lesson: {}", id));
        }
    }

    pub fn filter_lessons(&mut self, text: &str) {
        self.session.filter_lessons(text);
        self.sync_lesson_index();
    }

    // Editor

    pub fn insert_char(&mut self, c: char) {
        let pos = self.cursor_pos;
        self.session.query_mut().insert(pos, c);
        self.cursor_pos += c.len_utf8();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.query()[..self.cursor_pos]
            .chars()
            .next_back()
            .map(|c| self.cursor_pos - c.len_utf8())
    }

    fn next_boundary(&self) -> Option<usize> {
        self.query()[self.cursor_pos..]
            .chars()
            .next()
            .map(|c| self.cursor_pos + c.len_utf8())
    }

    pub fn delete_char(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.session.query_mut().remove(prev);
            self.cursor_pos = prev;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_pos < self.query().len() {
            let pos = self.cursor_pos;
            self.session.query_mut().remove(pos);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor_pos = prev;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor_pos = next;
        }
    }

    pub fn move_cursor_start(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.query().len();
    }

    pub fn move_cursor_word_forward(&mut self) {
        let rest = &self.query()[self.cursor_pos..];
        let mut chars = rest.char_indices().peekable();

        // Skip current word, then the whitespace after it
        while let Some(&(_, c)) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            chars.next();
        }
        while let Some(&(_, c)) = chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            chars.next();
        }

        let offset = chars.peek().map(|&(i, _)| i).unwrap_or(rest.len());
        self.cursor_pos += offset;
    }

    pub fn move_cursor_word_backward(&mut self) {
        let before = &self.query()[..self.cursor_pos];
        let trimmed = before.trim_end();
        self.cursor_pos = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
    }

    fn line_start(&self, pos: usize) -> usize {
        self.query()[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.query()[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(self.query().len())
    }

    /// Byte offset of the `column`-th char of the line starting at `start`,
    /// clamped to the line end.
    fn offset_in_line(&self, start: usize, column: usize) -> usize {
        let end = self.line_end(start);
        self.query()[start..end]
            .char_indices()
            .nth(column)
            .map(|(i, _)| start + i)
            .unwrap_or(end)
    }

    fn column(&self) -> usize {
        let start = self.line_start(self.cursor_pos);
        self.query()[start..self.cursor_pos].chars().count()
    }

    pub fn move_cursor_up(&mut self) {
        let current_start = self.line_start(self.cursor_pos);
        if current_start == 0 {
            return;
        }
        let column = self.column();
        let prev_start = self.line_start(current_start - 1);
        self.cursor_pos = self.offset_in_line(prev_start, column);
    }

    pub fn move_cursor_down(&mut self) {
        let current_end = self.line_end(self.cursor_pos);
        if current_end == self.query().len() {
            return;
        }
        let column = self.column();
        self.cursor_pos = self.offset_in_line(current_end + 1, column);
    }

    pub fn delete_word_backward(&mut self) {
        let end = self.cursor_pos;
        self.move_cursor_word_backward();
        let start = self.cursor_pos;
        self.session.query_mut().drain(start..end);
    }

    pub fn delete_to_end(&mut self) {
        let pos = self.cursor_pos;
        self.session.query_mut().truncate(pos);
    }

    pub fn delete_to_start(&mut self) {
        let pos = self.cursor_pos;
        self.session.query_mut().drain(..pos);
        self.cursor_pos = 0;
    }

    pub fn clear_query(&mut self) {
        self.session.query_mut().clear();
        self.cursor_pos = 0;
    }

    fn replace_query(&mut self, text: String) {
        self.session.set_query(text);
        self.cursor_pos = self.query().len();
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let new_index = match self.history_index {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };

        self.history_index = Some(new_index);
        self.replace_query(self.history[new_index].clone());
    }

    pub fn history_down(&mut self) {
        match self.history_index {
            None => {}
            Some(i) if i + 1 >= self.history.len() => {
                self.history_index = None;
                self.clear_query();
            }
            Some(i) => {
                self.history_index = Some(i + 1);
                self.replace_query(self.history[i + 1].clone());
            }
        }
    }

    // Results

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn scroll_results_down(&mut self) {
        self.result_scroll = self.result_scroll.saturating_add(1);
    }

    pub fn scroll_results_left(&mut self) {
        self.result_horizontal_scroll = self.result_horizontal_scroll.saturating_sub(4);
    }

    pub fn scroll_results_right(&mut self) {
        self.result_horizontal_scroll = self.result_horizontal_scroll.saturating_add(4);
    }

    pub fn page_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(10);
    }

    pub fn page_down(&mut self) {
        self.result_scroll = self.result_scroll.saturating_add(10);
    }

    // Modes

    pub fn enter_insert_mode(&mut self) {
        self.mode = Mode::Insert;
        self.focus = Focus::Query;
    }

    pub fn enter_normal_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_buffer.clear();
    }

    pub fn execute_command(&mut self) {
        let buffer = std::mem::take(&mut self.command_buffer);
        let (cmd, arg) = match buffer.trim().split_once(' ') {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (buffer.trim(), ""),
        };
        self.status = None;

        match cmd {
            "q" | "quit" => self.should_quit = true,
            "e" | "exec" | "execute" | "run" => self.execute_query(),
            "reset" => self.reset_database(),
            "schema" => self.refresh_schema(),
            "share" => self.share(),
            "load" => self.load_example(),
            "lesson" => self.select_lesson(arg),
            "filter" => self.filter_lessons(arg),
            "open" => {
                if self.session.apply_shared(arg) {
                    self.cursor_pos = self.query().len();
                } else {
                    self.status = Some("Nothing to restore from that link".to_string());
                }
            }
            "clear" => self.clear_query(),
            "" => {}
            other => self.status = Some(format!("Unknown command: {}", other)),
        }
        self.mode = Mode::Normal;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Lessons => Focus::Query,
            Focus::Query => Focus::Results,
            Focus::Results => Focus::Lessons,
        };
    }
}
