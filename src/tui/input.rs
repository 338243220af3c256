use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use super::app::{App, Focus, Mode};

pub fn handle_events(app: &mut App) -> std::io::Result<bool> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            handle_key_event(app, key);
        }
    }
    app.tick();
    Ok(app.should_quit)
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C leaves insert mode, quits otherwise
    if ctrl && key.code == KeyCode::Char('c') {
        if app.mode == Mode::Insert {
            app.enter_normal_mode();
        } else {
            app.should_quit = true;
        }
        return;
    }

    // F5 / Ctrl+R run from any mode but the command line
    if app.mode != Mode::Command
        && (key.code == KeyCode::F(5) || (ctrl && key.code == KeyCode::Char('r')))
    {
        app.execute_query();
        return;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Insert => handle_insert_mode(app, key),
        Mode::Command => handle_command_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('i') => app.enter_insert_mode(),
        KeyCode::Char('I') => {
            app.move_cursor_start();
            app.enter_insert_mode();
        }
        KeyCode::Char('a') => {
            app.move_cursor_right();
            app.enter_insert_mode();
        }
        KeyCode::Char('A') => {
            app.move_cursor_end();
            app.enter_insert_mode();
        }
        KeyCode::Char(':') => app.enter_command_mode(),
        KeyCode::Char('/') => {
            app.enter_command_mode();
            app.command_buffer.push_str("filter ");
        }

        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => app.toggle_focus(),

        // Session actions
        KeyCode::Char('L') => app.load_example(),
        KeyCode::Char('R') => app.reset_database(),
        KeyCode::Char('S') => app.refresh_schema(),
        KeyCode::Char('s') => app.share(),

        KeyCode::Char('d') if ctrl => app.page_down(),
        KeyCode::Char('u') if ctrl => app.page_up(),

        KeyCode::Enter => match app.focus {
            Focus::Lessons => app.select_highlighted_lesson(),
            Focus::Query | Focus::Results => app.execute_query(),
        },

        _ => match app.focus {
            Focus::Lessons => handle_lessons_key(app, key),
            Focus::Query => handle_query_key(app, key),
            Focus::Results => handle_results_key(app, key),
        },
    }
}

fn handle_lessons_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.next_lesson(),
        KeyCode::Char('k') | KeyCode::Up => app.previous_lesson(),
        _ => {}
    }
}

fn handle_query_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.move_cursor_left(),
        KeyCode::Char('l') | KeyCode::Right => app.move_cursor_right(),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor_up(),
        KeyCode::Char('0') => app.move_cursor_start(),
        KeyCode::Char('$') => app.move_cursor_end(),
        KeyCode::Char('w') => app.move_cursor_word_forward(),
        KeyCode::Char('b') => app.move_cursor_word_backward(),
        KeyCode::Char('x') => app.delete_char_forward(),
        KeyCode::Char('D') => app.delete_to_end(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.scroll_results_left(),
        KeyCode::Char('l') | KeyCode::Right => app.scroll_results_right(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_results_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_results_up(),
        KeyCode::Char('g') => app.result_scroll = 0,
        _ => {}
    }
}

fn handle_insert_mode(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => app.enter_normal_mode(),
        KeyCode::Enter => app.insert_char('\n'),
        KeyCode::Tab => {
            app.insert_char(' ');
            app.insert_char(' ');
        }
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Up => app.move_cursor_up(),
        KeyCode::Down => app.move_cursor_down(),
        KeyCode::Home => app.move_cursor_start(),
        KeyCode::End => app.move_cursor_end(),

        KeyCode::Char('p') if ctrl => app.history_up(),
        KeyCode::Char('n') if ctrl => app.history_down(),
        KeyCode::Char('w') if ctrl => app.delete_word_backward(),
        KeyCode::Char('u') if ctrl => app.delete_to_start(),
        KeyCode::Char('k') if ctrl => app.delete_to_end(),
        KeyCode::Char('a') if ctrl => app.move_cursor_start(),
        KeyCode::Char('e') if ctrl => app.move_cursor_end(),

        KeyCode::Char(c) if !ctrl => app.insert_char(c),

        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.command_buffer.clear();
            app.enter_normal_mode();
        }
        KeyCode::Enter => app.execute_command(),
        KeyCode::Backspace => {
            app.command_buffer.pop();
            if app.command_buffer.is_empty() {
                app.enter_normal_mode();
            }
        }
        KeyCode::Char(c) => app.command_buffer.push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SqliteEngine;
    use crate::session::{Session, SessionOptions};

    fn app() -> App {
        let session =
            Session::start(SqliteEngine::new().unwrap(), SessionOptions::default()).unwrap();
        App::new(session, Duration::from_millis(100))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_insert_newline_then_run() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        for c in "SELECT 1".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char(';'));
        assert_eq!(app.query(), "SELECT 1\n;");

        press(&mut app, KeyCode::F(5));
        assert_eq!(app.session.results().tables().count(), 1);
        assert_eq!(app.mode, Mode::Insert);
    }

    #[test]
    fn test_slash_opens_filter_command() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        for c in "like".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.lesson_filter(), "like");
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_ctrl_c_quits_from_normal_mode() {
        let mut app = app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
