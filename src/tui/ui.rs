use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::render::{self, text, Annotation, RenderModel, Severity};

use super::app::{App, Focus, Mode};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(10),   // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(chunks[1]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Lesson detail
            Constraint::Length(8), // Query editor
            Constraint::Min(6),    // Results + schema
        ])
        .split(body[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(main[2]);

    draw_header(frame, chunks[0]);
    draw_lessons(frame, app, body[0]);
    draw_lesson_detail(frame, app, main[0]);
    draw_query_editor(frame, app, main[1]);
    draw_results(frame, app, bottom[0]);
    draw_schema(frame, app, bottom[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.mode == Mode::Command {
        draw_command_line(frame, app);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled("◆", Style::default().fg(Color::Yellow)),
        Span::styled(" sqldojo", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled("SQL Playground", Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

fn draw_lessons(frame: &mut Frame, app: &App, area: Rect) {
    let filter = app.session.lesson_filter();
    let title = if filter.trim().is_empty() {
        " Lessons (/ filter) ".to_string()
    } else {
        format!(" Lessons: {} ", filter.trim())
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == Focus::Lessons));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selected = app.session.selected_lesson().map(|l| l.id);
    let mut lines = Vec::new();
    let mut highlighted_line = 0;
    let mut index = 0;

    for group in app.session.visible_lessons() {
        lines.push(Line::from(Span::styled(
            group.title,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for lesson in group.lessons {
            let mut style = Style::default();
            if Some(lesson.id) == selected {
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            if index == app.lesson_index && app.focus == Focus::Lessons {
                style = style.add_modifier(Modifier::REVERSED);
                highlighted_line = lines.len();
            }
            lines.push(Line::from(Span::styled(format!("  {}", lesson.title), style)));
            index += 1;
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No matching lessons",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Keep the highlighted lesson on screen
    let height = inner.height as usize;
    let offset = highlighted_line.saturating_sub(height.saturating_sub(1));
    let paragraph = Paragraph::new(lines).scroll((offset as u16, 0));
    frame.render_widget(paragraph, inner);
}

fn draw_lesson_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Lesson (L: load example) ")
        .borders(Borders::ALL)
        .border_style(border_style(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match app.session.selected_lesson() {
        Some(lesson) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    lesson.title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(lesson.description),
            ];
            lines.extend(lesson.example.lines().map(highlight_sql_line));
            lines
        }
        None => vec![Line::from(Span::styled(
            "Select a lesson on the left",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn draw_query_editor(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Query;

    let block = Block::default()
        .title(" SQL (i: insert, F5: run) ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = app.query().split('\n').map(highlight_sql_line).collect();
    frame.render_widget(Paragraph::new(lines), inner);

    if app.mode == Mode::Insert && is_focused {
        let before_cursor = &app.query()[..app.cursor_pos.min(app.query().len())];
        let row = before_cursor.matches('\n').count() as u16;
        let col = before_cursor
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0) as u16;
        frame.set_cursor_position((inner.x + col, inner.y + row));
    }
}

const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER",
    "CROSS", "ON", "GROUP", "BY", "HAVING", "ORDER", "ASC", "DESC", "LIMIT", "OFFSET", "AS",
    "DISTINCT", "COUNT", "SUM", "AVG", "MIN", "MAX", "ROUND", "IFNULL", "NULL", "IS", "IN",
    "LIKE", "BETWEEN", "CASE", "WHEN", "THEN", "ELSE", "END", "UNION", "ALL", "INTERSECT",
    "EXCEPT", "EXISTS", "CREATE", "TABLE", "INDEX", "INSERT", "INTO", "VALUES", "UPDATE", "SET",
    "DELETE", "DROP", "ALTER", "ADD", "COLUMN", "PRIMARY", "KEY", "FOREIGN", "REFERENCES",
    "INTEGER", "TEXT", "REAL", "BEGIN", "COMMIT", "ROLLBACK", "WITH",
];

#[derive(Clone, Copy, PartialEq)]
enum Token {
    Word,
    Quoted(char),
    Other,
}

fn token_style(token: Token, text: &str) -> Style {
    match token {
        Token::Quoted(_) => Style::default().fg(Color::Green),
        Token::Word if KEYWORDS.contains(&text.to_uppercase().as_str()) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        Token::Word if text.chars().all(|c| c.is_ascii_digit() || c == '.') => {
            Style::default().fg(Color::Cyan)
        }
        Token::Word => Style::default(),
        Token::Other => match text {
            "(" | ")" | "," | ";" => Style::default().fg(Color::Yellow),
            "=" | "<" | ">" | "!" | "+" | "-" | "*" | "/" | "%" | "|" => {
                Style::default().fg(Color::Magenta)
            }
            _ => Style::default(),
        },
    }
}

/// One line of SQL split into styled spans. Strings may stay open to the end of the line.
fn highlight_sql_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut token = Token::Other;

    let flush = |spans: &mut Vec<Span<'static>>, current: &mut String, token: Token| {
        if !current.is_empty() {
            spans.push(Span::styled(current.clone(), token_style(token, current)));
            current.clear();
        }
    };

    for c in line.chars() {
        match token {
            Token::Quoted(q) => {
                current.push(c);
                if c == q {
                    flush(&mut spans, &mut current, token);
                    token = Token::Other;
                }
            }
            _ if c == '\'' || c == '"' => {
                flush(&mut spans, &mut current, token);
                current.push(c);
                token = Token::Quoted(c);
            }
            _ if c.is_alphanumeric() || c == '_' || (c == '.' && token == Token::Word) => {
                if token != Token::Word {
                    flush(&mut spans, &mut current, token);
                    token = Token::Word;
                }
                current.push(c);
            }
            _ => {
                flush(&mut spans, &mut current, token);
                current.push(c);
                token = Token::Other;
                flush(&mut spans, &mut current, token);
            }
        }
    }
    flush(&mut spans, &mut current, token);

    Line::from(spans)
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Ok => Style::default().fg(Color::Green),
        Severity::Error => Style::default().fg(Color::Red),
        Severity::Neutral => Style::default().fg(Color::DarkGray),
    }
}

fn annotation_line(annotation: &Annotation) -> Line<'static> {
    Line::from(Span::styled(
        annotation.text.to_plain().into_owned(),
        severity_style(annotation.severity),
    ))
}

fn model_lines(model: &RenderModel) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for block in &model.blocks {
        match block {
            render::Block::Message(annotation) => lines.push(annotation_line(annotation)),
            render::Block::Table(table) => {
                let mut table_lines = text::table_lines(table).into_iter();
                if let Some(header) = table_lines.next() {
                    lines.push(Line::from(Span::styled(
                        header,
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )));
                }
                lines.extend(table_lines.map(Line::from));
            }
        }
    }

    lines
}

/// The schema table drawn as name over columns, to fit a narrow panel.
fn schema_lines(model: &RenderModel) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for block in &model.blocks {
        match block {
            render::Block::Table(table) => {
                for row in &table.rows {
                    let (Some(name), Some(columns)) = (row.first(), row.get(1)) else {
                        continue;
                    };
                    lines.push(Line::from(Span::styled(
                        name.to_plain().into_owned(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(Span::styled(
                        format!("  ({})", columns.to_plain()),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
            render::Block::Message(annotation) => lines.push(annotation_line(annotation)),
        }
    }

    lines
}

fn draw_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Results ")
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == Focus::Results));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    if let Some(notice) = app.session.notice(Instant::now()) {
        lines.push(Line::from(Span::styled(
            notice.text.to_plain().into_owned(),
            severity_style(notice.severity).add_modifier(Modifier::BOLD),
        )));
    }
    lines.extend(model_lines(app.session.results()));

    if lines.is_empty() {
        let help = Paragraph::new("Pick a lesson, load its example with L, run with F5")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, inner);
        return;
    }

    let paragraph = Paragraph::new(lines)
        .scroll((app.result_scroll, app.result_horizontal_scroll));
    frame.render_widget(paragraph, inner);
}

fn draw_schema(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Schema (S: refresh) ")
        .borders(Borders::ALL)
        .border_style(border_style(false));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(schema_lines(app.session.schema())).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (mode_str, mode_color) = match app.mode {
        Mode::Normal => ("NORMAL", Color::Blue),
        Mode::Insert => ("INSERT", Color::Green),
        Mode::Command => ("COMMAND", Color::Yellow),
    };

    let focus_str = match app.focus {
        Focus::Lessons => "Lessons",
        Focus::Query => "Query",
        Focus::Results => "Results",
    };

    let help = match app.mode {
        Mode::Normal => "i:insert  Tab:focus  F5:run  L:load  R:reset  s:share  /:filter  q:quit",
        Mode::Insert => "Esc:normal  Enter:newline  F5/Ctrl+R:run  Ctrl+P/N:history",
        Mode::Command => "run reset schema share load lesson <id> filter <text> open <link> q",
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode_str),
            Style::default().fg(Color::Black).bg(mode_color),
        ),
        Span::raw(" "),
        Span::styled(format!("[{}]", focus_str), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
    ];
    match &app.status {
        Some(status) => spans.push(Span::styled(status.clone(), Style::default().fg(Color::White))),
        None => spans.push(Span::styled(help, Style::default().fg(Color::DarkGray))),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_command_line(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let popup_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, popup_area);

    let command_line = Paragraph::new(format!(":{}", app.command_buffer))
        .style(Style::default().fg(Color::White));
    frame.render_widget(command_line, popup_area);

    frame.set_cursor_position((1 + app.command_buffer.chars().count() as u16, popup_area.y));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_tokens() {
        let line = highlight_sql_line("SELECT e.name FROM t WHERE x = 'a b';");
        assert_eq!(
            span_texts(&line),
            vec!["SELECT", " ", "e.name", " ", "FROM", " ", "t", " ", "WHERE", " ", "x", " ", "=", " ", "'a b'", ";"]
        );
        assert_eq!(line.spans[0].style.fg, Some(Color::Blue));
        assert_eq!(line.spans[14].style.fg, Some(Color::Green));
    }

    #[test]
    fn test_highlight_unterminated_string() {
        let line = highlight_sql_line("SELECT 'abc");
        assert_eq!(span_texts(&line), vec!["SELECT", " ", "'abc"]);
    }

    #[test]
    fn test_model_lines_for_table() {
        let model = render::render(
            &[crate::engine::ResultSet::with_rows(
                vec!["n".to_string()],
                vec![vec![crate::engine::Value::Integer(5)]],
            )],
            None,
        );
        let lines = model_lines(&model);
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_schema_lines_stack_name_over_columns() {
        let model = render::render_schema(&[crate::engine::TableSummary {
            name: "t".to_string(),
            columns: vec![crate::engine::ColumnInfo {
                name: "id".to_string(),
                declared_type: "INTEGER".to_string(),
            }],
        }]);
        let lines = schema_lines(&model);
        assert_eq!(span_texts(&lines[0]), vec!["t"]);
        assert_eq!(span_texts(&lines[1]), vec!["  (id INTEGER)"]);
    }
}
