use std::fs::File;
use std::io::stdout;
use std::sync::Mutex;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sqldojo::cli::{Cli, OutputFormat};
use sqldojo::render::{html, text, RenderModel};
use sqldojo::tui::{app::App, input::handle_events, ui::draw};
use sqldojo::{AppConfig, Session, SessionOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load_default()?,
    };

    init_logging(&cli, &config)?;

    let mut options = SessionOptions::from(&config);
    options.shared = cli.shared.clone();

    let mut session = Session::bootstrap(options).await?;

    if cli.list_lessons {
        print_lessons(&session);
        session.close();
        return Ok(());
    }

    if let Some(id) = &cli.lesson {
        session
            .select_lesson(id)
            .ok_or_else(|| format!("Unknown lesson: {}", id))?;
        session.load_example();
    }

    if let Some(query) = &cli.query {
        session.set_query(query.as_str());
    }

    if cli.schema {
        let schema = session.show_schema().clone();
        print_model(&schema, cli.format)?;
    }

    if cli.share {
        let share = session.share(config.notice_ttl());
        println!("{}", share.address);
    }

    if cli.query.is_some() || cli.run {
        let results = session.run().clone();
        print_model(&results, cli.format)?;
    }

    if cli.is_batch() {
        session.close();
        return Ok(());
    }

    let mut app = App::new(session, config.notice_ttl());
    let outcome = run_tui(&mut app);
    app.session.close();
    outcome
}

/// Batch mode logs to stderr. The TUI owns the terminal, so it only logs
/// when a log file is given.
fn init_logging(cli: &Cli, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("sqldojo=debug")
        } else {
            EnvFilter::new(format!("sqldojo={}", config.log_level))
        }
    });

    if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else if cli.is_batch() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }

    Ok(())
}

fn print_lessons(session: &Session) {
    for group in session.catalog().groups() {
        println!("{}", group.title);
        for lesson in group.lessons {
            println!("  {:<18} {}", lesson.id, lesson.title);
        }
    }
}

fn print_model(model: &RenderModel, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => println!("{}", text::to_table(model)),
        OutputFormat::Csv => print!("{}", text::to_csv(model)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(model)?),
        OutputFormat::Html => println!("{}", html::to_html(model)),
    }
    Ok(())
}

fn run_tui(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("terminal ui started");

    // Main loop
    let outcome = loop {
        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e);
        }

        match handle_events(app) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(outcome?)
}
