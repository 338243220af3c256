use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sqldojo")]
#[command(author, version, about = "An interactive SQL playground with built-in lessons")]
pub struct Cli {
    /// Execute a SQL query against a fresh database and print the result (non-interactive mode)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Run the current query text (from --lesson or --shared) and print the result
    #[arg(short, long)]
    pub run: bool,

    /// Output format for non-interactive mode
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Restore query text from a share link or bare locator
    #[arg(short, long, value_name = "LINK")]
    pub shared: Option<String>,

    /// Select a lesson and load its example into the editor
    #[arg(short, long, value_name = "ID")]
    pub lesson: Option<String>,

    /// Print the share link for the resulting query text and exit
    #[arg(long)]
    pub share: bool,

    /// Print the lesson catalog and exit
    #[arg(long)]
    pub list_lessons: bool,

    /// Print the schema summary and exit
    #[arg(long)]
    pub schema: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write logs to this file (the TUI never logs to the terminal)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
    Html,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// True when the process should print and exit instead of opening the TUI.
    pub fn is_batch(&self) -> bool {
        self.query.is_some() || self.run || self.share || self.list_lessons || self.schema
    }
}
