use anyhow::Result;
use assignments::board::AssignmentBoard;
use assignments::cli::{self, Cli, Commands};
use assignments::config::Config;
use assignments::ui;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if std::env::var("ASSIGNMENTS_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("assignments=debug")
            .with_writer(io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Some(Commands::Add(args)) => cli::add(&config, args),
        Some(Commands::List(args)) => cli::list(&config, args),
        Some(Commands::Remove { name }) => cli::remove(&config, &name),
        Some(Commands::Show { name, style }) => cli::show(&config, &name, style),
        Some(Commands::Say { message }) => cli::say(&config, &message),
        Some(Commands::Board) | None => run_board(&config),
    }
}

fn run_board(config: &Config) -> Result<()> {
    let service = config.service();
    let mut board = AssignmentBoard::new(service, config.author(), config.prefix.clone());
    board.reload()?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut board);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}
