use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tracing::{debug, info, warn};

mod app;
mod cli;
mod config;
mod error;
mod hierarchy;
mod launcher;
mod logging;
mod model;
mod models;
mod store;
mod ui;

use app::App;
use cli::Cli;
use config::ConfigManager;
use model::Model;
use store::Store;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Nothing before the terminal setup is fatal; problems are collected
    // and shown once the UI (or the CLI command) runs.
    let mut warnings: Vec<String> = Vec::new();

    let config_manager = ConfigManager::new(cli.config.clone()).unwrap_or_else(|e| {
        warnings.push(format!("{:#}", e));
        ConfigManager::temporary()
    });
    let (config, config_warning) = config_manager.load_or_default();
    if let Some(e) = config_warning {
        warnings.push(format!("{:#}, using defaults", e));
    }

    match logging::init(&config_manager.logs_dir(), config.log_retention) {
        Ok(log_file) => debug!("Logging to {:?}", log_file),
        Err(e) => warnings.push(format!("Logging disabled: {:#}", e)),
    }
    for w in &warnings {
        warn!("{}", w);
    }

    let data_file = cli
        .data
        .clone()
        .unwrap_or_else(|| config_manager.data_file(&config));
    info!("Commands file: {:?}", data_file);

    let mut settings = config.launch_settings();
    if let Some(terminal) = cli.terminal {
        settings.terminal = Some(terminal);
    }

    let (mut model, model_warning) = Model::open(Store::new(data_file));
    if let Some(e) = model_warning {
        warnings.push(e.to_string());
    }

    match cli.command {
        Some(command) => {
            for w in &warnings {
                eprintln!("Warning: {}", w);
            }
            cli::run(command, &mut model, &settings)
        }
        None => run_tui(App::new(model, settings, warnings)),
    }
}

fn run_tui(app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("Terminal UI failed")
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw::<B>(f, &mut app))?;

        app.tick();

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            info!("Quit requested");
            return Ok(());
        }
    }
}
