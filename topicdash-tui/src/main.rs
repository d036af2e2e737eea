//! topicdash TUI entry point: load config and data, then run the event loop.

use std::collections::BTreeSet;
use std::io::{self, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use topicdash_core::Dataset;
use topicdash_panels::{DashboardConfig, DashboardShell, TableOptions};
use topicdash_tui::{input, logging, sample_data, ui, AppState, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_path())?;

    // Load everything before touching the terminal so errors print normally.
    let (dataset, options) = load(&args)?;
    let tissues = tissue_order(&dataset);
    let shell = DashboardShell::from_dataset(&dataset, &options)
        .context("building dashboard panels")?;
    let mut app = AppState::new(shell, tissues);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("dashboard closed");
    result
}

fn load(args: &Args) -> Result<(Dataset, TableOptions)> {
    if args.demo {
        let config = args.apply(DashboardConfig::default());
        let dataset = sample_data::sample_dataset().context("building demo dataset")?;
        info!("running on the built-in demo dataset");
        return Ok((dataset, config.table));
    }

    let config = DashboardConfig::discover(args.config.as_deref()).context("loading config")?;
    let config = args.apply(config);
    config.validate().context("invalid configuration")?;
    let paths = config.dataset_paths()?;
    let dataset = Dataset::load(&paths).context("loading dataset")?;
    Ok((dataset, config.table))
}

/// Every tissue seen in the timecourse or the expression matrix, sorted.
fn tissue_order(dataset: &Dataset) -> Vec<String> {
    let mut tissues: BTreeSet<String> = dataset.timecourse.tissues().iter().cloned().collect();
    tissues.extend(dataset.expression.tissues().into_iter().map(String::from));
    tissues.into_iter().collect()
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
