pub mod app;
pub mod cli;
pub mod domain;
pub mod effect;
pub mod host;
pub mod preview;
pub mod ui;

#[cfg(test)]
mod test_support;

use std::{
    io::{self, Stdout},
    path::PathBuf,
};

use anyhow::Result;
use cli::Cli;
use crossterm::{
    event::DisableMouseCapture,
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use preview::{
    PreviewApp,
    events::{PreviewEvent, spawn_input_task, start_frame_task},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, cli).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_inner(terminal: &mut Terminal<CrosstermBackend<Stdout>>, cli: Cli) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<PreviewEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);

    let data_dir = data_dir(&cli);
    info!(dir = %data_dir.display(), "using data directory");
    let mut app = PreviewApp::new(&cli, data_dir, terminal::size()?)?;
    let capability = ui::theme::detect_color_capability();

    start_frame_task(tx.clone(), cli.fps);

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                match maybe_input {
                    Some(input) => app.handle_event(PreviewEvent::Input(input))?,
                    None => app.handle_event(PreviewEvent::Quit)?,
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event)?;
                }
            }
        }

        terminal.draw(|frame| ui::render(frame, &app, capability))?;
    }

    info!("preview closed");
    Ok(())
}

fn data_dir(cli: &Cli) -> PathBuf {
    cli.config_dir
        .clone()
        .or_else(app::settings::default_data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        existing(panic);
    }));
}
