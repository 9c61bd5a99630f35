mod cli;
mod config;
mod events;
mod headless;
mod logging;
#[cfg(test)]
mod test_utils;
mod ui;
mod worker;

use crate::cli::{Args, Command};
use crate::config::{load_config, Config};
use crate::events::UiEvent;
use crate::headless::{print_history, read_input, run_scan, ScanOptions};
use crate::logging::init_tracing;
use crate::ui::{
    draw_ui, handle_key_event, restore_terminal, setup_terminal, AboutInfo, AppState, KeyOutcome,
};
use crate::worker::spawn_scan;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use scan_service::{Analyzer, GeminiClient, HistoryStore, ScanError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Tui);

    // The dashboard owns the terminal, so stderr logging is for the other commands only.
    let stderr_logs = args.log_to_stderr && !matches!(command, Command::Tui);
    let _file_guard = init_tracing(&args.log_dir, stderr_logs)?;

    let config = load_config(&args.config)?;
    let mut history = HistoryStore::open(&config.history.path);

    match command {
        Command::Tui => {
            let analyzer = build_analyzer(&config)?.map(Arc::new);
            run_dashboard(&config, analyzer, history).await
        }
        Command::Scan {
            kind,
            file,
            json,
            no_history,
        } => {
            let analyzer = build_analyzer(&config)?;
            let raw_text = read_input(file.as_deref()).await?;
            let options = ScanOptions {
                kind,
                json,
                save_history: !no_history,
            };
            let mut stdout = std::io::stdout().lock();
            run_scan(
                analyzer.as_ref(),
                &mut history,
                options,
                raw_text,
                &mut stdout,
            )
            .await
        }
        Command::History { limit, json } => {
            let mut stdout = std::io::stdout().lock();
            print_history(&history, limit, json, &mut stdout)
        }
    }
}

/// `None` when no API key is configured; scans then fail with a clear error
/// instead of the dashboard refusing to start.
fn build_analyzer(config: &Config) -> anyhow::Result<Option<Analyzer>> {
    match GeminiClient::new(&config.model) {
        Ok(client) => Ok(Some(Analyzer::new(
            Arc::new(client),
            config.model.clone(),
            config.phishing.clone(),
        ))),
        Err(ScanError::MissingApiKey) => {
            tracing::warn!("no api key configured, scans will fail until one is set");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

async fn run_dashboard(
    config: &Config,
    analyzer: Option<Arc<Analyzer>>,
    history: HistoryStore,
) -> anyhow::Result<()> {
    let about = AboutInfo {
        phishing_model: config.model.phishing_model.clone(),
        logs_model: config.model.logs_model.clone(),
        history_path: history.path().display().to_string(),
        api_key_configured: analyzer.is_some(),
    };
    let mut app = AppState::new(history, about);
    let (ui_tx, mut ui_rx) = mpsc::channel::<UiEvent>(16);

    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(100);
    let result = loop {
        while let Ok(event) = ui_rx.try_recv() {
            app.handle_event(event);
        }
        app.tick();

        if let Err(err) = terminal.draw(|frame| draw_ui(frame, &mut app)) {
            break Err(err.into());
        }

        match next_input(tick_rate) {
            Ok(Some(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                match handle_key_event(key, &mut app) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Quit => break Ok(()),
                    KeyOutcome::StartScan(request) => {
                        spawn_scan(analyzer.clone(), request, ui_tx.clone());
                    }
                }
            }
            Ok(Some(Event::Paste(text))) => app.paste(&text),
            Ok(_) => {}
            Err(err) => break Err(err),
        }
    };

    restore_terminal(&mut terminal)?;
    result
}

fn next_input(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
