//! Terminal dashboard for basura: district waste levels, statistics, and predictions.

mod app;
mod config;
mod input;
mod logging;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use basura_core::{Classifier, plugin::SourceRegistry, service::BasuraService};
use basura_provider_remote as remote;
use basura_provider_sample as sample;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing::{info, warn};

use crate::app::{App, parse_volume};
use crate::config::Cli;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_file)?;

    info!(
        api_url = %cli.api_url,
        low_frequency = ?cli.low_frequency,
        top = cli.top,
        "Starting basura"
    );

    // HTTP + service setup
    let client = Client::builder()
        .user_agent("basura/0.1")
        .timeout(StdDuration::from_secs(cli.timeout_secs))
        .build()?;

    let plugins = vec![remote::plugin(client, &cli.api_url), sample::plugin()];
    let registry = Arc::new(SourceRegistry::new(plugins));
    let service = Arc::new(BasuraService::new(
        registry,
        Classifier::new(cli.policy()),
    ));

    // App state
    let app = App::new(service, cli.top);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Shutting down");
    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::LoadDashboard => {
                    let Some(source) = app.selected_source.clone() else {
                        app.error_message = Some("Select a data source first".into());
                        continue;
                    };

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.service.dashboard(&source, app.top).await;

                    app.is_loading = false;
                    match res {
                        Ok(snapshot) => {
                            if app.district_list_index >= snapshot.results.len() {
                                app.district_list_index = 0;
                            }
                            app.snapshot = Some(snapshot);
                        }
                        Err(err) => {
                            warn!(source = %source, error = %err, "Dashboard refresh failed");
                            app.snapshot = None;
                            app.error_message = Some(format!(
                                "Failed to load analytics: {err} (try the sample source)"
                            ));
                        }
                    }
                }
                Action::SubmitPrediction => {
                    let Some(source) = app.selected_source.clone() else {
                        app.error_message = Some("Select a data source first".into());
                        continue;
                    };

                    let Some(volume) = parse_volume(&app.volume_input) else {
                        app.error_message = Some("Enter the waste volume as a number".into());
                        continue;
                    };

                    app.is_loading = true;
                    app.error_message = None;
                    app.report = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app
                        .service
                        .predict(&source, &app.district_input, volume, app.period)
                        .await;

                    app.is_loading = false;
                    match res {
                        Ok(report) => {
                            app.report = Some(report);
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Prediction failed: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
