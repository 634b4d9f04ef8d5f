mod action;
mod app;
mod browse;
mod comments;
mod config;
mod error;
mod event;
mod fetch;
mod http;
mod link;
mod logging;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::fetch::Fetcher;
use crate::http::HttpTransport;
use crate::tui::EventHandler;

/// Browse the issues of a GitHub repository from the terminal.
#[derive(Debug, Parser)]
#[command(name = "issuescope", version, about)]
struct Cli {
    /// Repository to open right away, as owner/repo
    repo: Option<String>,

    /// API base URL (e.g. a GitHub Enterprise endpoint)
    #[arg(long)]
    api_base: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    tracing::info!(api_base = %config.api_base, "starting");

    let transport = HttpTransport::new(config.token(), config.timeout())?;
    let fetcher = Fetcher::new(Arc::new(transport), &config.api_base);

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(fetcher, config, cli.repo).await;

    tui::restore()?;

    result
}

async fn run(
    fetcher: Fetcher,
    config: Config,
    repo: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let submit_on_start = repo.is_some();
    let search = repo.unwrap_or_else(|| "facebook/react".to_string());
    let mut app = App::new(fetcher, &config, search, submit_on_start, action_tx.clone());

    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render | Event::Resize => {
                        terminal.draw(|frame| {
                            let max = ui::modal_scroll_limit(&app, frame.area());
                            app.fit_scroll(max);
                            ui::render(frame, &app);
                        })?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
