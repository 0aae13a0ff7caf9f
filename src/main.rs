mod api;
mod app;
mod cli;
mod comment_tree;
mod event;
mod feed;
mod help;
mod keys;
mod logging;
mod settings;
mod story_card;
mod theme;
mod time;
mod tui;
mod views;
mod widgets;

#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use api::{DEFAULT_API_BASE, HnClient};
use app::{App, Message};
use cli::Cli;
use event::Event;
use settings::Settings;
use theme::{ResolvedTheme, ThemeVariant, by_name, default_for_variant, detect_terminal_theme};
use tui::EventHandler;

/// Redraw cadence while idle; keeps the loading spinner animated.
const TICK_MS: u64 = 80;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = settings::config_dir(cli.config_dir.as_ref());
    let _log_guard = logging::init(config_dir.as_deref(), cli.verbose)?;

    let settings = config_dir
        .as_ref()
        .map(|dir| {
            let path = settings::settings_path(dir);
            Settings::load(&path).unwrap_or_else(|e| {
                eprintln!("Warning: {e:#}");
                warn!("ignoring settings: {e:#}");
                Settings::default()
            })
        })
        .unwrap_or_default();

    let theme = resolve_theme(&cli, &settings)?;
    let api_base = resolve_api_base(&cli, &settings);
    info!(theme = %theme.name, %api_base, "starting");

    let client = HnClient::new(api_base).context("Failed to build HTTP client")?;
    run_tui(App::new(theme, client)).await
}

fn resolve_theme(cli: &Cli, settings: &Settings) -> Result<ResolvedTheme> {
    // Priority: CLI --theme > settings file > --dark/--light > detection
    if let Some(name) = cli.theme.as_ref().or(settings.theme.as_ref()) {
        return by_name(name).with_context(|| {
            format!("Theme '{name}' not found. Available themes: dark, light")
        });
    }

    let variant = if cli.dark {
        ThemeVariant::Dark
    } else if cli.light {
        ThemeVariant::Light
    } else {
        detect_terminal_theme()
    };
    Ok(default_for_variant(variant))
}

fn resolve_api_base(cli: &Cli, settings: &Settings) -> String {
    cli.api_base
        .clone()
        .or_else(|| settings.api_base.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

async fn run_tui(mut app: App) -> Result<()> {
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(TICK_MS);

    let size = terminal.size()?;
    app.update(Message::Resize(size.width, size.height));
    app.start();

    let result = loop {
        if let Err(e) = terminal.draw(|frame| views::render(&app, frame)) {
            break Err(e.into());
        }

        // Poll async results (non-blocking)
        while let Ok(result) = app.result_rx.try_recv() {
            app.handle_async_result(result);
        }

        if app.should_quit {
            break Ok(());
        }

        match events.next().await {
            Ok(Event::Key(key)) => {
                if let Some(msg) = keys::handle_key(key, &app) {
                    app.update(msg);
                }
            }
            Ok(Event::Scroll(notches)) => app.update(Message::Scroll(notches)),
            Ok(Event::Resize(width, height)) => app.update(Message::Resize(width, height)),
            Ok(Event::Tick) => {}
            Err(e) => break Err(e),
        }
    };

    tui::restore()?;
    info!("exiting");
    result
}
