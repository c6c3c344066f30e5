//! zos-tui - A terminal UI for browsing mainframe resources
//!
//! This is the main entry point for the zos-tui application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::Result;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

fn main() -> Result<()> {
    // Keep the appender guard alive for the process lifetime
    let _log_guard = init_logging();

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Create app state
    let mut app = App::new();
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Route tracing output to a log file next to the config
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::EnvFilter;

    let log_path = Config::log_path()?;
    let directory = log_path.parent()?.to_path_buf();
    std::fs::create_dir_all(&directory).ok()?;
    let file_name = log_path.file_name()?.to_os_string();

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        // Check for pending external editor
        if let Some(file_path) = app.pending_editor_file.take() {
            launch_external_editor(tui, app, &file_path)?;
            continue; // Redraw after editor closes
        }

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                crossterm::event::Event::Key(key) => app.handle_key_event(key)?,
                crossterm::event::Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Process the action
            if let Some(action) = action {
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}

/// Launch an external editor for the given file
fn launch_external_editor(tui: &mut Tui, app: &mut App, file_path: &Path) -> Result<()> {
    // Determine the editor to use: $VISUAL, $EDITOR, or fallback
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vim".to_string());

    // Suspend the TUI
    tui.suspend()?;

    // Launch the editor
    let status = Command::new(&editor).arg(file_path).status();

    // Resume the TUI
    tui.resume()?;

    // Handle result
    match status {
        Ok(exit_status) => {
            if !exit_status.success() {
                app.error = Some(format!("Editor exited with status: {}", exit_status));
            }
        }
        Err(e) => {
            app.error = Some(format!("Failed to launch editor '{}': {}", editor, e));
        }
    }

    Ok(())
}
