//! AuthEase CLI - binary entry point and terminal session management.
//!
//! The CLI wires [`authease_engine`] (application state) to
//! [`authease_tui`] (rendering) and a Gemini-backed client, with RAII
//! terminal management that restores the terminal on every exit path.
//!
//! # Event Loop
//!
//! A fixed 8ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`authease_tui::InputPump`])
//! 3. Advance application state (`app.tick()`), applying finished model calls
//! 4. Render frame

use std::fs::{self, File, OpenOptions};
use std::io::{Stdout, Write, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use authease_config::{AuthEaseConfig, app_dir, config_path};
use authease_core::renders_dir;
use authease_engine::{App, AppOptions, Capabilities};
use authease_providers::{ApiConfig, GeminiClient};
use authease_tui::{InputPump, UiOptions, draw, handle_events};
use authease_types::ApiKey;

const FRAME_DURATION: Duration = Duration::from_millis(8);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: prefer no logs over writing into the TUI.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.authease/logs/authease.log
    if let Some(dir) = app_dir() {
        candidates.push(dir.join("logs").join("authease.log"));
    }

    // Fallback: ./.authease/logs/authease.log
    candidates.push(PathBuf::from(".authease").join("logs").join("authease.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode, bracketed paste and the alternate screen are all restored on
/// drop, so the terminal stays usable after panics and early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnableBracketedPaste, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, DisableBracketedPaste);
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

fn missing_key_message() -> String {
    let config_hint = config_path().map_or_else(
        || "~/.authease/config.toml".to_string(),
        |p| p.display().to_string(),
    );
    format!(
        "No Gemini API key found. Set {} (or {}), or add it to {config_hint} under [api_keys].google.",
        ApiKey::ENV_VARS[0],
        ApiKey::ENV_VARS[1],
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AuthEaseConfig::load()?.unwrap_or_default();
    let Some(api_key) = config.resolve_api_key() else {
        bail!(missing_key_message());
    };
    let (game_media, game_difficulty) = config
        .game_defaults()
        .context("invalid [game] settings")?;

    let api = ApiConfig::new(api_key, config.gemini_settings())
        .context("invalid [google] settings")?;
    let client = GeminiClient::new(api).context("failed to build HTTP client")?;

    let options = UiOptions {
        ascii_only: config.ascii_only(),
        high_contrast: config.high_contrast(),
    };
    let mut app = App::new(
        client,
        AppOptions {
            game_media,
            game_difficulty,
            renders_dir: renders_dir(),
        },
    );

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app, options).await
    };

    if let Err(err) = &result {
        tracing::error!(error = %err, "Exiting on error");
    }
    result
}

async fn run_app<B, C>(terminal: &mut Terminal<B>, app: &mut App<C>, options: UiOptions) -> Result<()>
where
    B: Backend + Write,
    B::Error: Send + Sync + 'static,
    C: Capabilities,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        match handle_events(app, &mut input) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        app.tick();

        if let Err(e) = terminal.draw(|frame| draw(frame, app, options)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
