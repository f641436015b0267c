//! Input handling for the AuthEase TUI.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use authease_engine::{App, Capabilities, GamePhase, View};
use authease_types::{Choice, Difficulty};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the UI loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = Arc::clone(&stop);

        let join = tokio::task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a backpressured send in the input thread unblocks.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop; never block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Apply queued terminal events. Returns whether the app should exit.
pub fn handle_events<C: Capabilities>(app: &mut App<C>, input: &mut InputPump) -> Result<bool> {
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        apply_event(app, ev);
        if app.exit_requested() {
            break;
        }
    }
    Ok(app.exit_requested())
}

pub fn apply_event<C: Capabilities>(app: &mut App<C>, event: Event) {
    match event {
        Event::Key(key) => {
            if matches!(key.kind, KeyEventKind::Release) {
                return;
            }
            apply_key(app, key);
        }
        Event::Paste(text) => {
            if app.view() == View::Analysis {
                app.analysis_input_mut().enter_str(&text);
            }
        }
        _ => {}
    }
}

fn apply_key<C: Capabilities>(app: &mut App<C>, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => {
            app.request_exit();
            return;
        }
        KeyCode::F(1) => {
            app.set_view(View::Analysis);
            return;
        }
        KeyCode::F(2) => {
            app.set_view(View::Game);
            return;
        }
        KeyCode::Esc if app.dismiss_notice() => return,
        _ => {}
    }

    match app.view() {
        View::Analysis => handle_analysis_key(app, key, ctrl),
        View::Game => handle_game_key(app, key),
    }
}

fn handle_analysis_key<C: Capabilities>(app: &mut App<C>, key: KeyEvent, ctrl: bool) {
    match key.code {
        KeyCode::Up => app.cycle_analysis_media(false),
        KeyCode::Down => app.cycle_analysis_media(true),
        KeyCode::Enter => {
            let _ = app.submit_analysis();
        }
        KeyCode::Char('u') if ctrl => app.analysis_input_mut().clear(),
        KeyCode::Char('w') if ctrl => app.analysis_input_mut().delete_word_backwards(),
        KeyCode::Char(c) if !ctrl => app.analysis_input_mut().enter_char(c),
        KeyCode::Backspace => app.analysis_input_mut().delete_char(),
        KeyCode::Delete => app.analysis_input_mut().delete_char_forward(),
        KeyCode::Left => app.analysis_input_mut().move_cursor_left(),
        KeyCode::Right => app.analysis_input_mut().move_cursor_right(),
        KeyCode::Home => app.analysis_input_mut().move_cursor_home(),
        KeyCode::End => app.analysis_input_mut().move_cursor_end(),
        _ => {}
    }
}

fn handle_game_key<C: Capabilities>(app: &mut App<C>, key: KeyEvent) {
    match app.game().phase() {
        GamePhase::Start => match key.code {
            KeyCode::Enter => {
                app.game_begin();
            }
            KeyCode::Left => {
                app.cycle_game_media(false);
            }
            KeyCode::Right => {
                app.cycle_game_media(true);
            }
            _ => {}
        },
        GamePhase::DifficultySelect => match key.code {
            KeyCode::Left => {
                app.cycle_game_media(false);
            }
            KeyCode::Right => {
                app.cycle_game_media(true);
            }
            KeyCode::Char(c) => {
                if let Some(difficulty) = c
                    .to_digit(10)
                    .and_then(|slot| Difficulty::from_slot(slot as usize))
                {
                    app.pick_difficulty(difficulty);
                }
            }
            _ => {}
        },
        GamePhase::Loading { .. } => {
            if key.code == KeyCode::Esc {
                app.abandon_round();
            }
        }
        GamePhase::Presenting(_) => match key.code {
            KeyCode::Char('a' | 'A') => {
                app.choose(Choice::A);
            }
            KeyCode::Char('b' | 'B') => {
                app.choose(Choice::B);
            }
            _ => {}
        },
        GamePhase::Feedback(_) => match key.code {
            KeyCode::Char('n' | 'N') | KeyCode::Enter => {
                app.next_round();
            }
            KeyCode::Char('m' | 'M') => {
                app.main_menu();
            }
            _ => {}
        },
    }
}
