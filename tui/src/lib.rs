//! TUI rendering for AuthEase using ratatui.

mod analysis_view;
mod game_view;
mod input;
mod theme;

pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, UiOptions, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};

use authease_engine::{App, Capabilities, GamePhase, View};
use authease_types::sanitize_terminal_text;

/// Main draw function
pub fn draw<C: Capabilities>(frame: &mut Frame, app: &App<C>, options: UiOptions) {
    let palette = palette(options);
    let glyphs = glyphs(options);
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette, &glyphs);
    match app.view() {
        View::Analysis => {
            analysis_view::draw(frame, app, chunks[1], &palette, &glyphs, options);
        }
        View::Game => game_view::draw(frame, app, chunks[1], &palette, &glyphs, options),
    }
    draw_key_hints(frame, app, chunks[2], &palette);

    if let Some(notice) = app.notice() {
        draw_notice(frame, notice, &palette);
    }
}

fn draw_header<C: Capabilities>(
    frame: &mut Frame,
    app: &App<C>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let tab = |label: &'static str, view: View| {
        if app.view() == view {
            Span::styled(label, styles::tab_active(palette))
        } else {
            Span::styled(label, styles::tab_inactive(palette))
        }
    };

    let line = Line::from(vec![
        Span::styled(" AuthEase ", styles::title(palette)),
        Span::styled(format!("{} ", glyphs.separator), styles::border(palette)),
        tab(" F1 Analysis ", View::Analysis),
        Span::raw(" "),
        tab(" F2 Spot the AI ", View::Game),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_key_hints<C: Capabilities>(frame: &mut Frame, app: &App<C>, area: Rect, palette: &Palette) {
    let mut hints: Vec<(&str, &str)> = match app.view() {
        View::Analysis => vec![
            ("↑/↓", "media"),
            ("Enter", "analyze"),
            ("Ctrl+U", "clear"),
        ],
        View::Game => match app.game().phase() {
            GamePhase::Start => vec![("Enter", "start"), ("←/→", "media")],
            GamePhase::DifficultySelect => vec![("1-4", "difficulty"), ("←/→", "media")],
            GamePhase::Loading { .. } => vec![("Esc", "abandon")],
            GamePhase::Presenting(_) => vec![("A/B", "pick the AI")],
            GamePhase::Feedback(_) => vec![("N", "next round"), ("M", "main menu")],
        },
    };
    if app.notice().is_some() {
        hints.insert(0, ("Esc", "dismiss"));
    }
    hints.push(("Ctrl+C", "quit"));

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in hints {
        spans.push(Span::styled(key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}  "), styles::key_hint(palette)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_notice(frame: &mut Frame, notice: &str, palette: &Palette) {
    let area = frame.area();
    let width = 64.min(area.width.saturating_sub(4));
    let height = 10.min(area.height.saturating_sub(2));
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width,
        height,
    };

    frame.render_widget(Clear, popup);

    let lines: Vec<Line> = notice
        .lines()
        .map(|line| Line::from(sanitize_terminal_text(line).into_owned()))
        .collect();
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(palette.text_primary))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.red))
                .style(Style::default().bg(palette.bg_popup))
                .padding(Padding::horizontal(1))
                .title(Line::from(Span::styled(
                    " Notice ",
                    Style::default()
                        .fg(palette.text_primary)
                        .add_modifier(Modifier::BOLD),
                )))
                .title_bottom(Line::from(Span::styled(
                    " Esc to dismiss ",
                    styles::key_hint(palette),
                ))),
        );
    frame.render_widget(body, popup);
}

/// Sanitize model-originated text into an owned span.
fn model_text(raw: &str) -> String {
    sanitize_terminal_text(raw).into_owned()
}

fn panel<'a>(title: impl Into<Line<'a>>, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1))
        .title(title)
}
