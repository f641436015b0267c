//! "Spot the AI" screens and HUD.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
};

use authease_engine::{App, Capabilities, GamePhase, GameSession, LiveRound, ScoredRound};
use authease_types::{ChallengeOption, Choice, Difficulty, OptionContent, XP_PER_LEVEL};

use crate::theme::{Glyphs, Palette, UiOptions, spinner_frame, styles};
use crate::{model_text, panel};

pub(crate) fn draw<C: Capabilities>(
    frame: &mut Frame,
    app: &App<C>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    options: UiOptions,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // HUD
            Constraint::Min(1),    // Phase body
        ])
        .split(area);

    let game = app.game();
    draw_hud(frame, game, chunks[0], palette, glyphs);

    match game.phase() {
        GamePhase::Start => draw_start(frame, game, chunks[1], palette, glyphs),
        GamePhase::DifficultySelect => draw_settings(frame, game, chunks[1], palette, glyphs),
        GamePhase::Loading { .. } => {
            let spinner = spinner_frame(app.spinner_tick(), options);
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(
                        "{spinner} Synthesizing {} scenario ({})...",
                        game.media().label(),
                        game.difficulty().label()
                    ),
                    Style::default().fg(palette.primary),
                )),
                Line::from(""),
                Line::from(Span::styled("Esc to abandon", styles::key_hint(palette))),
            ];
            frame.render_widget(
                Paragraph::new(lines).block(panel(" Loading ", palette)),
                chunks[1],
            );
        }
        GamePhase::Presenting(live) => draw_round(frame, live, None, chunks[1], palette, glyphs),
        GamePhase::Feedback(scored) => {
            draw_round(frame, &scored.round, Some(scored.as_ref()), chunks[1], palette, glyphs);
        }
    }
}

fn draw_hud(frame: &mut Frame, game: &GameSession, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let stats = game.stats();
    let rows = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(30)])
        .split(area);

    let sep = Span::styled(format!("  {}  ", glyphs.separator), styles::border(palette));
    let line = Line::from(vec![
        Span::styled(format!(" LVL {}", stats.level()), styles::title(palette)),
        sep.clone(),
        Span::styled(
            format!("ACC {}%", stats.accuracy()),
            Style::default().fg(palette.text_primary),
        ),
        sep.clone(),
        Span::styled(
            format!("STREAK {}", stats.streak()),
            Style::default().fg(palette.peach),
        ),
        sep,
        Span::styled(
            format!("{} {}", game.difficulty().label(), game.media().label()),
            Style::default().fg(palette.text_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), rows[0]);

    let into_level = stats.xp_into_level();
    let xp = Gauge::default()
        .gauge_style(Style::default().fg(palette.primary).bg(palette.bg_highlight))
        .ratio(into_level as f64 / XP_PER_LEVEL as f64)
        .label(format!("XP {into_level}/{XP_PER_LEVEL}"));
    let gauge_area = Rect {
        height: 1,
        ..rows[1]
    };
    frame.render_widget(xp, gauge_area);
}

fn media_picker(game: &GameSession, palette: &Palette, glyphs: &Glyphs) -> Line<'static> {
    Line::from(vec![
        Span::styled("Media: ", styles::key_hint(palette)),
        Span::styled(format!("{} ", glyphs.arrow_left), styles::key_highlight(palette)),
        Span::styled(
            game.media().label(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", glyphs.arrow_right), styles::key_highlight(palette)),
    ])
}

fn draw_start(frame: &mut Frame, game: &GameSession, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let stats = game.stats();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("SPOT THE AI", styles::title(palette))),
        Line::from(""),
        Line::from(Span::styled(
            "Two pieces of content. One of them was made by a machine. Find it.",
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(""),
        media_picker(game, palette, glyphs),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", styles::key_highlight(palette)),
            Span::styled(" to start", styles::key_hint(palette)),
        ]),
    ];
    if stats.total_rounds() > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "{} rounds played, {} correct, {} XP",
                stats.total_rounds(),
                stats.correct_rounds(),
                stats.xp()
            ),
            styles::key_hint(palette),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(panel(" Game ", palette)),
        area,
    );
}

fn draw_settings(
    frame: &mut Frame,
    game: &GameSession,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let mut lines = vec![
        Line::from(""),
        media_picker(game, palette, glyphs),
        Line::from(""),
        Line::from(Span::styled("Choose a difficulty", styles::title(palette))),
        Line::from(""),
    ];
    for (slot, difficulty) in Difficulty::all().iter().enumerate() {
        let marker = if *difficulty == game.difficulty() {
            glyphs.selected
        } else {
            " "
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), Style::default().fg(palette.accent)),
            Span::styled(format!("{} ", slot + 1), styles::key_highlight(palette)),
            Span::styled(
                format!("{:<13}", difficulty.label()),
                Style::default().fg(palette.text_primary),
            ),
            Span::styled(difficulty.guideline(), styles::key_hint(palette)),
        ]));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(panel(" Settings ", palette)),
        area,
    );
}

fn draw_round(
    frame: &mut Frame,
    live: &LiveRound,
    scored: Option<&ScoredRound>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Narrative or result
            Constraint::Min(1),    // Options
        ])
        .split(area);

    let header = match scored {
        None => Line::from(vec![
            Span::styled(
                model_text(live.challenge.narrative()),
                Style::default().fg(palette.text_primary),
            ),
            Span::styled("  Which one is AI? ", styles::key_hint(palette)),
        ]),
        Some(scored) if scored.outcome.is_correct => Line::from(Span::styled(
            format!(
                "{} Correct! +{} XP (streak {})",
                glyphs.correct,
                scored.outcome.xp_gained,
                scored.outcome.stats.streak()
            ),
            Style::default()
                .fg(palette.green)
                .add_modifier(Modifier::BOLD),
        )),
        Some(_) => Line::from(Span::styled(
            format!("{} Not quite. Streak reset.", glyphs.incorrect),
            Style::default().fg(palette.red).add_modifier(Modifier::BOLD),
        )),
    };
    frame.render_widget(
        Paragraph::new(header)
            .wrap(Wrap { trim: true })
            .block(panel(" Round ", palette)),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    for ((choice, option), column) in live.challenge.options().into_iter().zip(columns.iter()) {
        let picked = scored.is_some_and(|s| s.choice == choice);
        let lines = option_lines(live, choice, option, scored.is_some(), palette, glyphs);
        let title = if picked {
            format!(" {} Option {choice} (your pick) ", glyphs.selected)
        } else {
            format!(" Option {choice} ")
        };
        let mut block = panel(title, palette);
        if picked {
            block = block.border_style(Style::default().fg(palette.accent));
        }
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
            *column,
        );
    }
}

fn option_lines(
    live: &LiveRound,
    choice: Choice,
    option: &ChallengeOption,
    reveal: bool,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if reveal {
        let (label, color) = if option.is_ai() {
            (glyphs.ai, palette.red)
        } else {
            (glyphs.human, palette.green)
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    match option.content() {
        OptionContent::Text(text) => {
            for line in text.lines() {
                lines.push(Line::from(Span::styled(
                    model_text(line),
                    Style::default().fg(palette.text_primary),
                )));
            }
        }
        OptionContent::Image(image) => {
            let size = format!("{} ({} KB)", image.mime_type, image.approx_bytes() / 1024);
            lines.push(Line::from(Span::styled(
                model_text(&size),
                styles::key_hint(palette),
            )));
            let saved = match live.renders.get(choice) {
                Some(path) => format!("Saved to {}", path.display()),
                None => "Image not saved".to_string(),
            };
            lines.push(Line::from(Span::styled(
                model_text(&saved),
                Style::default().fg(palette.text_primary),
            )));
        }
    }

    if reveal {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            model_text(option.explanation()),
            Style::default()
                .fg(palette.text_secondary)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}
