//! Analysis dashboard: media tabs, input line, and the score report.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
};
use serde_json::{Map, Value};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use authease_engine::{AnalysisState, App, Capabilities};
use authease_types::{MediaType, ScoreReport, to_percent};

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
            Constraint::Length(2), // Media tabs
            Constraint::Length(3), // Input
            Constraint::Min(1),    // Result
        ])
        .split(area);

    draw_media_tabs(frame, app.analysis().media(), chunks[0], palette, glyphs);
    draw_input(frame, app, chunks[1], palette);

    match app.analysis().state() {
        AnalysisState::Idle => {
            let hint = if app.analysis().media().takes_typed_input() {
                "Type or paste content, then press Enter to analyze."
            } else {
                "Enter a file path, then press Enter to run a forensic analysis."
            };
            let body = Paragraph::new(Line::from(Span::styled(hint, styles::key_hint(palette))))
                .block(panel(" Report ", palette));
            frame.render_widget(body, chunks[2]);
        }
        AnalysisState::Analyzing { .. } => {
            let spinner = spinner_frame(app.spinner_tick(), options);
            let body = Paragraph::new(Line::from(Span::styled(
                format!("{spinner} Analyzing {}...", app.analysis().media().label()),
                Style::default().fg(palette.primary),
            )))
            .block(panel(" Report ", palette));
            frame.render_widget(body, chunks[2]);
        }
        AnalysisState::Done(report) => draw_report(frame, report, chunks[2], palette, glyphs),
    }
}

fn draw_media_tabs(
    frame: &mut Frame,
    selected: MediaType,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let mut spans = vec![Span::raw(" ")];
    for media in MediaType::all() {
        if *media == selected {
            spans.push(Span::styled(
                format!("{} {} ", glyphs.selected, media.label()),
                styles::tab_active(palette),
            ));
        } else {
            spans.push(Span::styled(
                format!("  {} ", media.label()),
                styles::tab_inactive(palette),
            ));
        }
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_input<C: Capabilities>(frame: &mut Frame, app: &App<C>, area: Rect, palette: &Palette) {
    let flow = app.analysis();
    let title = match flow.media() {
        MediaType::Text => " Text to analyze ",
        MediaType::Url => " URL to analyze ",
        MediaType::Image => " Image file path ",
        MediaType::Audio => " Audio file path ",
        MediaType::Video => " Video file path ",
    };
    let border = if flow.is_analyzing() {
        palette.text_muted
    } else {
        palette.accent
    };

    let draft = flow.input();
    let inner_width = area.width.saturating_sub(4).max(1) as usize;
    let before_cursor: String = draft.text().graphemes(true).take(draft.cursor()).collect();
    let cursor_col = before_cursor.width();
    let scroll = cursor_col.saturating_sub(inner_width.saturating_sub(1));

    let input = Paragraph::new(draft.text().to_string())
        .style(Style::default().fg(palette.text_primary))
        .scroll((0, scroll as u16))
        .block(panel(title, palette).border_style(Style::default().fg(border)));
    frame.render_widget(input, area);

    if !flow.is_analyzing() && app.notice().is_none() {
        let x = area.x + 2 + (cursor_col - scroll) as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_report(
    frame: &mut Frame,
    report: &ScoreReport,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let block = panel(" Report ", palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Verdict
            Constraint::Length(4), // Gauges
            Constraint::Min(0),    // Details
        ])
        .split(inner);

    let verdict = report.verdict();
    let verdict_color = palette.verdict(verdict);
    let ai_percent = to_percent(report.ai_synthetic_prob());
    let mut headline = vec![Span::styled(
        verdict.label().to_uppercase(),
        Style::default()
            .fg(verdict_color)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(detail) = verdict.detail() {
        headline.push(Span::styled(
            format!(" {detail}"),
            Style::default().fg(palette.text_secondary),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(headline)), chunks[0]);

    let gauge_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4])
        .split(chunks[1]);
    let mut gauges = vec![("AI Probability", ai_percent, verdict_color)];
    gauges.extend(
        report
            .gauges()
            .into_iter()
            .map(|(label, percent)| (label, percent, palette.accent)),
    );
    for ((label, percent, color), row) in gauges.into_iter().zip(gauge_rows.iter()) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(palette.bg_highlight))
            .percent(u16::from(percent))
            .label(format!("{label} {percent}%"));
        frame.render_widget(gauge, *row);
    }

    let mut lines = vec![Line::from("")];
    if !report.findings().is_empty() {
        lines.push(section_title("Findings", palette));
        for finding in report.findings() {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", glyphs.bullet), Style::default().fg(palette.peach)),
                Span::styled(model_text(finding), Style::default().fg(palette.text_primary)),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(section_title("Explanation", palette));
    lines.push(Line::from(Span::styled(
        model_text(report.explanation()),
        Style::default().fg(palette.text_primary),
    )));

    let metadata = metadata_rows(report.metadata());
    if !metadata.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_title("Metadata", palette));
        for (key, value) in metadata {
            lines.push(Line::from(vec![
                Span::styled(format!("{key}: "), Style::default().fg(palette.text_muted)),
                Span::styled(value, Style::default().fg(palette.text_secondary)),
            ]));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        chunks[2],
    );
}

fn section_title(title: &'static str, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Flatten report metadata one level deep into sanitized key/value rows.
fn metadata_rows(metadata: &Map<String, Value>) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for (key, value) in metadata {
        match value {
            Value::Object(nested) => {
                for (inner_key, inner_value) in nested {
                    rows.push((
                        model_text(&format!("{key}.{inner_key}")),
                        model_text(&scalar_text(inner_value)),
                    ));
                }
            }
            _ => rows.push((model_text(key), model_text(&scalar_text(value)))),
        }
    }
    rows
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
