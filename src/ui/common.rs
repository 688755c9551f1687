//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, SourceStatus, View};
use crate::data::duration::format_elapsed;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Number of sparkline cells in the header.
const SPARKLINE_WIDTH: usize = 16;

/// Render the header bar with consumption overview.
///
/// Displays: source state, source, message count, distinct lengths, rate,
/// and a sparkline of recent lengths.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let histogram = &app.histogram;
    let status_style = app.theme.status_style(&app.status);

    let rate = app
        .recent
        .rate()
        .map(|r| format!("{:.1}/s", r))
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("BUZZWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(app.source_description().to_string()),
        Span::raw(" │ "),
        Span::styled(
            format_count(histogram.total()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" msgs "),
        Span::styled(
            format!("{}", histogram.distinct()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" lengths │ "),
        Span::raw(rate),
    ];

    if let Some(mean) = histogram.mean() {
        spans.push(Span::raw(format!(" │ mean {:.1}", mean)));
    }

    let sparkline = render_sparkline(&app.recent.length_sparkline());
    if !sparkline.is_empty() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(sparkline, Style::default().fg(app.theme.highlight)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Render the newest sparkline values, oldest on the left.
pub fn render_sparkline(data: &[u8]) -> String {
    let skip = data.len().saturating_sub(SPARKLINE_WIDTH);
    data[skip..].iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Chart "), Line::from(" 2:Table ")];

    let selected = match app.current_view {
        View::Chart => 0,
        View::Table => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// One-line description of the consumption state.
pub fn status_text(app: &App) -> String {
    match &app.status {
        SourceStatus::Consuming => match app.recent.last_received() {
            Some(at) => format!("Consuming | last message {} ago", format_elapsed(at.elapsed())),
            None => "Consuming | waiting for first message".to_string(),
        },
        SourceStatus::Exhausted => format!(
            "Source exhausted after {} messages",
            app.histogram.total()
        ),
        SourceStatus::Failed(err) => format!("Error: {}", err),
    }
}

/// Render the status bar at the bottom.
///
/// Shows: source state, available controls. Also displays temporary status
/// messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Chart => "Tab:switch e:export ?:help q:quit",
        View::Table => "↑↓:select s:sort S:reverse Tab:switch e:export ?:help q:quit",
    };

    let line = Line::from(vec![
        Span::styled(format!(" {}", status_text(app)), app.theme.status_style(&app.status)),
        Span::styled(
            format!(" | {}", controls),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1/2         Chart / Table"),
        Line::from("  ↑/↓ j/k     Navigate table"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Table",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::ui::Theme;
    use std::path::PathBuf;

    #[test]
    fn format_count_suffixes() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(1_234_567), "1.2M");
    }

    #[test]
    fn sparkline_keeps_newest_values() {
        assert!(render_sparkline(&[]).is_empty());
        assert_eq!(render_sparkline(&[0, 7]), "▁█");

        let long: Vec<u8> = (0..40).map(|i| (i % 8) as u8).collect();
        let rendered = render_sparkline(&long);
        assert_eq!(rendered.chars().count(), SPARKLINE_WIDTH);
        assert!(rendered.ends_with('█'));
    }

    #[test]
    fn status_text_for_missing_source() {
        let err = SourceError::NotFound(PathBuf::from("data/project_live.json"));
        let app = App::unavailable(&err, Theme::dark());
        assert_eq!(
            status_text(&app),
            "Error: source unavailable: Data file not found: data/project_live.json"
        );
    }
}
