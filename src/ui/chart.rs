//! Chart view rendering.
//!
//! Draws one bar per distinct message length, sorted by length, with bar
//! height equal to the count and colours spread across the viridis map.
//! A panel of recent messages sits underneath.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Histogram;
use crate::ui::Theme;

/// Gap between bars when there is room for it.
const BAR_GAP: u16 = 1;
/// Widest bar drawn, so a handful of buckets does not fill the screen.
const MAX_BAR_WIDTH: u16 = 9;
/// Height of the recent-messages panel, borders included.
const RECENT_PANEL_HEIGHT: u16 = 8;

/// Bar geometry for a given number of bars and inner width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub bar_width: u16,
    pub bar_gap: u16,
    /// How many bars fit; the rest are cut off on the right.
    pub visible: usize,
}

/// Fit `count` bars into `width` columns.
pub fn fit_bars(count: usize, width: u16) -> BarLayout {
    if count == 0 || width == 0 {
        return BarLayout {
            bar_width: 1,
            bar_gap: BAR_GAP,
            visible: 0,
        };
    }

    let n = count.min(u16::MAX as usize) as u16;
    let per_bar = (width + BAR_GAP) / n;
    if per_bar > BAR_GAP {
        let bar_width = (per_bar - BAR_GAP).min(MAX_BAR_WIDTH);
        BarLayout {
            bar_width,
            bar_gap: BAR_GAP,
            visible: count,
        }
    } else {
        // Too many buckets: pack 1-wide bars with no gap.
        BarLayout {
            bar_width: 1,
            bar_gap: 0,
            visible: count.min(width as usize),
        }
    }
}

/// Build the bars for a histogram, in length order.
pub fn build_bars(histogram: &Histogram) -> Vec<Bar<'static>> {
    let count = histogram.distinct();
    histogram
        .buckets()
        .enumerate()
        .map(|(i, (length, n))| {
            let color = Theme::bar_color(i, count);
            Bar::default()
                .value(n)
                .label(Line::from(length.to_string()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(color).add_modifier(Modifier::REVERSED))
        })
        .collect()
}

/// Render the Chart view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks =
        Layout::vertical([Constraint::Min(6), Constraint::Length(RECENT_PANEL_HEIGHT)]).split(area);

    render_chart(frame, app, chunks[0]);
    render_recent(frame, app, chunks[1]);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let histogram = &app.histogram;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if histogram.is_empty() {
        let placeholder = Paragraph::new("Waiting for messages...")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.title(" Counts of Messages by Message Length "));
        frame.render_widget(placeholder, area);
        return;
    }

    let bars = build_bars(histogram);
    let layout = fit_bars(bars.len(), area.width.saturating_sub(2));

    let title = if layout.visible < bars.len() {
        format!(
            " Counts of Messages by Message Length (first {} of {} lengths) ",
            layout.visible,
            bars.len()
        )
    } else {
        " Counts of Messages by Message Length ".to_string()
    };

    let chart = BarChart::default()
        .block(block.title(title).title_bottom(Line::from(" Message Length ").centered()))
        .data(BarGroup::default().bars(&bars[..layout.visible]))
        .bar_width(layout.bar_width)
        .bar_gap(layout.bar_gap)
        .max(histogram.max_count());

    frame.render_widget(chart, area);
}

fn render_recent(frame: &mut Frame, app: &App, area: Rect) {
    let rows = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .recent
        .newest_first()
        .take(rows)
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("#{:<6}", entry.sequence),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::raw(entry.summary.clone()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Recent Messages ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
