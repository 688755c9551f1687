//! Table view rendering.
//!
//! Lists every observed message length with its count, share of all
//! messages, and a proportional bar. Sortable by length or count.

use std::cmp::Ordering;
use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::common::format_count;
use crate::ui::Theme;

/// Width of the proportional bar column, in cells.
const SHARE_BAR_WIDTH: usize = 20;

/// Column to sort by in the Table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by message length.
    #[default]
    Length,
    /// Sort by number of messages.
    Count,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Length => SortColumn::Count,
            SortColumn::Count => SortColumn::Length,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SortColumn::Length => "length",
            SortColumn::Count => "count",
        }
    }
}

/// Render the Table view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let buckets = app.sorted_buckets();
    let total = app.histogram.total();
    let max_count = app.histogram.max_count();
    let distinct = app.histogram.distinct();

    let colors = color_indices(app);

    let header = Row::new(vec![
        Cell::from(format_header("Length", SortColumn::Length, app)),
        Cell::from(format_header("Count", SortColumn::Count, app)),
        Cell::from("Share"),
        Cell::from("Distribution"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = buckets
        .iter()
        .map(|&(length, count)| {
            let index = colors.get(&length).copied().unwrap_or(0);
            let color = Theme::bar_color(index, distinct);
            Row::new(vec![
                Cell::from(length.to_string()),
                Cell::from(format_count(count)),
                Cell::from(format!("{:.1}%", share(count, total) * 100.0)),
                Cell::from(share_bar(count, max_count)).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(SHARE_BAR_WIDTH as u16),
    ];

    let selected = app.selected_row.min(buckets.len().saturating_sub(1));
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };
    let position_info = if !buckets.is_empty() {
        format!(" [{}/{}]", selected + 1, buckets.len())
    } else {
        String::new()
    };

    let title = format!(
        " Lengths ({}) [s:sort {}{}]{} ",
        buckets.len(),
        app.sort_column.label(),
        sort_dir,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !buckets.is_empty() {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Colour slot per length: colours follow length order, as in the chart,
/// whatever the table order.
fn color_indices(app: &App) -> HashMap<u64, usize> {
    app.histogram
        .buckets()
        .enumerate()
        .map(|(index, (length, _))| (length, index))
        .collect()
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort `(length, count)` buckets by the given column and direction.
pub fn sort_buckets_by(buckets: &mut [(u64, u64)], column: SortColumn, ascending: bool) {
    buckets.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Length => a.0.cmp(&b.0),
            SortColumn::Count => a.1.cmp(&b.1),
        };

        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        // Secondary sort by length keeps equal counts stable
        if primary == Ordering::Equal {
            a.0.cmp(&b.0)
        } else {
            primary
        }
    });
}

fn share(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn share_bar(count: u64, max_count: u64) -> String {
    if max_count == 0 {
        return String::new();
    }
    let filled = ((count as f64 / max_count as f64) * SHARE_BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.max(1))
}
