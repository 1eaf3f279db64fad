//! Dashboard rendering
//!
//! One screen: header with window selector, four KPI cards, volume chart,
//! sentiment/resolution charts, per-model cost distribution and the derived
//! insights panel. All arithmetic lives in `agentlens_core::insights`; this
//! module only lays widgets out.

use crate::app::App;
use crate::theme;
use agentlens_core::insights::{
    self, ChartSeries, CostSegment, RESOLUTION_DOMAIN, SENTIMENT_DOMAIN,
};
use agentlens_core::models::{AnalyticsSnapshot, TrendDirection, TrendSummary};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

/// Render the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    match app.store.snapshot() {
        Some(snapshot) => render_dashboard(frame, area, app, &snapshot),
        None => render_waiting(frame, area, app),
    }
}

/// Loading / no-data screen shown before the first successful cycle
fn render_waiting(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" agentlens — {} ", app.agent_id))
        .style(Style::default().fg(Color::Gray));

    let mut lines = vec![Line::from(""), Line::from("Loading analytics...")];
    if let Some(msg) = &app.status_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(Span::styled(
            "Retrying on the next refresh",
            Style::default().fg(theme::MUTED),
        )));
    }

    let para = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn render_dashboard(frame: &mut Frame, area: Rect, app: &App, snapshot: &AnalyticsSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(7),  // KPI cards
            Constraint::Min(8),     // Volume chart
            Constraint::Length(12), // Sentiment + resolution
            Constraint::Length(12), // Costs + insights
            Constraint::Length(1),  // Status line
        ])
        .split(area);

    render_header(frame, chunks[0], app, snapshot);
    render_kpi_cards(frame, chunks[1], snapshot);

    let series = insights::chart_series(&snapshot.trends.daily_data);
    render_volume_chart(frame, chunks[2], &series);

    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_sentiment_chart(frame, mid[0], &series);
    render_resolution_chart(frame, mid[1], &series);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[4]);
    render_cost_breakdown(frame, bottom[0], snapshot);
    render_insights_panel(frame, bottom[1], app, snapshot);

    render_status_line(frame, chunks[5], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, snapshot: &AnalyticsSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "agentlens",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" — "),
        Span::raw(app.agent_id.clone()),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Left);
    frame.render_widget(title, chunks[0]);

    let window_text = vec![
        Span::raw("Window: "),
        Span::styled(
            app.window.display(),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled("[F1:7d F2:30d F3:90d]", Style::default().fg(theme::MUTED)),
        Span::raw("  "),
        Span::styled(
            format!("updated {}", snapshot.fetched_at.format("%H:%M:%S")),
            Style::default().fg(theme::MUTED),
        ),
    ];
    let window_para = Paragraph::new(Line::from(window_text))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Right);
    frame.render_widget(window_para, chunks[1]);
}

fn render_kpi_cards(frame: &mut Frame, area: Rect, snapshot: &AnalyticsSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let summary = &snapshot.trends.summary;

    render_stat_card(
        frame,
        chunks[0],
        "Active Conversations",
        &snapshot.realtime.active_conversations.to_string(),
        Color::Cyan,
        summary.volume_trend,
    );
    render_stat_card(
        frame,
        chunks[1],
        "Total Conversations",
        &format_number(summary.total_conversations),
        Color::Green,
        summary.volume_trend,
    );
    render_stat_card(
        frame,
        chunks[2],
        "Avg Sentiment",
        &format!("{:.1}%", summary.avg_sentiment * 100.0),
        Color::Yellow,
        summary.sentiment_trend,
    );
    render_stat_card(
        frame,
        chunks[3],
        "Total Cost",
        &format!("${:.2}", summary.total_cost),
        Color::Magenta,
        summary.cost_trend,
    );
}

/// One KPI card: value plus the trend glyph for its metric
fn render_stat_card(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    color: Color,
    trend: TrendDirection,
) {
    let glyph = insights::trend_glyph(trend);
    let glyph_color = theme::tone_color(glyph.tone);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            value.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(glyph.arrow, Style::default().fg(glyph_color)),
            Span::raw(" "),
            Span::styled(trend.as_label(), Style::default().fg(glyph_color)),
        ]),
    ];

    let para = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn render_volume_chart(frame: &mut Frame, area: Rect, series: &ChartSeries) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Conversation Volume");

    if series.is_empty() {
        let para = Paragraph::new("No data in window")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme::MUTED));
        frame.render_widget(para, area);
        return;
    }

    let max_y = series.volume_max();
    let x_max = (series.dates.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("Conversations")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::CONVERSATIONS_COLOR))
            .data(&series.conversations),
        Dataset::default()
            .name("Messages")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::MESSAGES_COLOR))
            .data(&series.messages),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(date_labels(&series.dates))
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format_number((max_y / 2.0) as u64)),
                    Span::raw(format_number(max_y as u64)),
                ])
                .bounds([0.0, max_y * 1.1]),
        );

    frame.render_widget(chart, area);
}

fn render_sentiment_chart(frame: &mut Frame, area: Rect, series: &ChartSeries) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Sentiment Trend");

    if series.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    let x_max = (series.dates.len().saturating_sub(1)).max(1) as f64;
    let datasets = vec![Dataset::default()
        .name("Sentiment")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme::SENTIMENT_COLOR))
        .data(&series.sentiment)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(date_labels(&series.dates))
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(vec![Span::raw("0"), Span::raw("0.5"), Span::raw("1")])
                // Fixed domain: sentiment is always plotted against [0, 1]
                .bounds(SENTIMENT_DOMAIN),
        );

    frame.render_widget(chart, area);
}

fn render_resolution_chart(frame: &mut Frame, area: Rect, series: &ChartSeries) {
    // Fixed [0, 100] domain via an explicit max on the bar chart
    let bar_data: Vec<(String, u64)> = series
        .dates
        .iter()
        .zip(series.resolution.iter())
        .map(|(date, (_, rate))| (day_label(date), rate.round() as u64))
        .collect();
    let refs: Vec<(&str, u64)> = bar_data.iter().map(|(d, v)| (d.as_str(), *v)).collect();

    let barchart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Resolution Rate (%)"),
        )
        .data(&refs)
        .max(RESOLUTION_DOMAIN[1] as u64)
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::RESOLUTION_COLOR))
        .value_style(
            Style::default()
                .fg(Color::White)
                .bg(theme::RESOLUTION_COLOR),
        );

    frame.render_widget(barchart, area);
}

fn render_cost_breakdown(frame: &mut Frame, area: Rect, snapshot: &AnalyticsSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Cost by Model");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let segments = insights::cost_segments(&snapshot.costs, theme::CHART_PALETTE.len());
    if segments.is_empty() {
        let para = Paragraph::new("No cost data")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme::MUTED));
        frame.render_widget(para, inner);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    // Segment colors cycle the palette by position, not by model identity
    let bars: Vec<Bar> = segments
        .iter()
        .map(|seg| {
            Bar::default()
                .value(cost_bar_value(seg.total_cost))
                .text_value(format!("${:.2}", seg.total_cost))
                .label(Line::from(truncate(&seg.model, 10)))
                .style(Style::default().fg(theme::palette_color(seg.palette_index)))
        })
        .collect();

    let barchart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(1);
    frame.render_widget(barchart, chunks[0]);

    render_cost_details(frame, chunks[1], snapshot, &segments);
}

fn render_cost_details(
    frame: &mut Frame,
    area: Rect,
    snapshot: &AnalyticsSnapshot,
    segments: &[CostSegment],
) {
    let mut lines: Vec<Line> = segments
        .iter()
        .map(|seg| {
            Line::from(vec![
                Span::styled(
                    "■ ",
                    Style::default().fg(theme::palette_color(seg.palette_index)),
                ),
                Span::raw(format!(
                    "{:<22} {:>6} req  ${:>8.4}  ${:.6}/req",
                    truncate(&seg.model, 22),
                    seg.requests,
                    seg.total_cost,
                    seg.avg_cost_per_request
                )),
            ])
        })
        .collect();

    lines.push(Line::from(Span::styled(
        format!(
            "Total: ${:.2} over {} requests",
            snapshot.costs.total_cost, snapshot.costs.total_requests
        ),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));

    let para = Paragraph::new(lines).alignment(Alignment::Left);
    frame.render_widget(para, area);
}

fn render_insights_panel(frame: &mut Frame, area: Rect, app: &App, snapshot: &AnalyticsSnapshot) {
    let summary: &TrendSummary = &snapshot.trends.summary;
    let days = app.window.days();

    let lines = vec![
        Line::from(""),
        insight_line(
            "Avg Resolution Rate",
            format!("{:.1}%", summary.avg_resolution_rate),
        ),
        insight_line(
            "Cost per Conversation",
            insights::format_cost_per_conversation(summary),
        ),
        insight_line(
            "Messages per Day",
            insights::messages_per_day(summary, days).to_string(),
        ),
    ];

    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Key Insights"))
        .alignment(Alignment::Left);
    frame.render_widget(para, area);
}

fn insight_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<24}", label),
            Style::default().fg(theme::MUTED),
        ),
        Span::styled(
            value,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.status_message {
        Some(msg) => Line::from(Span::styled(
            format!(" {} (showing last good data)", msg),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            " q:quit  w:cycle window  r/F5:refresh",
            Style::default().fg(theme::MUTED),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// First / middle / last date strings as x-axis labels
fn date_labels(dates: &[String]) -> Vec<Span<'static>> {
    match dates.len() {
        0 => vec![],
        1 => vec![Span::raw(dates[0].clone())],
        n => vec![
            Span::raw(dates[0].clone()),
            Span::raw(dates[n / 2].clone()),
            Span::raw(dates[n - 1].clone()),
        ],
    }
}

/// Day-of-month part of a "YYYY-MM-DD" key, for narrow bar labels
fn day_label(date: &str) -> String {
    date.rsplit('-').next().unwrap_or(date).to_string()
}

/// Cost in cents for bar heights; any non-zero cost gets a visible bar
fn cost_bar_value(cost: f64) -> u64 {
    let cents = (cost * 100.0).round() as u64;
    if cents == 0 && cost > 0.0 {
        1
    } else {
        cents
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Format large numbers with K/M/B suffixes
fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_label() {
        assert_eq!(day_label("2026-08-29"), "29");
        assert_eq!(day_label("weird"), "weird");
    }

    #[test]
    fn test_date_labels_picks_ends_and_middle() {
        let dates: Vec<String> = (1..=7).map(|d| format!("2026-08-{:02}", d)).collect();
        let labels = date_labels(&dates);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0].content, "2026-08-01");
        assert_eq!(labels[2].content, "2026-08-07");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(950), "950");
        assert_eq!(format_number(1_500), "1.5K");
        assert_eq!(format_number(2_500_000), "2.5M");
    }

    #[test]
    fn test_cost_bar_value_keeps_small_segments_visible() {
        assert_eq!(cost_bar_value(12.80), 1280);
        assert_eq!(cost_bar_value(0.008), 1);
        // Below half a cent still renders a minimal bar
        assert_eq!(cost_bar_value(0.002), 1);
        assert_eq!(cost_bar_value(0.0), 0);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("claude-sonnet-extended", 10), "claude-so…");
    }
}
