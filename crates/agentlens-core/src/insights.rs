//! Derivation & presentation helpers over a merged snapshot
//!
//! Pure functions only: everything here is computed from an
//! `AnalyticsSnapshot` (or parts of it) plus the trailing window, with no
//! side effects, so the rendering layer stays free of arithmetic.

use crate::models::{CostBreakdown, DailyMetric, TrendDirection, TrendSummary};

/// Y-axis domain for sentiment charts
pub const SENTIMENT_DOMAIN: [f64; 2] = [0.0, 1.0];

/// Y-axis domain for resolution-rate charts
pub const RESOLUTION_DOMAIN: [f64; 2] = [0.0, 100.0];

/// Visual tone for a trend glyph; the frontend maps tones to its own colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// Arrow + tone for a trend direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendGlyph {
    pub arrow: &'static str,
    pub tone: Tone,
}

/// Map a trend direction to its glyph
///
/// Total by construction: `TrendDirection` decoding already folds every
/// unknown label into `Stable`, so there is no failure path here.
pub fn trend_glyph(direction: TrendDirection) -> TrendGlyph {
    match direction {
        TrendDirection::Increasing => TrendGlyph {
            arrow: "↑",
            tone: Tone::Positive,
        },
        TrendDirection::Decreasing => TrendGlyph {
            arrow: "↓",
            tone: Tone::Negative,
        },
        TrendDirection::Stable => TrendGlyph {
            arrow: "—",
            tone: Tone::Neutral,
        },
    }
}

/// Average cost of one conversation over the window
///
/// `None` when no conversations happened; the display layer renders that as
/// "—" instead of propagating a division by zero into formatted text.
pub fn cost_per_conversation(summary: &TrendSummary) -> Option<f64> {
    if summary.total_conversations == 0 {
        return None;
    }
    Some(summary.total_cost / summary.total_conversations as f64)
}

/// Formatted cost per conversation, with the "—" sentinel for no data
pub fn format_cost_per_conversation(summary: &TrendSummary) -> String {
    match cost_per_conversation(summary) {
        Some(cost) => format!("${:.4}", cost),
        None => "—".to_string(),
    }
}

/// Rounded messages per day over the window
///
/// Guards `days == 0` even though the UI only supplies 7/30/90; reuse
/// elsewhere must not divide by zero.
pub fn messages_per_day(summary: &TrendSummary, days: u32) -> u64 {
    if days == 0 {
        return 0;
    }
    (summary.total_messages as f64 / days as f64).round() as u64
}

/// Parallel chart series projected from the daily data
///
/// X values are day indices (the date strings stay available as labels);
/// sentiment is plotted against [0, 1] and resolution rate against [0, 100].
#[derive(Debug, Clone, Default)]
pub struct ChartSeries {
    pub dates: Vec<String>,
    pub conversations: Vec<(f64, f64)>,
    pub messages: Vec<(f64, f64)>,
    pub sentiment: Vec<(f64, f64)>,
    pub resolution: Vec<(f64, f64)>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Max y over conversations and messages, for line chart bounds
    pub fn volume_max(&self) -> f64 {
        self.conversations
            .iter()
            .chain(self.messages.iter())
            .map(|p| p.1)
            .fold(1.0, f64::max)
    }
}

/// Project the daily series into renderable parallel series
pub fn chart_series(daily: &[DailyMetric]) -> ChartSeries {
    let mut series = ChartSeries {
        dates: Vec::with_capacity(daily.len()),
        conversations: Vec::with_capacity(daily.len()),
        messages: Vec::with_capacity(daily.len()),
        sentiment: Vec::with_capacity(daily.len()),
        resolution: Vec::with_capacity(daily.len()),
    };

    for (i, day) in daily.iter().enumerate() {
        let x = i as f64;
        series.dates.push(day.date.clone());
        series.conversations.push((x, day.conversations as f64));
        series.messages.push((x, day.messages as f64));
        series.sentiment.push((x, day.sentiment));
        series.resolution.push((x, day.resolution_rate));
    }

    series
}

/// One segment of the categorical cost distribution
#[derive(Debug, Clone)]
pub struct CostSegment {
    pub model: String,
    pub requests: u64,
    pub total_cost: f64,
    pub avg_cost_per_request: f64,
    /// Index into the frontend's fixed palette
    pub palette_index: usize,
}

/// Project the per-model breakdown into palette-cycled segments
///
/// Colors are assigned by position, not by model identity: two windows that
/// order the model list differently will color the same model differently.
/// Known limitation, kept as designed.
pub fn cost_segments(costs: &CostBreakdown, palette_len: usize) -> Vec<CostSegment> {
    let palette_len = palette_len.max(1);
    costs
        .models
        .iter()
        .enumerate()
        .map(|(i, entry)| CostSegment {
            model: entry.model.clone(),
            requests: entry.requests,
            total_cost: entry.total_cost,
            avg_cost_per_request: entry.avg_cost_per_request,
            palette_index: i % palette_len,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelCostEntry;

    fn summary(conversations: u64, messages: u64, cost: f64) -> TrendSummary {
        TrendSummary {
            total_conversations: conversations,
            total_messages: messages,
            total_cost: cost,
            ..Default::default()
        }
    }

    #[test]
    fn test_cost_per_conversation() {
        // 45.00 over 120 conversations = 0.375
        let s = summary(120, 0, 45.0);
        assert!((cost_per_conversation(&s).unwrap() - 0.375).abs() < 1e-9);
        assert_eq!(format_cost_per_conversation(&s), "$0.3750");
    }

    #[test]
    fn test_cost_per_conversation_zero_sentinel() {
        let s = summary(0, 0, 10.0);
        assert!(cost_per_conversation(&s).is_none());
        assert_eq!(format_cost_per_conversation(&s), "—");
    }

    #[test]
    fn test_messages_per_day() {
        assert_eq!(messages_per_day(&summary(0, 300, 0.0), 30), 10);
        assert_eq!(messages_per_day(&summary(0, 301, 0.0), 30), 10);
        assert_eq!(messages_per_day(&summary(0, 316, 0.0), 30), 11);
        // Zero window must not divide
        assert_eq!(messages_per_day(&summary(0, 300, 0.0), 0), 0);
    }

    #[test]
    fn test_trend_glyph_mapping() {
        assert_eq!(
            trend_glyph(TrendDirection::Increasing),
            TrendGlyph {
                arrow: "↑",
                tone: Tone::Positive
            }
        );
        assert_eq!(
            trend_glyph(TrendDirection::Decreasing),
            TrendGlyph {
                arrow: "↓",
                tone: Tone::Negative
            }
        );
        // Anything the decoder could not recognize arrives as Stable
        assert_eq!(
            trend_glyph(TrendDirection::from_label("sideways")),
            TrendGlyph {
                arrow: "—",
                tone: Tone::Neutral
            }
        );
    }

    #[test]
    fn test_chart_series_parallel_lengths() {
        let daily = vec![
            DailyMetric {
                date: "2026-08-27".to_string(),
                conversations: 12,
                messages: 140,
                sentiment: 0.7,
                resolution_rate: 85.0,
                cost: 1.2,
            },
            DailyMetric {
                date: "2026-08-28".to_string(),
                conversations: 15,
                messages: 160,
                sentiment: 0.65,
                resolution_rate: 92.0,
                cost: 1.4,
            },
        ];

        let series = chart_series(&daily);
        assert_eq!(series.dates.len(), 2);
        assert_eq!(series.conversations, vec![(0.0, 12.0), (1.0, 15.0)]);
        assert_eq!(series.messages[1], (1.0, 160.0));
        assert_eq!(series.sentiment[0], (0.0, 0.7));
        assert_eq!(series.resolution[1], (1.0, 92.0));
        assert_eq!(series.volume_max(), 160.0);
    }

    #[test]
    fn test_cost_segments_palette_cycles() {
        let costs = CostBreakdown {
            models: (0..7)
                .map(|i| ModelCostEntry {
                    model: format!("model-{}", i),
                    requests: 10,
                    total_cost: 1.0,
                    avg_cost_per_request: 0.1,
                })
                .collect(),
            total_cost: 7.0,
            total_requests: 70,
        };

        let segments = cost_segments(&costs, 5);
        assert_eq!(segments.len(), 7);
        assert_eq!(segments[0].palette_index, 0);
        assert_eq!(segments[4].palette_index, 4);
        // Sixth model wraps back to the first palette slot
        assert_eq!(segments[5].palette_index, 0);
        assert_eq!(segments[6].palette_index, 1);
    }
}
