//! Response shapes for the three analytics endpoints and the merged snapshot
//!
//! Field names match the JSON produced by the analytics service. Dates stay
//! opaque strings: chart axes only need string equality, so no date parsing
//! happens here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Instantaneous counters from `GET /analytics/{agent_id}/realtime`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealtimeSnapshot {
    #[serde(default)]
    pub active_conversations: u64,
    #[serde(default)]
    pub total_conversations: u64,
    #[serde(default)]
    pub total_messages: u64,
    /// Average sentiment in [0, 1]
    #[serde(default)]
    pub avg_sentiment: f64,
}

/// One day of trend data, ascending by date within a window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyMetric {
    /// Date key as emitted by the service ("YYYY-MM-DD")
    pub date: String,
    #[serde(default)]
    pub conversations: u64,
    #[serde(default)]
    pub messages: u64,
    /// Sentiment in [0, 1]
    #[serde(default)]
    pub sentiment: f64,
    /// Resolution rate in [0, 100]
    #[serde(default)]
    pub resolution_rate: f64,
    #[serde(default)]
    pub cost: f64,
}

/// Aggregate over the daily series for the current window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendSummary {
    #[serde(default)]
    pub total_conversations: u64,
    #[serde(default)]
    pub total_messages: u64,
    #[serde(default)]
    pub avg_sentiment: f64,
    #[serde(default)]
    pub avg_resolution_rate: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub cost_trend: TrendDirection,
    #[serde(default)]
    pub volume_trend: TrendDirection,
    #[serde(default)]
    pub sentiment_trend: TrendDirection,
}

/// Categorical movement of a metric, computed server-side
///
/// Decoding is total: any string other than the two known variants (and any
/// missing field) becomes `Stable`. The service is free to grow new labels
/// without breaking older clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl TrendDirection {
    /// Map a raw label to a direction; unknown labels are `Stable`
    pub fn from_label(label: &str) -> Self {
        match label {
            "increasing" => Self::Increasing,
            "decreasing" => Self::Decreasing,
            _ => Self::Stable,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

impl<'de> Deserialize<'de> for TrendDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

impl Serialize for TrendDirection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_label())
    }
}

/// Response of `GET /analytics/{agent_id}/trends?days={n}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendSeries {
    #[serde(default)]
    pub daily_data: Vec<DailyMetric>,
    #[serde(default)]
    pub summary: TrendSummary,
}

/// Per-model cost line item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelCostEntry {
    pub model: String,
    #[serde(default)]
    pub requests: u64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub avg_cost_per_request: f64,
}

/// Response of `GET /analytics/{agent_id}/costs?days={n}`
///
/// Model order is whatever the service returned; chart colors are assigned
/// by position, so reordering between windows reassigns colors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(default)]
    pub models: Vec<ModelCostEntry>,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub total_requests: u64,
}

/// The merged view model: one point-in-time combination of all three
/// endpoint responses
///
/// Created fresh on every successful fetch cycle and wholesale-replaced in
/// the store. Consumers only ever see a fully formed snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub realtime: RealtimeSnapshot,
    pub trends: TrendSeries,
    pub costs: CostBreakdown,
    /// When this snapshot was assembled (client clock)
    pub fetched_at: DateTime<Utc>,
}

impl AnalyticsSnapshot {
    /// Merge the three endpoint responses into one snapshot
    pub fn merge(realtime: RealtimeSnapshot, trends: TrendSeries, costs: CostBreakdown) -> Self {
        Self {
            realtime,
            trends,
            costs,
            fetched_at: Utc::now(),
        }
    }
}

/// Trailing window for trend and cost queries
///
/// The service accepts exactly these three ranges; anything else is rejected
/// at construction rather than passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrailingWindow {
    Last7,
    #[default]
    Last30,
    Last90,
}

impl TrailingWindow {
    /// Window size in days, as sent in the `days` query parameter
    pub fn days(&self) -> u32 {
        match self {
            Self::Last7 => 7,
            Self::Last30 => 30,
            Self::Last90 => 90,
        }
    }

    /// Parse a day count, rejecting anything outside {7, 30, 90}
    pub fn from_days(days: u32) -> Result<Self, CoreError> {
        match days {
            7 => Ok(Self::Last7),
            30 => Ok(Self::Last30),
            90 => Ok(Self::Last90),
            _ => Err(CoreError::InvalidWindow { days }),
        }
    }

    /// Cycle to the next window (7 → 30 → 90 → 7)
    pub fn next(self) -> Self {
        match self {
            Self::Last7 => Self::Last30,
            Self::Last30 => Self::Last90,
            Self::Last90 => Self::Last7,
        }
    }

    /// Display label
    pub fn display(&self) -> String {
        format!("Last {} days", self.days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_direction_total() {
        assert_eq!(
            TrendDirection::from_label("increasing"),
            TrendDirection::Increasing
        );
        assert_eq!(
            TrendDirection::from_label("decreasing"),
            TrendDirection::Decreasing
        );
        assert_eq!(TrendDirection::from_label("stable"), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_label(""), TrendDirection::Stable);
        assert_eq!(
            TrendDirection::from_label("sideways?!"),
            TrendDirection::Stable
        );
    }

    #[test]
    fn test_trend_direction_unknown_label_decodes_stable() {
        let summary: TrendSummary =
            serde_json::from_str(r#"{"cost_trend": "exploding", "volume_trend": "increasing"}"#)
                .unwrap();
        assert_eq!(summary.cost_trend, TrendDirection::Stable);
        assert_eq!(summary.volume_trend, TrendDirection::Increasing);
        // Missing field defaults to Stable
        assert_eq!(summary.sentiment_trend, TrendDirection::Stable);
    }

    #[test]
    fn test_parse_trends_response() {
        let json = r#"{
            "daily_data": [
                {"date": "2026-08-27", "conversations": 12, "messages": 140,
                 "sentiment": 0.72, "resolution_rate": 85.0, "cost": 1.25},
                {"date": "2026-08-28", "conversations": 15, "messages": 160,
                 "sentiment": 0.68, "resolution_rate": 90.0, "cost": 1.40}
            ],
            "summary": {
                "total_conversations": 27,
                "total_messages": 300,
                "avg_sentiment": 0.70,
                "avg_resolution_rate": 87.5,
                "total_cost": 2.65,
                "cost_trend": "increasing",
                "volume_trend": "stable",
                "sentiment_trend": "decreasing"
            }
        }"#;

        let trends: TrendSeries = serde_json::from_str(json).unwrap();
        assert_eq!(trends.daily_data.len(), 2);
        assert_eq!(trends.daily_data[0].date, "2026-08-27");
        assert_eq!(trends.summary.total_conversations, 27);
        assert_eq!(trends.summary.cost_trend, TrendDirection::Increasing);
        assert_eq!(trends.summary.sentiment_trend, TrendDirection::Decreasing);
    }

    #[test]
    fn test_parse_cost_breakdown() {
        let json = r#"{
            "models": [
                {"model": "gpt-4o", "requests": 320, "total_cost": 12.80,
                 "avg_cost_per_request": 0.04},
                {"model": "claude-sonnet", "requests": 150, "total_cost": 4.50,
                 "avg_cost_per_request": 0.03}
            ],
            "total_cost": 17.30,
            "total_requests": 470
        }"#;

        let costs: CostBreakdown = serde_json::from_str(json).unwrap();
        assert_eq!(costs.models.len(), 2);
        assert_eq!(costs.models[0].model, "gpt-4o");
        assert_eq!(costs.total_requests, 470);
    }

    #[test]
    fn test_trailing_window_from_days() {
        assert_eq!(TrailingWindow::from_days(7).unwrap(), TrailingWindow::Last7);
        assert_eq!(
            TrailingWindow::from_days(30).unwrap(),
            TrailingWindow::Last30
        );
        assert_eq!(
            TrailingWindow::from_days(90).unwrap(),
            TrailingWindow::Last90
        );
        assert!(TrailingWindow::from_days(0).is_err());
        assert!(TrailingWindow::from_days(14).is_err());
    }

    #[test]
    fn test_trailing_window_cycle() {
        let w = TrailingWindow::Last7;
        assert_eq!(w.next(), TrailingWindow::Last30);
        assert_eq!(w.next().next(), TrailingWindow::Last90);
        assert_eq!(w.next().next().next(), TrailingWindow::Last7);
    }

    #[test]
    fn test_snapshot_merge_preserves_series_length() {
        let trends = TrendSeries {
            daily_data: vec![DailyMetric::default(); 30],
            summary: TrendSummary::default(),
        };
        let snapshot = AnalyticsSnapshot::merge(
            RealtimeSnapshot::default(),
            trends,
            CostBreakdown::default(),
        );
        assert_eq!(snapshot.trends.daily_data.len(), 30);
    }
}
