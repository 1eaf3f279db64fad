//! agentlens-core - Core library for agentlens
//!
//! Provides the analytics models, HTTP client, fetch coordinator, snapshot
//! store and derivation helpers behind the dashboard.

pub mod client;
pub mod error;
pub mod event;
pub mod insights;
pub mod models;
pub mod poller;
pub mod store;

pub use client::AnalyticsClient;
pub use error::CoreError;
pub use event::{DataEvent, EventBus};
pub use models::{AnalyticsSnapshot, TrailingWindow, TrendDirection};
pub use poller::{PollParams, Poller, PollerConfig};
pub use store::SnapshotStore;
