//! Stat cards projected from the server's global summary.
//!
//! Counts always come from `/stats/summary`, never from the filtered page, so a
//! narrowed list still shows whole-queue totals.

use shared::{
    domain::{DocumentStatus, Priority},
    protocol::StatsSummary,
};

use crate::filter::StatFilterKey;

/// Shown in place of a value that is not known.
pub const PLACEHOLDER: &str = "—";

const HIGH_CONFIDENCE: f64 = 0.85;
const MEDIUM_CONFIDENCE: f64 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    Filter(StatFilterKey),
    AvgConfidence,
}

impl CardKind {
    pub const ALL: [CardKind; 6] = [
        CardKind::Filter(StatFilterKey::Total),
        CardKind::Filter(StatFilterKey::Unreviewed),
        CardKind::Filter(StatFilterKey::Urgent),
        CardKind::Filter(StatFilterKey::Reviewed),
        CardKind::Filter(StatFilterKey::Flagged),
        CardKind::AvgConfidence,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Filter(StatFilterKey::Total) => "Total Faxes",
            Self::Filter(StatFilterKey::Unreviewed) => "Unreviewed",
            Self::Filter(StatFilterKey::Urgent) => "Urgent",
            Self::Filter(StatFilterKey::Reviewed) => "Reviewed",
            Self::Filter(StatFilterKey::Flagged) => "Flagged",
            Self::AvgConfidence => "Avg Confidence",
        }
    }

    pub fn filter_key(self) -> Option<StatFilterKey> {
        match self {
            Self::Filter(key) => Some(key),
            Self::AvgConfidence => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub kind: CardKind,
    pub label: &'static str,
    pub value: String,
    pub clickable: bool,
    pub active: bool,
}

/// Card values in display order. `stats` is `None` until the first summary
/// has loaded.
pub fn aggregate(stats: Option<&StatsSummary>, active: Option<StatFilterKey>) -> Vec<StatCard> {
    CardKind::ALL
        .into_iter()
        .map(|kind| StatCard {
            kind,
            label: kind.label(),
            value: card_value(stats, kind),
            clickable: kind.filter_key().is_some(),
            active: active.is_some() && kind.filter_key() == active,
        })
        .collect()
}

pub fn card_value(stats: Option<&StatsSummary>, kind: CardKind) -> String {
    let Some(stats) = stats else {
        return PLACEHOLDER.to_string();
    };
    match kind {
        CardKind::Filter(key) => card_count(stats, key).to_string(),
        CardKind::AvgConfidence => format_confidence(stats.avg_confidence),
    }
}

pub fn card_count(stats: &StatsSummary, key: StatFilterKey) -> u64 {
    match key {
        StatFilterKey::Total => stats.total_documents,
        StatFilterKey::Unreviewed => stats.status_count(DocumentStatus::Classified),
        StatFilterKey::Urgent => {
            stats.priority_count(Priority::High) + stats.priority_count(Priority::Critical)
        }
        StatFilterKey::Reviewed => stats.status_count(DocumentStatus::Reviewed),
        StatFilterKey::Flagged => stats.status_count(DocumentStatus::Flagged),
    }
}

/// Whole percent, or the placeholder when unknown.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence.filter(|value| value.is_finite()) {
        Some(value) => format!("{}%", (value * 100.0).round() as i64),
        None => PLACEHOLDER.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn of(confidence: f64) -> Self {
        if confidence >= HIGH_CONFIDENCE {
            Self::High
        } else if confidence >= MEDIUM_CONFIDENCE {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[cfg(test)]
#[path = "tests/stats_tests.rs"]
mod tests;
