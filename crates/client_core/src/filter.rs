//! Filter reconciliation: dropdown state and stat-card selection folded into
//! the single query sent to the server.

use std::{fmt, str::FromStr};

use shared::{
    domain::{DocumentStatus, DocumentType, Priority},
    error::UnknownVariant,
    protocol::DocumentQuery,
};

const URGENT_PRIORITIES: [Priority; 2] = [Priority::High, Priority::Critical];

/// Options of the status dropdown. The empty option ("All Statuses") is `None`
/// in [`FilterState::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    Unreviewed,
    /// Same predicate as `Unreviewed`, offered under its own label.
    New,
    Urgent,
    Flagged,
    Reviewed,
    Dismissed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 6] = [
        StatusFilter::Unreviewed,
        StatusFilter::Urgent,
        StatusFilter::New,
        StatusFilter::Flagged,
        StatusFilter::Reviewed,
        StatusFilter::Dismissed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unreviewed => "unreviewed",
            Self::New => "new",
            Self::Urgent => "urgent",
            Self::Flagged => "flagged",
            Self::Reviewed => "reviewed",
            Self::Dismissed => "dismissed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unreviewed => "Unreviewed",
            Self::New => "New (No Action)",
            Self::Urgent => "Urgent Only",
            Self::Flagged => "Flagged",
            Self::Reviewed => "Reviewed",
            Self::Dismissed => "Dismissed",
        }
    }

    fn predicate(self) -> Predicate {
        match self {
            Self::Unreviewed | Self::New => Predicate::Status(DocumentStatus::Classified),
            Self::Urgent => Predicate::UrgentPriority,
            Self::Flagged => Predicate::Status(DocumentStatus::Flagged),
            Self::Reviewed => Predicate::Status(DocumentStatus::Reviewed),
            Self::Dismissed => Predicate::Status(DocumentStatus::Dismissed),
        }
    }

    /// Stat card that reads as selected while this dropdown option is chosen
    /// with no type filter.
    fn equivalent_card(self) -> Option<StatFilterKey> {
        match self {
            Self::Unreviewed => Some(StatFilterKey::Unreviewed),
            Self::New | Self::Urgent | Self::Flagged | Self::Reviewed | Self::Dismissed => None,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant::new("status filter", s))
    }
}

/// Quick filters shown as stat cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatFilterKey {
    Total,
    Unreviewed,
    Urgent,
    Reviewed,
    Flagged,
}

impl StatFilterKey {
    pub const ALL: [StatFilterKey; 5] = [
        StatFilterKey::Total,
        StatFilterKey::Unreviewed,
        StatFilterKey::Urgent,
        StatFilterKey::Reviewed,
        StatFilterKey::Flagged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Unreviewed => "unreviewed",
            Self::Urgent => "urgent",
            Self::Reviewed => "reviewed",
            Self::Flagged => "flagged",
        }
    }

    fn predicate(self) -> Predicate {
        match self {
            Self::Total => Predicate::Any,
            Self::Unreviewed => Predicate::Status(DocumentStatus::Classified),
            Self::Urgent => Predicate::UrgentPriority,
            Self::Reviewed => Predicate::Status(DocumentStatus::Reviewed),
            Self::Flagged => Predicate::Status(DocumentStatus::Flagged),
        }
    }
}

impl fmt::Display for StatFilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatFilterKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant::new("stat filter", s))
    }
}

/// The two dropdown controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    pub document_type: Option<DocumentType>,
    pub status: Option<StatusFilter>,
}

impl FilterState {
    /// Both dropdowns on their "All" option.
    pub const fn empty() -> Self {
        Self {
            document_type: None,
            status: None,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for FilterState {
    /// Unreviewed documents of every type.
    fn default() -> Self {
        Self {
            document_type: None,
            status: Some(StatusFilter::Unreviewed),
        }
    }
}

/// Which control decides the status/priority predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySource {
    AllDocuments,
    ByStat(StatFilterKey),
    ByDropdown(StatusFilter),
}

impl QuerySource {
    /// A selected stat card always wins over the status dropdown.
    pub fn resolve(filters: &FilterState, stat_filter: Option<StatFilterKey>) -> Self {
        match (stat_filter, filters.status) {
            (Some(StatFilterKey::Total), _) => Self::AllDocuments,
            (Some(key), _) => Self::ByStat(key),
            (None, Some(status)) => Self::ByDropdown(status),
            (None, None) => Self::AllDocuments,
        }
    }

    fn predicate(self) -> Predicate {
        match self {
            Self::AllDocuments => Predicate::Any,
            Self::ByStat(key) => key.predicate(),
            Self::ByDropdown(status) => status.predicate(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Predicate {
    Any,
    Status(DocumentStatus),
    UrgentPriority,
}

impl Predicate {
    fn apply(self, query: DocumentQuery) -> DocumentQuery {
        match self {
            Self::Any => query,
            Self::Status(status) => query.with_status(status),
            Self::UrgentPriority => query.with_priorities(&URGENT_PRIORITIES),
        }
    }
}

pub fn reconcile(filters: &FilterState, stat_filter: Option<StatFilterKey>) -> DocumentQuery {
    QuerySource::resolve(filters, stat_filter)
        .predicate()
        .apply(DocumentQuery::default())
        .with_document_type(filters.document_type)
}

/// Card drawn as selected: the explicitly chosen one, otherwise the card whose
/// meaning the dropdowns currently reproduce.
pub fn active_card(
    filters: &FilterState,
    stat_filter: Option<StatFilterKey>,
) -> Option<StatFilterKey> {
    if stat_filter.is_some() {
        return stat_filter;
    }
    if filters.document_type.is_some() {
        return None;
    }
    filters.status.and_then(StatusFilter::equivalent_card)
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
