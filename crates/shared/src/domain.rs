use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::UnknownVariant;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(DocumentId);

/// Implements `as_str`, `Display` and `FromStr` over the snake_case wire names.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownVariant::new($kind, other)),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    LabResult,
    ReferralResponse,
    PriorAuthDecision,
    PharmacyRequest,
    InsuranceCorrespondence,
    RecordsRequest,
    MarketingJunk,
    /// Also absorbs type labels this client does not know about.
    #[serde(other)]
    Other,
}

wire_enum!(DocumentType, "document type", {
    LabResult => "lab_result",
    ReferralResponse => "referral_response",
    PriorAuthDecision => "prior_auth_decision",
    PharmacyRequest => "pharmacy_request",
    InsuranceCorrespondence => "insurance_correspondence",
    RecordsRequest => "records_request",
    MarketingJunk => "marketing_junk",
    Other => "other",
});

impl DocumentType {
    pub const ALL: [DocumentType; 8] = [
        DocumentType::LabResult,
        DocumentType::ReferralResponse,
        DocumentType::PriorAuthDecision,
        DocumentType::PharmacyRequest,
        DocumentType::InsuranceCorrespondence,
        DocumentType::RecordsRequest,
        DocumentType::MarketingJunk,
        DocumentType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LabResult => "Lab Result",
            Self::ReferralResponse => "Referral Response",
            Self::PriorAuthDecision => "Prior Auth Decision",
            Self::PharmacyRequest => "Pharmacy Request",
            Self::InsuranceCorrespondence => "Insurance Correspondence",
            Self::RecordsRequest => "Records Request",
            Self::MarketingJunk => "Marketing / Junk",
            Self::Other => "Needs Review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Uploaded, classification not finished yet.
    Pending,
    /// Classification running. Left in place if the classifier crashes.
    Processing,
    Classified,
    Reviewed,
    Flagged,
    Dismissed,
    /// Classification failed on the server.
    Error,
    /// Any status label this client does not know about.
    #[serde(other)]
    Unknown,
}

wire_enum!(DocumentStatus, "document status", {
    Pending => "pending",
    Processing => "processing",
    Classified => "classified",
    Reviewed => "reviewed",
    Flagged => "flagged",
    Dismissed => "dismissed",
    Error => "error",
    Unknown => "unknown",
});

impl DocumentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Classified => "UNREVIEWED",
            Self::Reviewed => "REVIEWED",
            Self::Flagged => "FLAGGED",
            Self::Dismissed => "DISMISSED",
            Self::Error => "ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Statuses an operator normally moves a document to from `self`.
    ///
    /// The server stays authoritative; anything outside this table is still a
    /// legal operator request, just not part of the usual triage flow.
    pub fn forward_targets(self) -> &'static [DocumentStatus] {
        match self {
            Self::Classified => &[Self::Reviewed, Self::Flagged, Self::Dismissed],
            Self::Flagged => &[Self::Reviewed, Self::Dismissed],
            Self::Pending
            | Self::Processing
            | Self::Reviewed
            | Self::Dismissed
            | Self::Error
            | Self::Unknown => &[],
        }
    }

    pub fn is_forward_transition(self, to: DocumentStatus) -> bool {
        self.forward_targets().contains(&to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    None,
    #[serde(other)]
    Unknown,
}

wire_enum!(Priority, "priority", {
    Critical => "critical",
    High => "high",
    Medium => "medium",
    Low => "low",
    None => "none",
    Unknown => "unknown",
});

impl Priority {
    /// Severity rank used for ordering; lower is more severe.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::None => 4,
            Self::Unknown => 99,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::None | Self::Unknown => "None",
        }
    }

    pub fn is_urgent(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    IncompleteDocument,
    PossiblyMisdirected,
    MultiDocumentBundle,
    #[serde(other)]
    Unknown,
}

impl Flag {
    /// Badge text, `None` for flags that are never shown.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::IncompleteDocument => Some("INCOMPLETE"),
            Self::PossiblyMisdirected => Some("MISDIRECTED"),
            Self::MultiDocumentBundle => Some("BUNDLE"),
            Self::Unknown => None,
        }
    }
}

/// Fields pulled out by the classifier. The server passes the model output
/// through untyped, so every field decodes leniently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, deserialize_with = "lenient_text")]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub patient_dob: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sending_provider: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sending_facility: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fax_origin_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub document_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub urgency_indicators: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub key_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    #[serde(default)]
    pub file_path: Option<String>,
    pub upload_time: String,
    #[serde(default)]
    pub page_count: Option<u32>,
    pub status: DocumentStatus,
    /// Type label exactly as the server sent it; see [`Document::known_type`].
    #[serde(default, deserialize_with = "lenient_text")]
    pub document_type: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "lenient_fields")]
    pub extracted_fields: Option<ExtractedFields>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flags: Vec<Flag>,
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<String>,
}

impl Document {
    /// Classified type; labels this client does not know map to `Other`.
    pub fn known_type(&self) -> Option<DocumentType> {
        self.document_type
            .as_deref()
            .map(|raw| raw.parse().unwrap_or(DocumentType::Other))
    }

    pub fn patient_name(&self) -> Option<&str> {
        self.extracted_fields
            .as_ref()
            .and_then(|fields| fields.patient_name.as_deref())
    }

    pub fn sending_facility(&self) -> Option<&str> {
        self.extracted_fields
            .as_ref()
            .and_then(|fields| fields.sending_facility.as_deref())
    }

    pub fn urgency_indicators(&self) -> &[String] {
        self.extracted_fields
            .as_ref()
            .map(|fields| fields.urgency_indicators.as_slice())
            .unwrap_or_default()
    }

    /// Classifier confidence clamped into `[0, 1]`.
    pub fn confidence(&self) -> Option<f64> {
        self.confidence
            .filter(|value| !value.is_nan())
            .map(|value| value.clamp(0.0, 1.0))
    }

    /// Parsed upload instant. The server emits naive UTC timestamps without an
    /// offset, so those are read as UTC.
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.upload_time)
    }

    /// Known flags in badge order, without duplicates.
    pub fn display_flags(&self) -> Vec<Flag> {
        let mut flags: Vec<Flag> = self
            .flags
            .iter()
            .copied()
            .filter(|flag| flag.label().is_some())
            .collect();
        flags.sort();
        flags.dedup();
        flags
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(text_of).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(Value::deserialize(deserializer)?))
}

fn lenient_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(text_of).collect(),
        other => text_of(other).into_iter().collect(),
    })
}

/// Anything other than an object is treated as "nothing extracted".
fn lenient_fields<'de, D>(deserializer: D) -> Result<Option<ExtractedFields>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
