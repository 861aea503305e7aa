use crate::utils::date::deserialize_opt_date;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Stage identifier as the timeline widget expects it.
/// The backend sends numeric ids; fixtures and other sources may use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageId(String);

impl StageId {
    pub fn new(id: impl Into<String>) -> Self {
        StageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Serialize for StageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(StageId(s)),
            Raw::Number(n) => Ok(StageId(n.to_string())),
        }
    }
}

/// Stage health as computed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageStatus {
    Good,
    Warning,
    AtRisk,
}

impl StageStatus {
    pub const ALL: [StageStatus; 3] = [StageStatus::Good, StageStatus::Warning, StageStatus::AtRisk];

    /// Label used on the wire and in tables
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Good => "Good",
            StageStatus::Warning => "Warning",
            StageStatus::AtRisk => "At Risk",
        }
    }

    /// Parse a wire label or a command-line spelling (`at-risk`, `AT_RISK`, ...)
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        match normalized.as_str() {
            "good" => Some(StageStatus::Good),
            "warning" => Some(StageStatus::Warning),
            "atrisk" => Some(StageStatus::AtRisk),
            _ => None,
        }
    }
}

impl Serialize for StageStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Unknown labels deserialize to `None` rather than failing the whole overview.
fn deserialize_opt_status<'de, D>(deserializer: D) -> Result<Option<StageStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(StageStatus::from_str))
}

// Decimal columns arrive as strings ("37.50"); plain numbers are accepted too.
fn deserialize_opt_progress<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let progress = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid progress: '{}'", s)))?,
    };
    Ok(Some(progress))
}

/// One stage of a project timeline, as returned by the stages overview endpoint.
///
/// `progress` is on a 0-100 scale everywhere in this crate. Records may break
/// the `start <= end` and `0..=100` invariants; the widget layer reports those
/// as warnings instead of rejecting the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    #[serde(default, alias = "startDate", deserialize_with = "deserialize_opt_date")]
    pub start: Option<NaiveDate>,
    #[serde(default, alias = "endDate", deserialize_with = "deserialize_opt_date")]
    pub end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_opt_progress")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_status")]
    pub status: Option<StageStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_date")]
    pub actual_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_date")]
    pub actual_end_date: Option<NaiveDate>,
}

impl Stage {
    /// Create a planned stage with no optional attributes
    pub fn new(id: &str, name: &str, start: NaiveDate, end: NaiveDate, progress: f64) -> Self {
        Self {
            id: StageId::new(id),
            name: name.to_string(),
            start: Some(start),
            end: Some(end),
            progress: Some(progress),
            dependencies: None,
            display_order: None,
            status: None,
            actual_start_date: None,
            actual_end_date: None,
        }
    }

    /// Progress on the 0-100 scale, missing treated as not started
    pub fn progress(&self) -> f64 {
        self.progress.unwrap_or(0.0)
    }

    /// Ids listed in the comma-joined dependency field
    pub fn dependency_ids(&self) -> Vec<&str> {
        self.dependencies
            .as_deref()
            .map(|deps| {
                deps.split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Partial stage update sent with `PUT /task-workflow/stages/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_end_date: Option<NaiveDate>,
}

impl StageUpdate {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.actual_start_date.is_none()
            && self.actual_end_date.is_none()
    }
}
