//! Wire and in-memory types for waiting lists and their entries.
//! Field names follow the service's camelCase JSON.
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Ordering key of a waiting entry. Only relative order matters.
pub type Position = i64;

/// Service-assigned identifier. Older service builds send numeric ids,
/// so both JSON strings and numbers are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        EntryId(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        EntryId(s)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        string_or_number(deserializer).map(EntryId)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum EntryStatus {
    Waiting,
    Completed,
}

impl EntryStatus {
    /// Primary display sort key: waiting entries always come first.
    pub fn rank(self) -> u8 {
        match self {
            EntryStatus::Waiting => 0,
            EntryStatus::Completed => 1,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == EntryStatus::Completed
    }
}

impl TryFrom<String> for EntryStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "WAITING" => Ok(EntryStatus::Waiting),
            "COMPLETED" => Ok(EntryStatus::Completed),
            _ => Err(format!("unknown entry status: {}", value)),
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryStatus::Waiting => "WAITING",
            EntryStatus::Completed => "COMPLETED",
        })
    }
}

/// One walk-in on a day's waiting list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub puppy_name: String,
    pub owner_name: String,
    #[serde(alias = "serviceRequired")]
    pub service: String,
    pub arrival_time: DateTime<Utc>,
    pub status: EntryStatus,
    pub position: Position,
}

impl Entry {
    /// Two-phase display key: status rank first, then position.
    pub fn display_key(&self) -> (u8, Position) {
        (self.status.rank(), self.position)
    }

    pub fn is_waiting(&self) -> bool {
        self.status == EntryStatus::Waiting
    }
}

/// A calendar day's list as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingList {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Payload for adding a walk-in. Id, position and status are assigned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub puppy_name: String,
    pub owner_name: String,
    pub service: String,
    pub arrival_time: DateTime<Utc>,
}

impl NewEntry {
    /// Trim every text field and reject blank ones.
    pub fn normalized(self) -> Result<Self, String> {
        let puppy_name = required("puppy name", self.puppy_name)?;
        let owner_name = required("owner name", self.owner_name)?;
        let service = required("service", self.service)?;
        Ok(NewEntry {
            puppy_name,
            owner_name,
            service,
            arrival_time: self.arrival_time,
        })
    }
}

fn required(field: &str, value: String) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(trimmed.to_string())
}

/// History lookup by name (puppy or owner) and/or day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl SearchQuery {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self
                .name
                .as_deref()
                .map(|n| n.trim().is_empty())
                .unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub date: NaiveDate,
    pub entry: Entry,
}

/// Common names offered while typing a new walk-in.
pub const PUPPY_NAMES: &[&str] = &[
    "Max", "Bella", "Charlie", "Luna", "Lucy", "Cooper", "Bailey", "Daisy", "Sadie", "Molly",
    "Buddy", "Rocky", "Maggie", "Bear", "Sophie", "Tucker", "Coco", "Ruby", "Duke", "Milo",
];

/// Case-insensitive prefix match against [`PUPPY_NAMES`].
pub fn suggest_names(prefix: &str) -> Vec<&'static str> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Vec::new();
    }
    PUPPY_NAMES
        .iter()
        .copied()
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json(status: &str) -> serde_json::Value {
        json!({
            "id": 17,
            "puppyName": "Luna",
            "ownerName": "Ada",
            "serviceRequired": "Full groom",
            "arrivalTime": "2026-03-02T09:15:00Z",
            "status": status,
            "position": 3
        })
    }

    #[test]
    fn test_entry_accepts_numeric_id_and_lowercase_status() {
        let entry: Entry = serde_json::from_value(sample_json("waiting")).unwrap();
        assert_eq!(entry.id, EntryId::from("17"));
        assert_eq!(entry.status, EntryStatus::Waiting);
        assert_eq!(entry.service, "Full groom");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result: Result<Entry, _> = serde_json::from_value(sample_json("cancelled"));
        assert!(result.is_err());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let value = serde_json::to_value(EntryStatus::Completed).unwrap();
        assert_eq!(value, json!("COMPLETED"));
    }

    #[test]
    fn test_display_key_puts_completed_last() {
        let mut waiting: Entry = serde_json::from_value(sample_json("WAITING")).unwrap();
        let mut done = waiting.clone();
        waiting.position = 50;
        done.position = 1;
        done.status = EntryStatus::Completed;
        assert!(waiting.display_key() < done.display_key());
    }

    #[test]
    fn test_new_entry_normalized() {
        let entry = NewEntry {
            puppy_name: "  Milo ".to_string(),
            owner_name: "Grace".to_string(),
            service: " Bath".to_string(),
            arrival_time: Utc::now(),
        };
        let normalized = entry.normalized().unwrap();
        assert_eq!(normalized.puppy_name, "Milo");
        assert_eq!(normalized.service, "Bath");

        let blank = NewEntry {
            puppy_name: "Milo".to_string(),
            owner_name: "   ".to_string(),
            service: "Bath".to_string(),
            arrival_time: Utc::now(),
        };
        assert!(blank.normalized().unwrap_err().contains("owner name"));
    }

    #[test]
    fn test_search_query_is_empty() {
        assert!(SearchQuery::default().is_empty());
        assert!(SearchQuery {
            name: Some("  ".to_string()),
            date: None
        }
        .is_empty());
        assert!(!SearchQuery {
            name: Some("lu".to_string()),
            date: None
        }
        .is_empty());
    }

    #[test]
    fn test_suggest_names() {
        assert_eq!(suggest_names("lu"), vec!["Luna", "Lucy"]);
        assert_eq!(suggest_names("BU"), vec!["Buddy"]);
        assert!(suggest_names("").is_empty());
    }
}
