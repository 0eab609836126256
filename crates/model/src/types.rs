//! Client-side validation types.
//!
//! [`ValidationOutcome`] keeps the backend's field names on the wire
//! (a mix of snake_case and camelCase). [`HistoryEntry`] is the client's
//! own vocabulary and is only ever built through the mapping in
//! [`crate::wire`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Read a string field that the backend may send as `null`.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Verdict of a single validation attempt.
///
/// Only `"granted"` grants access; every other result string reads as denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessResult {
    Granted,
    Denied,
}

impl AccessResult {
    pub fn from_result(result: &str) -> Self {
        if result == "granted" {
            AccessResult::Granted
        } else {
            AccessResult::Denied
        }
    }

    pub fn is_granted(self) -> bool {
        matches!(self, AccessResult::Granted)
    }
}

impl<'de> Deserialize<'de> for AccessResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = null_as_empty(deserializer)?;
        Ok(AccessResult::from_result(&raw))
    }
}

impl fmt::Display for AccessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessResult::Granted => write!(f, "granted"),
            AccessResult::Denied => write!(f, "denied"),
        }
    }
}

/// Address details of the resident's home, when the backend sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeDetails {
    #[serde(rename = "plotNumber", default, skip_serializing_if = "Option::is_none")]
    pub plot_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
}

/// Result of one validation attempt, as returned by the backend.
///
/// Replaced wholesale on every new attempt; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub result: AccessResult,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    /// The code exactly as it was submitted.
    pub code: String,
    #[serde(rename = "accessCodeId", default, deserialize_with = "null_as_empty")]
    pub access_code_id: String,
    #[serde(rename = "residentId", default, deserialize_with = "null_as_empty")]
    pub resident_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub validated_at: String,

    // Display data; older backends omit these.
    #[serde(rename = "visitorName", default, skip_serializing_if = "Option::is_none")]
    pub visitor_name: Option<String>,
    #[serde(rename = "residentName", default, skip_serializing_if = "Option::is_none")]
    pub resident_name: Option<String>,
    #[serde(rename = "homeDetails", default, skip_serializing_if = "Option::is_none")]
    pub home_details: Option<HomeDetails>,
}

/// Display status of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryStatus {
    Granted,
    Denied,
}

impl HistoryStatus {
    /// Map a backend result string onto a display status.
    ///
    /// Only the exact value `"granted"` counts as granted.
    pub fn from_result(result: &str) -> Self {
        match AccessResult::from_result(result) {
            AccessResult::Granted => HistoryStatus::Granted,
            AccessResult::Denied => HistoryStatus::Denied,
        }
    }
}

impl fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryStatus::Granted => write!(f, "GRANTED"),
            HistoryStatus::Denied => write!(f, "DENIED"),
        }
    }
}

/// One past validation in the officer's recent log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub code: String,
    pub status: HistoryStatus,
    pub visitor_name: String,
    pub resident_name: String,
    pub home: String,
    pub validated_at: String,
}

/// Recent validations, newest first as ordered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
}
