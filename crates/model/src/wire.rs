//! Backend record shapes and their mapping into client types.
//!
//! History rows arrive in snake_case (`visitor_name`, `validated_at`)
//! with a lowercase `result`. The conversions here are the only place
//! that translation happens.

use serde::{Deserialize, Serialize};

use crate::types::{null_as_empty, HistoryEntry, HistoryPage, HistoryStatus};

/// One row of `GET /security/recent-validations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentValidationRecord {
    pub id: String,
    pub code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub result: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub visitor_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resident_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub home: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub validated_at: String,
}

/// Success payload of `GET /security/recent-validations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentValidationsPayload {
    #[serde(default)]
    pub validations: Vec<RecentValidationRecord>,
}

impl From<RecentValidationRecord> for HistoryEntry {
    fn from(record: RecentValidationRecord) -> Self {
        HistoryEntry {
            status: HistoryStatus::from_result(&record.result),
            id: record.id,
            code: record.code,
            visitor_name: record.visitor_name,
            resident_name: record.resident_name,
            home: record.home,
            validated_at: record.validated_at,
        }
    }
}

impl From<RecentValidationsPayload> for HistoryPage {
    fn from(payload: RecentValidationsPayload) -> Self {
        HistoryPage {
            entries: payload.validations.into_iter().map(HistoryEntry::from).collect(),
        }
    }
}
