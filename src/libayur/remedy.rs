//! Symptom extraction and remedy resolution for free-text queries.
//!
//! Matching is a plain substring test of every known keyword against the
//! lowercased input. There is no tokenization, so a short keyword inside an
//! unrelated word (`"flu"` in `"fluent"`) is reported as a match.

use log::debug;
use serde::Serialize;

use crate::dataset::{RemedyRecord, SymptomTable};

pub const SUCCESS_MESSAGE: &str = "Here are your Ayurvedic remedy details.";
pub const FAIL_MESSAGE: &str = "Sorry, I could not find a specific remedy for your symptoms. \
Please try to describe symptoms clearly or consult an Ayurvedic practitioner.";

/// Body of `POST /query`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryResponse<'a> {
    Success {
        message: &'static str,
        data: Vec<&'a RemedyRecord>,
    },
    Fail {
        message: &'static str,
        data: Vec<&'a RemedyRecord>,
    },
}

impl<'a> QueryResponse<'a> {
    pub fn from_records(records: Vec<&'a RemedyRecord>) -> Self {
        if records.is_empty() {
            QueryResponse::Fail {
                message: FAIL_MESSAGE,
                data: Vec::new(),
            }
        } else {
            QueryResponse::Success {
                message: SUCCESS_MESSAGE,
                data: records,
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryResponse::Success { .. })
    }

    pub fn data(&self) -> &[&'a RemedyRecord] {
        match self {
            QueryResponse::Success { data, .. } | QueryResponse::Fail { data, .. } => data,
        }
    }
}

/// Keywords of `table` occurring in `text`, in table order.
pub fn extract_symptoms<'t>(table: &'t SymptomTable, text: &str) -> Vec<&'t str> {
    let text = text.to_lowercase();
    table.keys().filter(|key| text.contains(*key)).collect()
}

/// Records for `symptoms` in the given order. Unknown keywords are skipped.
pub fn resolve<'t, S: AsRef<str>>(
    table: &'t SymptomTable,
    symptoms: &[S],
) -> Vec<&'t RemedyRecord> {
    symptoms
        .iter()
        .filter_map(|symptom| table.get(symptom.as_ref()))
        .collect()
}

pub fn answer_query<'t>(table: &'t SymptomTable, text: &str) -> QueryResponse<'t> {
    let symptoms = extract_symptoms(table, text);
    debug!("[Query] Extracted symptoms {:?}", symptoms);

    QueryResponse::from_records(resolve(table, &symptoms[..]))
}
