//! Symptom dataset.
//!
//! The remedy dataset is a CSV file with a header row naming the columns
//! `symptom, remedies, description, usage, precautions, image_url`. Only
//! `symptom` and `remedies` are required; the others fall back to an empty
//! string. `remedies` is itself a `;` separated list.
//!
//! The table is built once at startup and never written to afterwards, so it
//! can be shared by reference between request handlers without locking.

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;

pub const COL_SYMPTOM: &str = "symptom";
pub const COL_REMEDIES: &str = "remedies";
pub const COL_DESCRIPTION: &str = "description";
pub const COL_USAGE: &str = "usage";
pub const COL_PRECAUTIONS: &str = "precautions";
pub const COL_IMAGE_URL: &str = "image_url";

const REMEDY_DELIMITER: char = ';';

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// Everything the dataset knows about one symptom keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemedyRecord {
    pub symptom: String,
    pub remedies: Vec<String>,
    pub description: String,
    pub usage: String,
    pub precautions: String,
    pub image_url: String,
}

/// Symptom keyword to remedy lookup, iterated in load order.
#[derive(Debug, Default)]
pub struct SymptomTable {
    records: Vec<RemedyRecord>,
    index: HashMap<String, usize>,
}

struct Columns {
    symptom: usize,
    remedies: usize,
    description: Option<usize>,
    usage: Option<usize>,
    precautions: Option<usize>,
    image_url: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, DatasetError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        Ok(Self {
            symptom: find(COL_SYMPTOM).ok_or(DatasetError::MissingColumn(COL_SYMPTOM))?,
            remedies: find(COL_REMEDIES).ok_or(DatasetError::MissingColumn(COL_REMEDIES))?,
            description: find(COL_DESCRIPTION),
            usage: find(COL_USAGE),
            precautions: find(COL_PRECAUTIONS),
            image_url: find(COL_IMAGE_URL),
        })
    }
}

fn cell(record: &StringRecord, column: Option<usize>) -> String {
    column
        .and_then(|idx| record.get(idx))
        .unwrap_or_default()
        .to_string()
}

pub fn normalize_symptom(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn split_remedies(raw: &str) -> Vec<String> {
    raw.split(REMEDY_DELIMITER)
        .map(|r| r.trim().to_string())
        .collect()
}

impl SymptomTable {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let now = Instant::now();
        info!("[Dataset] Loading remedies from {:?}", path);
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        info!(
            "[Dataset] Loaded {} symptoms in {} ms.",
            table.len(),
            now.elapsed().as_millis()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        let columns = Columns::from_headers(&headers)?;

        let mut table = SymptomTable::default();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let symptom = normalize_symptom(record.get(columns.symptom).unwrap_or_default());

            // An empty key is a substring of every input.
            if symptom.is_empty() {
                warn!("[Dataset] Row {} has no symptom. Skipping...", row + 1);
                continue;
            }

            table.insert(RemedyRecord {
                symptom,
                remedies: split_remedies(record.get(columns.remedies).unwrap_or_default()),
                description: cell(&record, columns.description),
                usage: cell(&record, columns.usage),
                precautions: cell(&record, columns.precautions),
                image_url: cell(&record, columns.image_url),
            });
        }

        Ok(table)
    }

    /// A repeated symptom replaces the earlier row but keeps its position.
    pub fn insert(&mut self, record: RemedyRecord) {
        match self.index.get(&record.symptom) {
            Some(&idx) => {
                debug!("[Dataset] Duplicate symptom '{}', keeping last row", record.symptom);
                self.records[idx] = record;
            }
            None => {
                self.index.insert(record.symptom.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, symptom: &str) -> Option<&RemedyRecord> {
        self.index.get(symptom).map(|&idx| &self.records[idx])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.symptom.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
