//! Bulk roster import and export
//!
//! The exchange document is a JSON object keyed by individual name whose
//! values are `{ "name", "k", "score" }` records. Imports are validated in full
//! before anything is handed back, so a rejected document never touches the
//! roster.

use crate::error::ImportError;
use crate::types::{Individual, IndividualId};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// The full name-keyed roster
pub type Roster = HashMap<IndividualId, Individual>;

/// Serialize the whole roster, without filtering
pub fn export_roster(roster: &Roster) -> serde_json::Result<String> {
    serde_json::to_string(roster)
}

/// Read the text of an import document chosen by the caller
pub fn read_import_file(path: Option<&Path>) -> Result<String, ImportError> {
    let path = path.ok_or(ImportError::FileNotSelected)?;
    std::fs::read_to_string(path).map_err(|e| ImportError::Unreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Parse and validate an import document
pub fn parse_roster(text: &str) -> Result<Roster, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    validate_roster(&value)
}

/// Validate an already-parsed import document
pub fn validate_roster(value: &Value) -> Result<Roster, ImportError> {
    let records = value.as_object().ok_or(ImportError::NotAnObject)?;

    records
        .iter()
        .map(|(key, record)| {
            let individual = validate_record(key, record)?;
            Ok((key.clone(), individual))
        })
        .collect()
}

fn validate_record(key: &str, record: &Value) -> Result<Individual, ImportError> {
    let fields = record
        .as_object()
        .ok_or_else(|| ImportError::RecordNotAnObject {
            key: key.to_string(),
        })?;

    let name = field(key, fields, "name")?
        .as_str()
        .ok_or_else(|| ImportError::TypeMismatch {
            key: key.to_string(),
            field: "name",
        })?;
    let learning_rate = number_field(key, fields, "k")?;
    let rating = number_field(key, fields, "score")?;

    if name != key {
        return Err(ImportError::NameMismatch {
            key: key.to_string(),
            name: name.to_string(),
        });
    }

    Ok(Individual::new(name, rating, learning_rate))
}

fn field<'a>(
    key: &str,
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ImportError> {
    fields.get(field).ok_or_else(|| ImportError::MissingField {
        key: key.to_string(),
        field,
    })
}

fn number_field(
    key: &str,
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<f64, ImportError> {
    field(key, fields, name)?
        .as_f64()
        .ok_or_else(|| ImportError::TypeMismatch {
            key: key.to_string(),
            field: name,
        })
}
