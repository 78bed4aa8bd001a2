use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::{
    error::{RosterError, RosterResult},
    model::Employee,
};

/// Dataset compiled into the binary, used when no path is configured.
pub const BUNDLED_DATASET: &str = include_str!("../data/employees.json");

/// The on-disk document: `{ "employees": [...] }`.
#[derive(Clone, Debug, Deserialize)]
pub struct Dataset {
    pub employees: Vec<Employee>,
}

impl Dataset {
    pub fn from_json_str(raw: &str) -> RosterResult<Self> {
        serde_json::from_str(raw).map_err(RosterError::from)
    }

    pub fn from_path(path: &Path) -> RosterResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&raw)?;
        info!(path = %path.display(), employees = dataset.employees.len(), "dataset loaded");
        Ok(dataset)
    }

    pub fn bundled() -> RosterResult<Self> {
        Self::from_json_str(BUNDLED_DATASET)
    }

    /// Loads `path` when given, the bundled dataset otherwise.
    pub fn load(path: Option<&Path>) -> RosterResult<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path() {
        let err = Dataset::from_path(Path::new("/nonexistent/employees.json")).unwrap_err();
        assert!(matches!(err, RosterError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/employees.json"));
    }

    #[test]
    fn malformed_document_is_rejected() {
        let err = Dataset::from_json_str(r#"{"employees": {}}"#).unwrap_err();
        assert!(matches!(err, RosterError::Parse(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn loosely_typed_records_still_load() {
        let dataset = Dataset::from_json_str(
            r#"{"employees":[{"employee_id":"E1","email":"a@x.com","is_manager":1,"manager":null,"reservations":[{"seat_numbers":7}]}]}"#,
        )
        .unwrap();
        assert_eq!(dataset.employees.len(), 1);
        assert!(!dataset.employees[0].is_manager());
    }

    #[test]
    fn load_without_path_uses_bundled_data() {
        let dataset = Dataset::load(None).unwrap();
        assert_eq!(dataset.employees.len(), 30);
        assert_eq!(dataset.employees[0].employee_id(), Some("EMP001"));
    }
}
