//! Employee roster: immutable records, point lookups, hierarchy filters and
//! the derived seat-occupancy view.
//!
//! The collection is built once from a [`Dataset`] and never mutated; every
//! query borrows from it.

mod dataset;
mod diagnostics;
mod error;
mod model;
mod seats;

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub use crate::{
    dataset::{BUNDLED_DATASET, Dataset},
    diagnostics::{DatasetIssue, MAX_RESERVATIONS},
    error::{RosterError, RosterResult},
    model::{Employee, Reservation},
    seats::{SEAT_RANGE, SeatMap, SeatToken, seat_tokens},
};

/// Read-only view returned by [`Roster::reservations_for`].
/// `reservations` is the stored value; it is omitted when the record has none.
#[derive(Clone, Debug, Serialize)]
pub struct ReservationsView<'a> {
    pub employee_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservations: Option<&'a Value>,
}

/// The in-memory roster. Lookups go through indexes built at construction
/// that keep the first occurrence of each id and email. Records whose id or
/// email is not a string are listed but cannot be looked up by that key.
#[derive(Debug)]
pub struct Roster {
    employees: Vec<Employee>,
    by_id: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
}

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        let mut by_id = HashMap::with_capacity(employees.len());
        let mut by_email = HashMap::with_capacity(employees.len());
        for (idx, employee) in employees.iter().enumerate() {
            if let Some(id) = employee.employee_id() {
                by_id.entry(id.to_string()).or_insert(idx);
            }
            if let Some(email) = employee.email() {
                by_email.entry(email.to_string()).or_insert(idx);
            }
        }
        debug!(employees = employees.len(), "roster indexed");
        Self {
            employees,
            by_id,
            by_email,
        }
    }

    /// Roster backed by the dataset compiled into the binary.
    pub fn bundled() -> RosterResult<Self> {
        Dataset::bundled().map(Self::from)
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn find_by_email(&self, email: &str) -> RosterResult<&Employee> {
        self.by_email
            .get(email)
            .and_then(|idx| self.employees.get(*idx))
            .ok_or_else(|| RosterError::EmailNotFound(email.to_string()))
    }

    pub fn find_by_id(&self, employee_id: &str) -> RosterResult<&Employee> {
        self.by_id
            .get(employee_id)
            .and_then(|idx| self.employees.get(*idx))
            .ok_or_else(|| RosterError::IdNotFound(employee_id.to_string()))
    }

    pub fn reservations_for<'a>(&'a self, employee_id: &'a str) -> RosterResult<ReservationsView<'a>> {
        let employee = self.find_by_id(employee_id)?;
        Ok(ReservationsView {
            employee_id: employee.employee_id().unwrap_or(employee_id),
            reservations: employee.raw_reservations(),
        })
    }

    /// Employees whose `is_manager` is the boolean `true`, in roster order.
    pub fn managers(&self) -> Vec<&Employee> {
        self.employees.iter().filter(|emp| emp.is_manager()).collect()
    }

    /// Employees whose `manager` field equals `manager_email` exactly. The
    /// manager itself does not have to exist in the roster.
    pub fn team_of(&self, manager_email: &str) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|emp| emp.manager() == Some(manager_email))
            .collect()
    }

    pub fn seat_occupancy(&self) -> SeatMap {
        SeatMap::from_reservations(
            self.employees.iter().flat_map(Employee::reservations),
        )
    }

    pub fn diagnostics(&self) -> Vec<DatasetIssue> {
        diagnostics::inspect(&self.employees)
    }
}

impl From<Dataset> for Roster {
    fn from(dataset: Dataset) -> Self {
        Self::new(dataset.employees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roster() -> Roster {
        let dataset = Dataset::from_json_str(
            &json!({
                "employees": [
                    {
                        "employee_id": "E1",
                        "email": "a@x.com",
                        "name": "Ada",
                        "is_manager": true,
                        "manager": "",
                        "reservations": [{ "seat_numbers": "3, 17" }]
                    },
                    {
                        "employee_id": "E2",
                        "email": "b@x.com",
                        "is_manager": false,
                        "manager": "a@x.com",
                        "reservations": []
                    },
                    {
                        "employee_id": "E3",
                        "email": "c@x.com",
                        "is_manager": false,
                        "manager": "a@x.com",
                        "reservations": [
                            { "seat_numbers": "5", "reservation_id": "R1" },
                            { "seat_numbers": "6,7", "reservation_id": "R2" }
                        ]
                    },
                    {
                        "employee_id": "E1",
                        "email": "dup@x.com",
                        "is_manager": true,
                        "manager": "nobody@x.com"
                    }
                ]
            })
            .to_string(),
        )
        .unwrap();
        Roster::from(dataset)
    }

    #[test]
    fn find_by_id_returns_first_match() {
        let roster = roster();
        let employee = roster.find_by_id("E1").unwrap();
        assert_eq!(employee.email(), Some("a@x.com"));
    }

    #[test]
    fn find_by_id_is_exact() {
        let roster = roster();
        let err = roster.find_by_id("e1").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Employee not found");
    }

    #[test]
    fn find_by_email_is_case_sensitive() {
        let roster = roster();
        assert_eq!(
            roster.find_by_email("b@x.com").unwrap().employee_id(),
            Some("E2")
        );
        let err = roster.find_by_email("B@x.com").unwrap_err();
        assert_eq!(err.to_string(), "Employee not found with this email");
    }

    #[test]
    fn reservations_view_preserves_order() {
        let roster = roster();
        let view = roster.reservations_for("E3").unwrap();
        assert_eq!(view.employee_id, "E3");
        let reservations = view.reservations.unwrap();
        assert_eq!(reservations[0]["reservation_id"], json!("R1"));
        assert_eq!(reservations[1]["seat_numbers"], json!("6,7"));
        assert_eq!(reservations.as_array().unwrap().len(), 2);
        assert!(roster.reservations_for("E9").unwrap_err().is_not_found());
    }

    #[test]
    fn managers_keep_roster_order() {
        let roster = roster();
        let emails: Vec<_> = roster.managers().iter().filter_map(|e| e.email()).collect();
        assert_eq!(emails, ["a@x.com", "dup@x.com"]);
    }

    #[test]
    fn team_filters_on_exact_manager_email() {
        let roster = roster();
        let team: Vec<_> = roster
            .team_of("a@x.com")
            .iter()
            .filter_map(|e| e.employee_id())
            .collect();
        assert_eq!(team, ["E2", "E3"]);
        assert!(roster.team_of("A@x.com").is_empty());
        assert!(roster.team_of("ghost@x.com").is_empty());
    }

    #[test]
    fn non_boolean_manager_flags_load_but_are_not_managers() {
        let raw = r#"{"employees":[
            {"employee_id":"E1","email":"a@x.com","is_manager":"true","manager":null},
            {"employee_id":"E2","email":"b@x.com","is_manager":1,"manager":null},
            {"employee_id":"E3","email":"c@x.com","is_manager":true,"manager":null}
        ]}"#;
        let roster = Roster::from(Dataset::from_json_str(raw).unwrap());
        let managers: Vec<_> = roster
            .managers()
            .iter()
            .filter_map(|e| e.employee_id())
            .collect();
        assert_eq!(managers, ["E3"]);
        let flag = roster.find_by_id("E2").unwrap().get("is_manager");
        assert_eq!(flag, Some(&json!(1)));
    }

    #[test]
    fn null_manager_round_trips_and_joins_no_team() {
        let raw = r#"{"employee_id":"E1","email":"a@x.com","is_manager":false,"manager":null,"reservations":[]}"#;
        let roster = Roster::from(Dataset::from_json_str(&format!(r#"{{"employees":[{raw}]}}"#)).unwrap());
        let employee = roster.find_by_id("E1").unwrap();
        assert_eq!(serde_json::to_string(employee).unwrap(), raw);
        assert!(roster.team_of("").is_empty());
    }

    #[test]
    fn missing_reservations_are_omitted_from_view() {
        let roster = roster();
        let view = roster.reservations_for("E1").unwrap();
        assert!(view.reservations.is_some());
        let raw = r#"{"employees":[{"employee_id":"E9","email":"z@x.com"}]}"#;
        let roster = Roster::from(Dataset::from_json_str(raw).unwrap());
        let body = serde_json::to_value(roster.reservations_for("E9").unwrap()).unwrap();
        assert_eq!(body, json!({ "employee_id": "E9" }));
    }

    #[test]
    fn seat_occupancy_marks_every_reserved_seat() {
        let roster = roster();
        let seats = roster.seat_occupancy();
        for seat in [3, 5, 6, 7, 17] {
            assert_eq!(seats.get(seat), Some(true), "seat {seat}");
        }
        assert_eq!(seats.get(4), Some(false));
        assert_eq!(seats.booked().count(), 5);
    }

    #[test]
    fn single_employee_scenario() {
        let dataset = Dataset::from_json_str(
            r#"{"employees":[{"employee_id":"E1","email":"a@x.com","is_manager":true,"manager":"","reservations":[{"seat_numbers":"3, 17"}]}]}"#,
        )
        .unwrap();
        let roster = Roster::from(dataset);
        assert_eq!(roster.find_by_id("E1").unwrap().email(), Some("a@x.com"));
        let seats = roster.seat_occupancy();
        for seat in SEAT_RANGE {
            assert_eq!(seats.get(seat), Some(seat == 3 || seat == 17));
        }
        assert_eq!(roster.managers().len(), 1);
    }

    #[test]
    fn bundled_roster_loads() {
        let roster = Roster::bundled().unwrap();
        assert_eq!(roster.len(), 30);
        assert!(roster.diagnostics().is_empty());
    }
}
