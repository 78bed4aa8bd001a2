use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use crate::{
    model::Employee,
    seats::{SEAT_RANGE, SeatToken},
};

/// Reservations an employee is expected to carry at most.
pub const MAX_RESERVATIONS: usize = 3;

/// Data-quality findings. None of these stop the service from starting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetIssue {
    MissingKey { position: usize, field: &'static str },
    NonBooleanManagerFlag { employee_id: String },
    DuplicateEmployeeId { employee_id: String, count: usize },
    DuplicateEmail { email: String, count: usize },
    TooManyReservations { employee_id: String, count: usize },
    UnknownManager { employee_id: String, manager: String },
    MalformedSeat { employee_id: String, token: String },
    SeatOutOfRange { employee_id: String, seat: i64 },
}

impl fmt::Display for DatasetIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey { position, field } => {
                write!(f, "record #{position} has no string {field}")
            }
            Self::NonBooleanManagerFlag { employee_id } => {
                write!(f, "{employee_id} has a non-boolean is_manager")
            }
            Self::DuplicateEmployeeId { employee_id, count } => {
                write!(f, "employee_id {employee_id} appears {count} times")
            }
            Self::DuplicateEmail { email, count } => {
                write!(f, "email {email} appears {count} times")
            }
            Self::TooManyReservations { employee_id, count } => write!(
                f,
                "{employee_id} has {count} reservations (expected at most {MAX_RESERVATIONS})"
            ),
            Self::UnknownManager {
                employee_id,
                manager,
            } => write!(f, "{employee_id} reports to unknown manager {manager}"),
            Self::MalformedSeat { employee_id, token } => {
                write!(f, "{employee_id} has non-numeric seat token {token:?}")
            }
            Self::SeatOutOfRange { employee_id, seat } => write!(
                f,
                "{employee_id} booked seat {seat} outside {}-{}",
                SEAT_RANGE.start(),
                SEAT_RANGE.end()
            ),
        }
    }
}

pub(crate) fn inspect(employees: &[Employee]) -> Vec<DatasetIssue> {
    let mut issues = Vec::new();
    issues.extend(
        duplicates(employees.iter().filter_map(Employee::employee_id)).map(
            |(employee_id, count)| DatasetIssue::DuplicateEmployeeId { employee_id, count },
        ),
    );
    issues.extend(
        duplicates(employees.iter().filter_map(Employee::email))
            .map(|(email, count)| DatasetIssue::DuplicateEmail { email, count }),
    );

    let emails: HashSet<&str> = employees.iter().filter_map(Employee::email).collect();
    for (position, employee) in employees.iter().enumerate() {
        for (field, value) in [
            ("employee_id", employee.employee_id()),
            ("email", employee.email()),
        ] {
            if value.is_none() {
                issues.push(DatasetIssue::MissingKey { position, field });
            }
        }
        let employee_id = employee
            .employee_id()
            .map_or_else(|| format!("#{position}"), str::to_string);
        if employee
            .get("is_manager")
            .is_some_and(|flag| !flag.is_boolean())
        {
            issues.push(DatasetIssue::NonBooleanManagerFlag {
                employee_id: employee_id.clone(),
            });
        }
        if employee.reservation_count() > MAX_RESERVATIONS {
            issues.push(DatasetIssue::TooManyReservations {
                employee_id: employee_id.clone(),
                count: employee.reservation_count(),
            });
        }
        if let Some(manager) = employee.manager_email() {
            if !emails.contains(manager) {
                issues.push(DatasetIssue::UnknownManager {
                    employee_id: employee_id.clone(),
                    manager: manager.to_string(),
                });
            }
        }
        for token in employee.reservations().flat_map(|r| r.seat_tokens()) {
            match token {
                SeatToken::Seat(seat) if !SEAT_RANGE.contains(&seat) => {
                    issues.push(DatasetIssue::SeatOutOfRange {
                        employee_id: employee_id.clone(),
                        seat,
                    });
                }
                SeatToken::Seat(_) => {}
                SeatToken::Malformed(piece) => issues.push(DatasetIssue::MalformedSeat {
                    employee_id: employee_id.clone(),
                    token: piece.to_string(),
                }),
            }
        }
    }
    issues
}

/// Values occurring more than once, in order of first appearance.
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> impl Iterator<Item = (String, usize)> {
    let mut order = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }
    order.into_iter().filter_map(move |value| {
        let count = counts.get(value).copied().unwrap_or_default();
        (count > 1).then(|| (value.to_string(), count))
    })
}
