use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::seats::{SeatToken, seat_tokens};

/// One roster entry, kept exactly as it was read: field order, `null`s and
/// attributes the service does not interpret all serialize back unchanged.
/// The interpreted fields are read through accessors.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Employee(Map<String, Value>);

impl Employee {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// `None` when the field is absent or not a string.
    pub fn employee_id(&self) -> Option<&str> {
        self.get("employee_id").and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }

    /// True only for the JSON boolean `true`.
    pub fn is_manager(&self) -> bool {
        matches!(self.get("is_manager"), Some(Value::Bool(true)))
    }

    /// Raw `manager` field when it is a string, including `""`.
    pub fn manager(&self) -> Option<&str> {
        self.get("manager").and_then(Value::as_str)
    }

    /// Manager email, treating an empty string as "no manager".
    pub fn manager_email(&self) -> Option<&str> {
        self.manager().filter(|email| !email.is_empty())
    }

    /// The `reservations` value as stored, absent stays absent.
    pub fn raw_reservations(&self) -> Option<&Value> {
        self.get("reservations")
    }

    /// Object entries of `reservations`; anything else yields nothing.
    pub fn reservations(&self) -> impl Iterator<Item = Reservation<'_>> {
        self.raw_reservations()
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .map(Reservation)
    }

    pub fn reservation_count(&self) -> usize {
        self.raw_reservations()
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// Borrowed view of one reservation. Only `seat_numbers` is interpreted.
#[derive(Clone, Copy, Debug)]
pub struct Reservation<'a>(&'a Map<String, Value>);

impl<'a> Reservation<'a> {
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.0.get(field)
    }

    /// `None` when `seat_numbers` is absent or not a string.
    pub fn seat_numbers(&self) -> Option<&'a str> {
        self.get("seat_numbers").and_then(Value::as_str)
    }

    pub fn seat_tokens(&self) -> impl Iterator<Item = SeatToken<'a>> + use<'a> {
        seat_tokens(self.seat_numbers().unwrap_or_default())
    }
}
