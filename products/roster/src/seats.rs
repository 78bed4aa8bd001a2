use std::{collections::BTreeMap, ops::RangeInclusive};

use serde::Serialize;
use tracing::debug;

use crate::model::Reservation;

/// Seats every occupancy map starts with, all free.
pub const SEAT_RANGE: RangeInclusive<i64> = 1..=100;

/// One comma separated piece of a `seat_numbers` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatToken<'a> {
    Seat(i64),
    Malformed(&'a str),
}

/// Splits `raw` on commas and trims each piece. Empty pieces are dropped.
pub fn seat_tokens(raw: &str) -> impl Iterator<Item = SeatToken<'_>> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            piece
                .parse::<i64>()
                .map_or(SeatToken::Malformed(piece), SeatToken::Seat)
        })
}

/// Seat number to booked flag, serialized as a JSON object with keys in
/// ascending numeric order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SeatMap(BTreeMap<i64, bool>);

impl SeatMap {
    pub fn empty() -> Self {
        Self(SEAT_RANGE.map(|seat| (seat, false)).collect())
    }

    /// Marks every integer seat referenced by `reservations`. Numbers outside
    /// [`SEAT_RANGE`] are inserted under their own key; malformed tokens are
    /// skipped.
    pub fn from_reservations<'a>(reservations: impl IntoIterator<Item = Reservation<'a>>) -> Self {
        let mut map = Self::empty();
        for reservation in reservations {
            for token in reservation.seat_tokens() {
                match token {
                    SeatToken::Seat(seat) => map.book(seat),
                    SeatToken::Malformed(piece) => {
                        debug!(token = piece, "skipping malformed seat token");
                    }
                }
            }
        }
        map
    }

    pub fn book(&mut self, seat: i64) {
        self.0.insert(seat, true);
    }

    pub fn get(&self, seat: i64) -> Option<bool> {
        self.0.get(&seat).copied()
    }

    pub fn booked(&self) -> impl Iterator<Item = i64> + '_ {
        self.0
            .iter()
            .filter_map(|(seat, booked)| booked.then_some(*seat))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
