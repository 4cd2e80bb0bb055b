//! Domain records for field reservations ("matches").
//!
//! Reservations are created server-side. The client only receives them
//! through fetches and changes their `status` locally after a confirm or
//! cancel call succeeds.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Server-assigned identifier of a reservation, stable for its lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(u64);

impl ReservationId {
    /// Wraps a raw identifier
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a bookable facility (terrain)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(u64);

impl FacilityId {
    /// Wraps a raw identifier
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for FacilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the manager approving or cancelling a reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw identifier
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a reservation; each status has its own bucket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Awaiting a manager decision
    Pending,
    /// Accepted by a manager
    Confirmed,
    /// Cancelled by a manager or the organizer
    Cancelled,
}

impl ReservationStatus {
    /// Every status, in bucket order
    pub const ALL: [Self; 3] = [Self::Pending, Self::Confirmed, Self::Cancelled];

    /// Wire/key representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing an unknown status key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown reservation status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for ReservationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// One bookable match/session on a facility
///
/// Times are facility-local wall-clock times as sent by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique identifier
    pub id: ReservationId,
    /// Facility the match is played on
    pub facility_id: FacilityId,
    /// Facility display name
    pub facility_name: String,
    /// Facility location (city, district)
    pub facility_location: String,
    /// Kick-off time
    pub starts_at: NaiveDateTime,
    /// End time
    pub ends_at: NaiveDateTime,
    /// Duration in hours
    pub duration_hours: f32,
    /// Current status
    pub status: ReservationStatus,
    /// Name of the player who organized the match
    pub organizer_name: String,
    /// Players registered so far
    pub registered_players: u32,
    /// Player capacity
    pub max_players: u32,
    /// Price per player, in minor currency units
    pub price_per_player: u32,
    /// Free-text description
    pub description: String,
}

impl Reservation {
    /// Whether the record satisfies `registered_players <= max_players`
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.registered_players <= self.max_players
    }

    /// Revenue generated by this match: price per player times registered players
    #[must_use]
    pub fn revenue(&self) -> u64 {
        u64::from(self.price_per_player) * u64::from(self.registered_players)
    }
}

/// Server pagination descriptor for one bucket
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Last page loaded (0 before any load)
    pub page: u32,
    /// Total number of pages on the server
    pub total_pages: u32,
    /// Total number of records on the server
    pub total: u64,
    /// Whether the server has a page after `page`
    pub has_next_page: bool,
}

/// One page of reservations for a single status
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationPage {
    /// Records in server order
    pub items: Vec<Reservation>,
    /// Pagination metadata
    pub pagination: Pagination,
}

/// Local changes applied to a record when it moves between buckets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservationPatch {
    /// New status
    pub status: ReservationStatus,
}

impl ReservationPatch {
    /// Patch that only overwrites the status
    #[must_use]
    pub const fn status(status: ReservationStatus) -> Self {
        Self { status }
    }

    /// Applies the patch to a record
    pub const fn apply(&self, reservation: &mut Reservation) {
        reservation.status = self.status;
    }
}
