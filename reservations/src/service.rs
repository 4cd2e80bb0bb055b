//! The remote reservation service as seen by the client.
//!
//! The reducer only talks to this trait. [`crate::http::HttpReservationService`]
//! is the production implementation, [`crate::mocks::InMemoryReservationService`]
//! backs tests and the demo.

use crate::filters::{DateRange, ReservationQuery};
use crate::statistics::WeeklyChart;
use crate::types::{FacilityId, ReservationId, ReservationPage, ReservationStatus, UserId};
use futures::future::BoxFuture;
use thiserror::Error;

/// Result type of service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a service call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with an error status
    #[error("server error (status {status}): {}", message.as_deref().unwrap_or("no message"))]
    Server {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body, if any
        message: Option<String>,
    },

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),

    /// A record breaks `registered_players <= max_players`
    #[error("reservation {id} has more registered players than capacity")]
    InvalidRecord {
        /// Offending record
        id: ReservationId,
    },
}

impl ServiceError {
    /// Message supplied by the server, if any
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Message shown to the user: the server's own message, else `fallback`
    #[must_use]
    pub fn user_message(&self, fallback: impl Into<String>) -> String {
        self.server_message()
            .map_or_else(|| fallback.into(), str::to_string)
    }
}

/// Operations the client needs from the reservation backend
///
/// Futures are `'static` so the reducer can move them into effects.
pub trait ReservationService: Send + Sync {
    /// Fetch one page of reservations with the given status
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn fetch_reservations(
        &self,
        status: ReservationStatus,
        page: u32,
        page_size: u32,
        query: ReservationQuery,
    ) -> BoxFuture<'static, ServiceResult<ReservationPage>>;

    /// Fetch the daily revenue series for one week
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    fn fetch_weekly_chart(
        &self,
        week: DateRange,
        facility_id: Option<FacilityId>,
    ) -> BoxFuture<'static, ServiceResult<WeeklyChart>>;

    /// Confirm a pending reservation
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses the transition or the request fails.
    fn confirm_reservation(
        &self,
        id: ReservationId,
        approver: UserId,
    ) -> BoxFuture<'static, ServiceResult<()>>;

    /// Cancel a pending or confirmed reservation
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses the transition or the request fails.
    fn cancel_reservation(
        &self,
        id: ReservationId,
        reason: Option<String>,
        approver: Option<UserId>,
    ) -> BoxFuture<'static, ServiceResult<()>>;
}
