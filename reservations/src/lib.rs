//! # Pitchside Reservations
//!
//! Client-side data layer of the Pitchside field-booking app: per-status
//! reservation buckets, optimistic confirm/cancel, filter-driven reloads and
//! the dashboard statistics derived from what is loaded.
//!
//! ## Architecture
//!
//! - [`BucketStore`]: the three paginated collections, mutated only by the reducer
//! - [`ReservationReducer`]: pure transitions; requests are returned as effects
//! - [`ReservationCoordinator`]: the facade the UI calls, backed by a `Store`
//! - [`statistics::compute`]: metrics recomputed after every bucket change
//! - [`ReservationService`]: the booking API, over HTTP or in memory
//!
//! ## Example
//!
//! ```no_run
//! use pitchside_reservations::{InMemoryReservationService, ReservationCoordinator, ReservationStatus};
//! use pitchside_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), pitchside_reservations::CoordinatorError> {
//! let coordinator = ReservationCoordinator::new(
//!     Arc::new(InMemoryReservationService::new()),
//!     Arc::new(SystemClock),
//!     10,
//! );
//!
//! coordinator.load_all().await?.wait().await;
//! let pending = coordinator.snapshot(ReservationStatus::Pending).await;
//! println!("{} pending", pending.items.len());
//! # Ok(())
//! # }
//! ```

pub mod bucket;
pub mod config;
pub mod coordinator;
pub mod filters;
pub mod http;
pub mod mocks;
pub mod reducer;
pub mod service;
pub mod state;
pub mod statistics;
pub mod types;

pub use bucket::{BucketSnapshot, BucketStore, LoadPhase, StatusBucket};
pub use config::Config;
pub use coordinator::{CoordinatorError, ReservationCoordinator, ReservationStore};
pub use filters::{DatePeriod, DateRange, FilterPatch, FilterState};
pub use http::HttpReservationService;
pub use mocks::InMemoryReservationService;
pub use reducer::{ReservationEnvironment, ReservationReducer};
pub use service::{ReservationService, ServiceError, ServiceResult};
pub use state::{ReservationAction, ReservationState};
pub use statistics::{Statistics, WeeklyChart};
pub use types::{
    FacilityId, Pagination, Reservation, ReservationId, ReservationPage, ReservationStatus, UserId,
};
