//! State and actions of the reservation feature.

use crate::bucket::{BucketSnapshot, BucketStore};
use crate::filters::{AppliedFilters, FilterPatch, FilterState, matches_search};
use crate::statistics::{self, Statistics, WeeklyChart};
use crate::types::{Reservation, ReservationId, ReservationPage, ReservationStatus, UserId};

/// Everything the reservation screens render
///
/// Owned by the store and only mutated by [`crate::ReservationReducer`].
#[derive(Clone, Debug, Default)]
pub struct ReservationState {
    /// The three status buckets
    pub buckets: BucketStore,
    /// Current filter selection
    pub filters: FilterState,
    /// Facility and range the buckets were last loaded with
    pub applied: Option<AppliedFilters>,
    /// Revenue series for the current week
    pub weekly_chart: WeeklyChart,
    /// Derived dashboard metrics, recomputed after every bucket or chart change
    pub statistics: Statistics,
    /// Reservation whose confirmation is in flight
    pub confirming_id: Option<ReservationId>,
    /// Reservation whose cancellation is in flight
    pub cancelling_id: Option<ReservationId>,
    /// Last failure, shown until cleared or superseded
    pub last_error: Option<String>,
    /// Last unread notification count seen
    pub unread_notifications: u32,
    pub(crate) chart_epoch: u64,
}

impl ReservationState {
    /// Snapshot of one bucket
    #[must_use]
    pub fn snapshot(&self, status: ReservationStatus) -> BucketSnapshot {
        self.buckets.bucket(status).snapshot()
    }

    /// Items of a bucket matching the current search text
    #[must_use]
    pub fn filtered(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.buckets
            .bucket(status)
            .items
            .iter()
            .filter(|r| matches_search(r, &self.filters.search))
            .cloned()
            .collect()
    }

    pub(crate) fn recompute_statistics(&mut self) {
        self.statistics = statistics::compute(&self.buckets, &self.weekly_chart);
    }
}

/// Inputs to the reservation reducer
///
/// Commands come from the UI through [`crate::ReservationCoordinator`];
/// the remaining variants are produced by effects when a request resolves.
#[derive(Clone, Debug)]
pub enum ReservationAction {
    // Commands
    /// Load page 1 of every bucket and the weekly chart
    LoadAll,
    /// Load one page of one bucket
    LoadStatus {
        /// Bucket to load
        status: ReservationStatus,
        /// Page to request, 1-based
        page: u32,
        /// Pull-to-refresh: keep items visible until the response lands
        refresh: bool,
    },
    /// Load the page after the last loaded one
    LoadMore {
        /// Bucket to extend
        status: ReservationStatus,
    },
    /// Reload page 1 in place
    Refresh {
        /// Bucket to refresh
        status: ReservationStatus,
    },
    /// Confirm a pending reservation
    Confirm {
        /// Reservation to confirm
        id: ReservationId,
        /// Approving manager
        approver: UserId,
    },
    /// Cancel a pending or confirmed reservation
    Cancel {
        /// Reservation to cancel
        id: ReservationId,
        /// Reason shown to the organizer
        reason: Option<String>,
        /// Manager performing the cancellation
        approver: Option<UserId>,
    },
    /// Merge a filter update
    SetFilters(FilterPatch),
    /// Reload the weekly revenue series
    LoadWeeklyChart,
    /// The unread notification count changed
    NotificationsUpdated {
        /// New unread count
        unread: u32,
    },
    /// Dismiss the current error
    ClearError,

    // Results
    /// A page fetch succeeded
    PageLoaded {
        /// Bucket the page belongs to
        status: ReservationStatus,
        /// Request token
        epoch: u64,
        /// Requested page
        page: u32,
        /// Server response
        data: ReservationPage,
    },
    /// A page fetch failed
    PageFailed {
        /// Bucket the page belongs to
        status: ReservationStatus,
        /// Request token
        epoch: u64,
        /// User-facing message
        message: String,
    },
    /// The server accepted a confirmation
    Confirmed {
        /// Confirmed reservation
        id: ReservationId,
    },
    /// The server rejected a confirmation
    ConfirmFailed {
        /// Reservation left untouched
        id: ReservationId,
        /// User-facing message
        message: String,
    },
    /// The server accepted a cancellation
    Cancelled {
        /// Cancelled reservation
        id: ReservationId,
    },
    /// The server rejected a cancellation
    CancelFailed {
        /// Reservation left untouched
        id: ReservationId,
        /// User-facing message
        message: String,
    },
    /// The weekly chart arrived
    WeeklyChartLoaded {
        /// Request token
        epoch: u64,
        /// Daily revenue series
        chart: WeeklyChart,
    },
    /// The weekly chart fetch failed
    WeeklyChartFailed {
        /// Request token
        epoch: u64,
        /// User-facing message
        message: String,
    },
}
