//! Facade the UI talks to.
//!
//! Every command is a `send` on the underlying [`Store`] and returns the
//! [`EffectHandle`] of the requests it started. Queries read a consistent
//! snapshot of state; nothing here hands out references into the buckets.

use crate::bucket::BucketSnapshot;
use crate::config::Config;
use crate::filters::{FilterPatch, FilterState};
use crate::http::HttpReservationService;
use crate::reducer::{ReservationEnvironment, ReservationReducer};
use crate::service::ReservationService;
use crate::state::{ReservationAction, ReservationState};
use crate::statistics::Statistics;
use crate::types::{Reservation, ReservationId, ReservationStatus, UserId};
use pitchside_core::environment::{Clock, SystemClock};
use pitchside_runtime::{EffectHandle, Store, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// Store specialized for the reservation feature
pub type ReservationStore =
    Store<ReservationState, ReservationAction, ReservationEnvironment, ReservationReducer>;

/// Errors surfaced by the coordinator
///
/// Request failures are not among them: those land in
/// [`ReservationCoordinator::last_error`].
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The store rejected the command or timed out shutting down
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reservation and statistics coordinator
#[derive(Clone)]
pub struct ReservationCoordinator {
    store: ReservationStore,
}

impl ReservationCoordinator {
    /// Create a coordinator with empty buckets
    #[must_use]
    pub fn new(service: Arc<dyn ReservationService>, clock: Arc<dyn Clock>, page_size: u32) -> Self {
        let environment = ReservationEnvironment::new(service, clock, page_size);
        Self {
            store: Store::new(
                ReservationState::default(),
                ReservationReducer::new(),
                environment,
            ),
        }
    }

    /// Create a coordinator backed by the HTTP API
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(HttpReservationService::from_config(config)),
            Arc::new(SystemClock),
            config.page_size,
        )
    }

    async fn dispatch(&self, action: ReservationAction) -> Result<EffectHandle, CoordinatorError> {
        Ok(self.store.send(action).await?)
    }

    /// Load page 1 of every bucket and the weekly chart
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn load_all(&self) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::LoadAll).await
    }

    /// Load one page of one bucket
    ///
    /// Dropped if the bucket already has a request in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn load_status(
        &self,
        status: ReservationStatus,
        page: u32,
        refresh: bool,
    ) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::LoadStatus {
            status,
            page,
            refresh,
        })
        .await
    }

    /// Load the next page of a bucket
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn load_more(&self, status: ReservationStatus) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::LoadMore { status }).await
    }

    /// Pull-to-refresh one bucket
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self, status: ReservationStatus) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::Refresh { status }).await
    }

    /// Confirm a pending reservation
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn confirm(
        &self,
        id: ReservationId,
        approver: UserId,
    ) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::Confirm { id, approver }).await
    }

    /// Cancel a pending or confirmed reservation
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    #[tracing::instrument(skip(self, reason))]
    pub async fn cancel(
        &self,
        id: ReservationId,
        reason: Option<String>,
        approver: Option<UserId>,
    ) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::Cancel {
            id,
            reason,
            approver,
        })
        .await
    }

    /// Merge a filter update; a facility or period change reloads everything
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn set_filters(&self, patch: FilterPatch) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::SetFilters(patch)).await
    }

    /// Reload the weekly revenue series
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn load_weekly_chart(&self) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::LoadWeeklyChart).await
    }

    /// Report the unread notification count; growth refreshes `pending`
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn notifications_updated(&self, unread: u32) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::NotificationsUpdated { unread })
            .await
    }

    /// Dismiss the current error
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn clear_error(&self) -> Result<EffectHandle, CoordinatorError> {
        self.dispatch(ReservationAction::ClearError).await
    }

    /// Snapshot of one bucket
    pub async fn snapshot(&self, status: ReservationStatus) -> BucketSnapshot {
        self.store.state(|s| s.snapshot(status)).await
    }

    /// Items of one bucket matching the search text
    pub async fn filtered_reservations(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.store.state(|s| s.filtered(status)).await
    }

    /// Dashboard metrics for what is currently loaded
    pub async fn statistics(&self) -> Statistics {
        self.store.state(|s| s.statistics.clone()).await
    }

    /// Current filter selection
    pub async fn filters(&self) -> FilterState {
        self.store.state(|s| s.filters.clone()).await
    }

    /// Last failure message, if not yet cleared
    pub async fn last_error(&self) -> Option<String> {
        self.store.state(|s| s.last_error.clone()).await
    }

    /// Reservation whose confirmation is in flight
    pub async fn confirming_id(&self) -> Option<ReservationId> {
        self.store.state(|s| s.confirming_id).await
    }

    /// Reservation whose cancellation is in flight
    pub async fn cancelling_id(&self) -> Option<ReservationId> {
        self.store.state(|s| s.cancelling_id).await
    }

    /// Results as they are applied, for re-rendering
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ReservationAction> {
        self.store.subscribe_actions()
    }

    /// Stop accepting commands and wait for in-flight requests
    ///
    /// # Errors
    ///
    /// Returns an error if requests are still running after `timeout`.
    pub async fn shutdown(&self, timeout: std::time::Duration) -> Result<(), CoordinatorError> {
        Ok(self.store.shutdown(timeout).await?)
    }
}

impl std::fmt::Debug for ReservationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationCoordinator").finish_non_exhaustive()
    }
}
