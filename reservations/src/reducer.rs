//! Reducer for the reservation screens.
//!
//! Loads are single-flight per bucket and tagged with the bucket's request
//! token; a result whose token is no longer current is dropped. Confirm and
//! cancel move a record between buckets only after the server accepts them.

use crate::bucket::LoadPhase;
use crate::filters::{DateRange, ReservationQuery};
use crate::service::ReservationService;
use crate::state::{ReservationAction, ReservationState};
use crate::types::{ReservationId, ReservationPatch, ReservationStatus, UserId};
use chrono::NaiveDate;
use pitchside_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use std::sync::Arc;

/// Dependencies of the reservation reducer
#[derive(Clone)]
pub struct ReservationEnvironment {
    /// Remote reservation API
    pub service: Arc<dyn ReservationService>,
    /// Source of "today" for relative periods and the weekly chart
    pub clock: Arc<dyn Clock>,
    /// Records requested per page
    pub page_size: u32,
}

impl ReservationEnvironment {
    /// Creates a new `ReservationEnvironment`
    #[must_use]
    pub fn new(service: Arc<dyn ReservationService>, clock: Arc<dyn Clock>, page_size: u32) -> Self {
        Self {
            service,
            clock,
            page_size: page_size.max(1),
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }
}

impl std::fmt::Debug for ReservationEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationEnvironment")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// Reducer for [`ReservationState`]
#[derive(Clone, Debug, Default)]
pub struct ReservationReducer;

type Effects = SmallVec<[Effect<ReservationAction>; 4]>;

impl ReservationReducer {
    /// Creates a new `ReservationReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Query for page fetches: the applied memo, else the current filters
    fn query(state: &ReservationState, today: NaiveDate) -> ReservationQuery {
        state
            .applied
            .unwrap_or_else(|| state.filters.applied(today))
            .query()
    }

    /// Issues a page fetch unless the bucket already has one in flight
    fn start_load(
        state: &mut ReservationState,
        env: &ReservationEnvironment,
        status: ReservationStatus,
        page: u32,
        phase: LoadPhase,
    ) -> Option<Effect<ReservationAction>> {
        let query = Self::query(state, env.today());

        let Some(epoch) = state.buckets.begin_load(status, phase) else {
            tracing::debug!(%status, page, "Load dropped, bucket busy");
            metrics::counter!("reservations.loads.dropped", "status" => status.as_str())
                .increment(1);
            return None;
        };

        tracing::debug!(%status, page, epoch, ?phase, "Loading page");
        metrics::counter!("reservations.loads.started", "status" => status.as_str()).increment(1);

        let request = env
            .service
            .fetch_reservations(status, page, env.page_size, query);

        Some(Effect::future(async move {
            let action = match request.await {
                Ok(data) => ReservationAction::PageLoaded {
                    status,
                    epoch,
                    page,
                    data,
                },
                Err(error) => {
                    tracing::warn!(%status, page, %error, "Page fetch failed");
                    ReservationAction::PageFailed {
                        status,
                        epoch,
                        message: error.user_message(format!("Failed to load {status} reservations")),
                    }
                },
            };
            Some(action)
        }))
    }

    fn load_chart(state: &mut ReservationState, env: &ReservationEnvironment) -> Effect<ReservationAction> {
        state.chart_epoch += 1;
        let epoch = state.chart_epoch;
        let week = DateRange::week_of(env.today());
        let request = env
            .service
            .fetch_weekly_chart(week, state.filters.facility_id);

        Effect::future(async move {
            let action = match request.await {
                Ok(chart) => ReservationAction::WeeklyChartLoaded { epoch, chart },
                Err(error) => {
                    tracing::warn!(%error, "Weekly chart fetch failed");
                    ReservationAction::WeeklyChartFailed {
                        epoch,
                        message: error.user_message("Failed to load weekly revenue"),
                    }
                },
            };
            Some(action)
        })
    }

    /// Page-1 loads of every bucket plus the weekly chart
    fn load_everything(state: &mut ReservationState, env: &ReservationEnvironment) -> Effects {
        let mut effects: Vec<_> = ReservationStatus::ALL
            .into_iter()
            .filter_map(|status| Self::start_load(state, env, status, 1, LoadPhase::Loading))
            .collect();
        effects.push(Self::load_chart(state, env));

        smallvec![Effect::merge(effects)]
    }

    fn confirm(
        state: &mut ReservationState,
        env: &ReservationEnvironment,
        id: ReservationId,
        approver: UserId,
    ) -> Effects {
        if let Some(in_flight) = state.confirming_id {
            tracing::debug!(%id, %in_flight, "Confirm dropped, another confirmation in flight");
            return SmallVec::new();
        }

        state.confirming_id = Some(id);
        let request = env.service.confirm_reservation(id, approver);

        smallvec![Effect::future(async move {
            Some(match request.await {
                Ok(()) => ReservationAction::Confirmed { id },
                Err(error) => {
                    tracing::warn!(%id, %error, "Confirm failed");
                    ReservationAction::ConfirmFailed {
                        id,
                        message: error.user_message("Failed to confirm reservation"),
                    }
                },
            })
        })]
    }

    fn cancel(
        state: &mut ReservationState,
        env: &ReservationEnvironment,
        id: ReservationId,
        reason: Option<String>,
        approver: Option<UserId>,
    ) -> Effects {
        if let Some(in_flight) = state.cancelling_id {
            tracing::debug!(%id, %in_flight, "Cancel dropped, another cancellation in flight");
            return SmallVec::new();
        }

        state.cancelling_id = Some(id);
        let request = env.service.cancel_reservation(id, reason, approver);

        smallvec![Effect::future(async move {
            Some(match request.await {
                Ok(()) => ReservationAction::Cancelled { id },
                Err(error) => {
                    tracing::warn!(%id, %error, "Cancel failed");
                    ReservationAction::CancelFailed {
                        id,
                        message: error.user_message("Failed to cancel reservation"),
                    }
                },
            })
        })]
    }

    fn stale(status: ReservationStatus, epoch: u64) {
        tracing::debug!(%status, epoch, "Discarding stale result");
        metrics::counter!("reservations.results.stale", "status" => status.as_str()).increment(1);
    }
}

impl Reducer for ReservationReducer {
    type State = ReservationState;
    type Action = ReservationAction;
    type Environment = ReservationEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            ReservationAction::LoadAll => {
                state.applied = Some(state.filters.applied(env.today()));
                Self::load_everything(state, env)
            },

            ReservationAction::LoadStatus {
                status,
                page,
                refresh,
            } => {
                let page = page.max(1);
                let phase = match (refresh, page) {
                    (true, _) => LoadPhase::Refreshing,
                    (false, 1) => LoadPhase::Loading,
                    (false, _) => LoadPhase::LoadingMore,
                };
                Self::start_load(state, env, status, page, phase)
                    .into_iter()
                    .collect()
            },

            ReservationAction::LoadMore { status } => {
                let bucket = state.buckets.bucket(status);
                if bucket.phase.is_busy() || !bucket.has_more {
                    tracing::trace!(%status, "Load more ignored");
                    return SmallVec::new();
                }
                let next = bucket.pagination.page + 1;
                Self::start_load(state, env, status, next, LoadPhase::LoadingMore)
                    .into_iter()
                    .collect()
            },

            ReservationAction::Refresh { status } => {
                Self::start_load(state, env, status, 1, LoadPhase::Refreshing)
                    .into_iter()
                    .collect()
            },

            ReservationAction::Confirm { id, approver } => Self::confirm(state, env, id, approver),

            ReservationAction::Cancel {
                id,
                reason,
                approver,
            } => Self::cancel(state, env, id, reason, approver),

            ReservationAction::SetFilters(patch) => {
                let today = env.today();
                let previous = state
                    .applied
                    .unwrap_or_else(|| state.filters.applied(today));

                state.filters.merge(patch);
                let next = state.filters.applied(today);
                if next == previous {
                    return SmallVec::new();
                }

                tracing::info!(
                    facility = ?next.facility_id,
                    range = ?next.range,
                    "Filters changed, reloading"
                );
                state.applied = Some(next);
                state.buckets.clear_all();
                state.recompute_statistics();
                Self::load_everything(state, env)
            },

            ReservationAction::LoadWeeklyChart => smallvec![Self::load_chart(state, env)],

            ReservationAction::NotificationsUpdated { unread } => {
                if unread <= state.unread_notifications {
                    state.unread_notifications = unread;
                    return SmallVec::new();
                }
                // A busy pending bucket leaves the count unrecorded so the next poll retries.
                let Some(refresh) = Self::start_load(
                    state,
                    env,
                    ReservationStatus::Pending,
                    1,
                    LoadPhase::Refreshing,
                ) else {
                    return SmallVec::new();
                };
                state.unread_notifications = unread;
                smallvec![refresh]
            },

            ReservationAction::ClearError => {
                state.last_error = None;
                SmallVec::new()
            },

            // ========== Results ==========
            ReservationAction::PageLoaded {
                status,
                epoch,
                page,
                data,
            } => {
                if !state.buckets.bucket(status).is_current(epoch) {
                    Self::stale(status, epoch);
                    return SmallVec::new();
                }
                state
                    .buckets
                    .replace_page(status, page, data.items, data.pagination);
                state.recompute_statistics();
                SmallVec::new()
            },

            ReservationAction::PageFailed {
                status,
                epoch,
                message,
            } => {
                if !state.buckets.bucket(status).is_current(epoch) {
                    Self::stale(status, epoch);
                    return SmallVec::new();
                }
                state.buckets.set_loading(status, LoadPhase::Idle);
                state.last_error = Some(message);
                SmallVec::new()
            },

            ReservationAction::Confirmed { id } => {
                if state.confirming_id == Some(id) {
                    state.confirming_id = None;
                }
                let moved = state.buckets.move_item(
                    ReservationStatus::Pending,
                    ReservationStatus::Confirmed,
                    id,
                    &ReservationPatch::status(ReservationStatus::Confirmed),
                );
                tracing::info!(%id, moved, "Reservation confirmed");
                state.recompute_statistics();
                SmallVec::new()
            },

            ReservationAction::ConfirmFailed { id, message } => {
                if state.confirming_id == Some(id) {
                    state.confirming_id = None;
                }
                state.last_error = Some(message);
                SmallVec::new()
            },

            ReservationAction::Cancelled { id } => {
                if state.cancelling_id == Some(id) {
                    state.cancelling_id = None;
                }
                let source = state.buckets.locate(
                    id,
                    &[ReservationStatus::Pending, ReservationStatus::Confirmed],
                );
                if let Some(from) = source {
                    state.buckets.move_item(
                        from,
                        ReservationStatus::Cancelled,
                        id,
                        &ReservationPatch::status(ReservationStatus::Cancelled),
                    );
                }
                tracing::info!(%id, from = ?source, "Reservation cancelled");
                state.recompute_statistics();
                SmallVec::new()
            },

            ReservationAction::CancelFailed { id, message } => {
                if state.cancelling_id == Some(id) {
                    state.cancelling_id = None;
                }
                state.last_error = Some(message);
                SmallVec::new()
            },

            ReservationAction::WeeklyChartLoaded { epoch, chart } => {
                if epoch == state.chart_epoch {
                    state.weekly_chart = chart;
                    state.recompute_statistics();
                }
                SmallVec::new()
            },

            ReservationAction::WeeklyChartFailed { epoch, message } => {
                if epoch == state.chart_epoch {
                    state.last_error = Some(message);
                }
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bucket::BucketStore;
    use crate::filters::{DatePeriod, FilterPatch};
    use crate::mocks::{InMemoryReservationService, fixture};
    use crate::statistics::WeeklyChart;
    use crate::types::{FacilityId, Pagination, ReservationPage};
    use pitchside_testing::{ReducerTest, assertions, test_clock};
    use ReservationStatus::{Cancelled, Confirmed, Pending};

    fn env() -> ReservationEnvironment {
        ReservationEnvironment::new(
            Arc::new(InMemoryReservationService::new()),
            Arc::new(test_clock()),
            10,
        )
    }

    fn page_of(ids: std::ops::RangeInclusive<u64>, status: ReservationStatus, has_next: bool) -> ReservationPage {
        ReservationPage {
            items: ids.map(|id| fixture(id, status)).collect(),
            pagination: Pagination {
                page: 1,
                total_pages: 2,
                total: 20,
                has_next_page: has_next,
            },
        }
    }

    fn loaded(status: ReservationStatus, ids: std::ops::RangeInclusive<u64>) -> ReservationState {
        let mut state = ReservationState::default();
        let page = page_of(ids, status, true);
        state
            .buckets
            .replace_page(status, 1, page.items, page.pagination);
        state
    }

    #[test]
    fn load_all_fans_out_three_pages_and_chart() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(ReservationState::default())
            .when_action(ReservationAction::LoadAll)
            .then_state(|state| {
                for status in ReservationStatus::ALL {
                    assert_eq!(state.buckets.bucket(status).phase, LoadPhase::Loading);
                }
                assert!(state.applied.is_some());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_future_count(effects, 4);
            })
            .run();
    }

    #[test]
    fn load_more_while_loading_is_dropped() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(loaded(Pending, 1..=10))
            .when_actions([
                ReservationAction::LoadMore { status: Pending },
                ReservationAction::LoadMore { status: Pending },
            ])
            .then_state(|state| {
                assert_eq!(state.buckets.pending.phase, LoadPhase::LoadingMore);
                assert_eq!(state.buckets.pending.pagination.page, 1);
                assert_eq!(state.buckets.pending.epoch(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn load_more_without_more_pages_is_noop() {
        let mut state = loaded(Pending, 1..=3);
        state.buckets.pending.has_more = false;

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::LoadMore { status: Pending })
            .then_state(|state| assert_eq!(state.buckets.pending.phase, LoadPhase::Idle))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn refresh_keeps_items_until_response() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(loaded(Confirmed, 1..=5))
            .when_action(ReservationAction::Refresh { status: Confirmed })
            .then_state(|state| {
                assert!(state.buckets.confirmed.phase.refreshing());
                assert_eq!(state.buckets.len(Confirmed), 5);
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 1))
            .run();
    }

    #[test]
    fn refresh_response_replaces_items() {
        let mut state = loaded(Confirmed, 1..=5);
        let epoch = state
            .buckets
            .begin_load(Confirmed, LoadPhase::Refreshing)
            .unwrap();

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::PageLoaded {
                status: Confirmed,
                epoch,
                page: 1,
                data: page_of(100..=101, Confirmed, false),
            })
            .then_state(|state| {
                assert_eq!(state.buckets.len(Confirmed), 2);
                assert_eq!(state.buckets.confirmed.phase, LoadPhase::Idle);
                assert!(!state.buckets.confirmed.has_more);
                assert_eq!(state.statistics.matches, 2);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn stale_page_is_discarded() {
        let mut state = loaded(Pending, 1..=3);
        let stale = state.buckets.begin_load(Pending, LoadPhase::LoadingMore).unwrap();
        state.buckets.clear(Pending);

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::PageLoaded {
                status: Pending,
                epoch: stale,
                page: 2,
                data: page_of(4..=6, Pending, false),
            })
            .then_state(|state| {
                assert!(state.buckets.pending.items.is_empty());
                assert!(state.buckets.pending.has_more);
            })
            .run();
    }

    #[test]
    fn failed_page_keeps_items_and_reports() {
        let mut state = loaded(Confirmed, 1..=4);
        let epoch = state
            .buckets
            .begin_load(Confirmed, LoadPhase::LoadingMore)
            .unwrap();

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::PageFailed {
                status: Confirmed,
                epoch,
                message: "Failed to load confirmed reservations".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.buckets.len(Confirmed), 4);
                assert_eq!(state.buckets.confirmed.phase, LoadPhase::Idle);
                assert_eq!(
                    state.last_error.as_deref(),
                    Some("Failed to load confirmed reservations")
                );
            })
            .run();
    }

    #[test]
    fn confirm_marks_in_flight_and_is_single_flight() {
        let approver = UserId::new(9);
        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(loaded(Pending, 1..=3))
            .when_actions([
                ReservationAction::Confirm {
                    id: ReservationId::new(1),
                    approver,
                },
                ReservationAction::Confirm {
                    id: ReservationId::new(2),
                    approver,
                },
            ])
            .then_state(|state| {
                assert_eq!(state.confirming_id, Some(ReservationId::new(1)));
                assert_eq!(state.buckets.len(Pending), 3);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn confirmed_moves_to_head_of_confirmed() {
        let mut state = loaded(Pending, 1..=3);
        state.buckets.replace_page(
            Confirmed,
            1,
            vec![fixture(50, Confirmed)],
            Pagination::default(),
        );
        state.confirming_id = Some(ReservationId::new(2));

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::Confirmed {
                id: ReservationId::new(2),
            })
            .then_state(|state| {
                assert_eq!(state.confirming_id, None);
                assert_eq!(state.buckets.len(Pending), 2);
                assert_eq!(state.buckets.confirmed.items[0].id, ReservationId::new(2));
                assert_eq!(state.buckets.confirmed.items[0].status, Confirmed);
                assert_eq!(state.statistics.reservations_confirmed, 2);
            })
            .run();
    }

    #[test]
    fn confirm_failure_leaves_buckets_untouched() {
        let mut state = loaded(Pending, 1..=3);
        state.confirming_id = Some(ReservationId::new(2));
        let before = state.buckets.clone();

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::ConfirmFailed {
                id: ReservationId::new(2),
                message: "Failed to confirm reservation".to_string(),
            })
            .then_state(move |state| {
                assert_eq!(state.buckets, before);
                assert_eq!(state.confirming_id, None);
                assert!(state.last_error.is_some());
            })
            .run();
    }

    #[test]
    fn cancelled_searches_pending_then_confirmed() {
        let mut state = loaded(Confirmed, 1..=3);
        state.cancelling_id = Some(ReservationId::new(3));

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::Cancelled {
                id: ReservationId::new(3),
            })
            .then_state(|state| {
                assert_eq!(state.cancelling_id, None);
                assert_eq!(state.buckets.len(Confirmed), 2);
                assert_eq!(state.buckets.cancelled.items[0].id, ReservationId::new(3));
                assert_eq!(state.buckets.cancelled.items[0].status, Cancelled);
            })
            .run();
    }

    #[test]
    fn facility_change_clears_and_reloads() {
        let mut state = loaded(Pending, 1..=3);
        state.applied = Some(state.filters.applied(test_clock().now().date_naive()));

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::SetFilters(
                FilterPatch::new().facility(FacilityId::new(7)),
            ))
            .then_state(|state| {
                assert_eq!(state.buckets.len(Pending), 0);
                assert_eq!(
                    state.applied.and_then(|a| a.facility_id),
                    Some(FacilityId::new(7))
                );
                for status in ReservationStatus::ALL {
                    assert_eq!(state.buckets.bucket(status).phase, LoadPhase::Loading);
                }
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 4))
            .run();
    }

    #[test]
    fn same_facility_twice_reloads_once() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(ReservationState::default())
            .when_actions([
                ReservationAction::SetFilters(FilterPatch::new().facility(FacilityId::new(7))),
                ReservationAction::SetFilters(FilterPatch::new().facility(FacilityId::new(7))),
            ])
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn search_change_does_not_reload() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(loaded(Pending, 1..=3))
            .when_action(ReservationAction::SetFilters(FilterPatch::new().search("stade")))
            .then_state(|state| {
                assert_eq!(state.filters.search, "stade");
                assert_eq!(state.buckets.len(Pending), 3);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn period_change_reloads() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(ReservationState::default())
            .when_action(ReservationAction::SetFilters(
                FilterPatch::new().period(DatePeriod::Week),
            ))
            .then_state(|state| {
                let range = state.applied.and_then(|a| a.range).unwrap();
                assert_eq!(range.end, test_clock().now().date_naive());
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 4))
            .run();
    }

    #[test]
    fn growing_notification_count_refreshes_pending() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(ReservationState::default())
            .when_action(ReservationAction::NotificationsUpdated { unread: 2 })
            .then_state(|state| {
                assert_eq!(state.unread_notifications, 2);
                assert!(state.buckets.pending.phase.refreshing());
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 1))
            .run();
    }

    #[test]
    fn notification_while_pending_busy_is_not_recorded() {
        let mut state = loaded(Pending, 1..=10);
        state
            .buckets
            .begin_load(Pending, LoadPhase::LoadingMore)
            .unwrap();

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::NotificationsUpdated { unread: 1 })
            .then_state(|state| {
                assert_eq!(state.unread_notifications, 0);
                assert_eq!(state.buckets.pending.phase, LoadPhase::LoadingMore);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn shrinking_notification_count_does_nothing() {
        let state = ReservationState {
            unread_notifications: 3,
            ..ReservationState::default()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::NotificationsUpdated { unread: 1 })
            .then_state(|state| {
                assert_eq!(state.unread_notifications, 1);
                assert_eq!(state.buckets, BucketStore::default());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn chart_reload_issues_new_token() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(ReservationState::default())
            .when_actions([
                ReservationAction::LoadWeeklyChart,
                ReservationAction::LoadWeeklyChart,
            ])
            .then_state(|state| assert_eq!(state.chart_epoch, 2))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn stale_chart_is_ignored() {
        let state = ReservationState {
            chart_epoch: 2,
            ..ReservationState::default()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::WeeklyChartLoaded {
                epoch: 1,
                chart: WeeklyChart {
                    daily_revenue: [1; 7],
                },
            })
            .then_state(|state| assert_eq!(state.weekly_chart, WeeklyChart::default()))
            .run();
    }

    #[test]
    fn clear_error_resets_message() {
        let state = ReservationState {
            last_error: Some("boom".to_string()),
            ..ReservationState::default()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ReservationAction::ClearError)
            .then_state(|state| assert_eq!(state.last_error, None))
            .run();
    }
}
