//! In-memory reservation service for tests and the demo binary.
//!
//! Behaves like the booking API closely enough to drive the reducer through
//! its whole lifecycle: status-filtered pagination, server-side transition
//! checks, injected failures, and a gate that holds requests in flight.

use crate::filters::{DateRange, ReservationQuery};
use crate::service::{ReservationService, ServiceError, ServiceResult};
use crate::statistics::WeeklyChart;
use crate::types::{
    FacilityId, Pagination, Reservation, ReservationId, ReservationPage, ReservationStatus,
    UserId,
};
use chrono::NaiveDate;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;

/// A reservation with plausible defaults, kicking off 2025-01-02 18:00
#[must_use]
pub fn fixture(id: u64, status: ReservationStatus) -> Reservation {
    let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap_or_default();
    let at = |hour| day.and_hms_opt(hour, 0, 0).unwrap_or_default();

    Reservation {
        id: ReservationId::new(id),
        facility_id: FacilityId::new(1),
        facility_name: "Terrain Central".to_string(),
        facility_location: "Dakar, Plateau".to_string(),
        starts_at: at(18),
        ends_at: at(20),
        duration_hours: 2.0,
        status,
        organizer_name: format!("Organizer {id}"),
        registered_players: 6,
        max_players: 10,
        price_per_player: 1500,
        description: String::new(),
    }
}

/// Arguments of one recorded page fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchCall {
    /// Requested bucket
    pub status: ReservationStatus,
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub page_size: u32,
    /// Server-side filters
    pub query: ReservationQuery,
}

#[derive(Default)]
struct Inner {
    records: Vec<Reservation>,
    chart: WeeklyChart,
    fetch_failures: HashMap<ReservationStatus, Option<String>>,
    chart_failure: Option<Option<String>>,
    confirm_failure: Option<Option<String>>,
    cancel_failure: Option<Option<String>>,
    fetch_calls: Vec<FetchCall>,
    chart_calls: Vec<(DateRange, Option<FacilityId>)>,
    confirm_calls: Vec<(ReservationId, UserId)>,
    cancel_calls: Vec<(ReservationId, Option<String>, Option<UserId>)>,
    gate: Option<Arc<Semaphore>>,
}

/// In-memory implementation of [`ReservationService`]
///
/// Clones share the same records, so a test can keep one handle while the
/// store owns another.
#[derive(Clone, Default)]
pub struct InMemoryReservationService {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryReservationService {
    /// Creates an empty service
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service seeded with `records`
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = Reservation>) -> Self {
        let service = Self::new();
        for record in records {
            service.insert(record);
        }
        service
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a record, replacing any record with the same id
    pub fn insert(&self, record: Reservation) {
        let mut inner = self.lock();
        inner.records.retain(|r| r.id != record.id);
        inner.records.push(record);
    }

    /// Current server-side status of a record
    #[must_use]
    pub fn status_of(&self, id: ReservationId) -> Option<ReservationStatus> {
        self.lock()
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
    }

    /// Sets the series returned by weekly chart fetches
    pub fn set_chart(&self, chart: WeeklyChart) {
        self.lock().chart = chart;
    }

    /// Makes page fetches for `status` fail with a 500 until [`Self::heal`]
    pub fn fail_fetch(&self, status: ReservationStatus, message: Option<&str>) {
        self.lock()
            .fetch_failures
            .insert(status, message.map(str::to_string));
    }

    /// Makes weekly chart fetches fail until [`Self::heal`]
    pub fn fail_chart(&self, message: Option<&str>) {
        self.lock().chart_failure = Some(message.map(str::to_string));
    }

    /// Makes confirm calls fail until [`Self::heal`]
    pub fn fail_confirm(&self, message: Option<&str>) {
        self.lock().confirm_failure = Some(message.map(str::to_string));
    }

    /// Makes cancel calls fail until [`Self::heal`]
    pub fn fail_cancel(&self, message: Option<&str>) {
        self.lock().cancel_failure = Some(message.map(str::to_string));
    }

    /// Removes every injected failure
    pub fn heal(&self) {
        let mut inner = self.lock();
        inner.fetch_failures.clear();
        inner.chart_failure = None;
        inner.confirm_failure = None;
        inner.cancel_failure = None;
    }

    /// Page fetches issued so far
    #[must_use]
    pub fn fetch_calls(&self) -> Vec<FetchCall> {
        self.lock().fetch_calls.clone()
    }

    /// Number of page fetches issued so far
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.lock().fetch_calls.len()
    }

    /// Weekly chart fetches issued so far
    #[must_use]
    pub fn chart_calls(&self) -> Vec<(DateRange, Option<FacilityId>)> {
        self.lock().chart_calls.clone()
    }

    /// Confirm calls issued so far
    #[must_use]
    pub fn confirm_calls(&self) -> Vec<(ReservationId, UserId)> {
        self.lock().confirm_calls.clone()
    }

    /// Cancel calls issued so far
    #[must_use]
    pub fn cancel_calls(&self) -> Vec<(ReservationId, Option<String>, Option<UserId>)> {
        self.lock().cancel_calls.clone()
    }

    /// Holds page fetches and mutations in flight until released
    ///
    /// Requests issued after this call wait for a permit. Chart fetches are
    /// never held.
    pub fn hold_requests(&self) {
        self.lock().gate = Some(Arc::new(Semaphore::new(0)));
    }

    /// Lets `count` held requests complete, in issue order
    pub fn release_requests(&self, count: usize) {
        if let Some(gate) = &self.lock().gate {
            gate.add_permits(count);
        }
    }

    /// Releases every held request and stops holding new ones
    pub fn open_requests(&self) {
        if let Some(gate) = self.lock().gate.take() {
            gate.close();
        }
    }

    fn gate(&self) -> Option<Arc<Semaphore>> {
        self.lock().gate.clone()
    }
}

/// Waits for a permit; a closed gate lets everything through
async fn pass(gate: Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }
}

fn server_error(status: u16, message: Option<String>) -> ServiceError {
    ServiceError::Server { status, message }
}

fn paginate(records: Vec<Reservation>, page: u32, page_size: u32) -> ReservationPage {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = records.len();
    let per_page = page_size as usize;
    let total_pages = u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX);
    let skip = (page as usize - 1).saturating_mul(per_page);

    ReservationPage {
        items: records.into_iter().skip(skip).take(per_page).collect(),
        pagination: Pagination {
            page,
            total_pages,
            total: total as u64,
            has_next_page: page < total_pages,
        },
    }
}

impl ReservationService for InMemoryReservationService {
    fn fetch_reservations(
        &self,
        status: ReservationStatus,
        page: u32,
        page_size: u32,
        query: ReservationQuery,
    ) -> BoxFuture<'static, ServiceResult<ReservationPage>> {
        self.lock().fetch_calls.push(FetchCall {
            status,
            page,
            page_size,
            query,
        });
        let gate = self.gate();
        let service = self.clone();

        Box::pin(async move {
            pass(gate).await;

            let inner = service.lock();
            if let Some(message) = inner.fetch_failures.get(&status) {
                return Err(server_error(500, message.clone()));
            }

            let matching = inner
                .records
                .iter()
                .filter(|r| r.status == status && query.matches(r))
                .cloned()
                .collect();
            Ok(paginate(matching, page, page_size))
        })
    }

    fn fetch_weekly_chart(
        &self,
        week: DateRange,
        facility_id: Option<FacilityId>,
    ) -> BoxFuture<'static, ServiceResult<WeeklyChart>> {
        let mut inner = self.lock();
        inner.chart_calls.push((week, facility_id));
        let result = match &inner.chart_failure {
            Some(message) => Err(server_error(500, message.clone())),
            None => Ok(inner.chart),
        };

        Box::pin(async move { result })
    }

    fn confirm_reservation(
        &self,
        id: ReservationId,
        approver: UserId,
    ) -> BoxFuture<'static, ServiceResult<()>> {
        self.lock().confirm_calls.push((id, approver));
        let gate = self.gate();
        let service = self.clone();

        Box::pin(async move {
            pass(gate).await;

            let mut inner = service.lock();
            if let Some(message) = &inner.confirm_failure {
                return Err(server_error(500, message.clone()));
            }

            let record = inner
                .records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| server_error(404, Some("Reservation not found".to_string())))?;
            if record.status != ReservationStatus::Pending {
                return Err(server_error(
                    409,
                    Some("Only pending reservations can be confirmed".to_string()),
                ));
            }
            record.status = ReservationStatus::Confirmed;
            Ok(())
        })
    }

    fn cancel_reservation(
        &self,
        id: ReservationId,
        reason: Option<String>,
        approver: Option<UserId>,
    ) -> BoxFuture<'static, ServiceResult<()>> {
        self.lock().cancel_calls.push((id, reason, approver));
        let gate = self.gate();
        let service = self.clone();

        Box::pin(async move {
            pass(gate).await;

            let mut inner = service.lock();
            if let Some(message) = &inner.cancel_failure {
                return Err(server_error(500, message.clone()));
            }

            let record = inner
                .records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| server_error(404, Some("Reservation not found".to_string())))?;
            if record.status == ReservationStatus::Cancelled {
                return Err(server_error(
                    409,
                    Some("Reservation already cancelled".to_string()),
                ));
            }
            record.status = ReservationStatus::Cancelled;
            Ok(())
        })
    }
}

impl std::fmt::Debug for InMemoryReservationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("InMemoryReservationService")
            .field("records", &inner.records.len())
            .field("fetch_calls", &inner.fetch_calls.len())
            .field("held", &inner.gate.is_some())
            .finish_non_exhaustive()
    }
}
