//! Per-status paginated collections.
//!
//! The store never performs I/O. It is mutated only by the reservation
//! reducer, one status bucket at a time.

use crate::types::{Pagination, Reservation, ReservationId, ReservationPatch, ReservationStatus};
use serde::Serialize;

/// Load state of one bucket
///
/// A single enum makes "loading and refreshing at the same time" unrepresentable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum LoadPhase {
    /// No request in flight
    #[default]
    Idle,
    /// Initial page-1 fetch
    Loading,
    /// Pull-to-refresh page-1 fetch; current items stay visible
    Refreshing,
    /// Fetch of the page after the last loaded one
    LoadingMore,
}

impl LoadPhase {
    /// Whether a request is in flight
    #[must_use]
    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The `loading` flag exposed to the UI
    #[must_use]
    pub const fn loading(self) -> bool {
        matches!(self, Self::Loading | Self::LoadingMore)
    }

    /// The `refreshing` flag exposed to the UI
    #[must_use]
    pub const fn refreshing(self) -> bool {
        matches!(self, Self::Refreshing)
    }
}

/// Paginated collection of reservations for one status
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBucket {
    /// Records in server page order, oldest-loaded first
    pub items: Vec<Reservation>,
    /// Pagination metadata of the last applied page
    pub pagination: Pagination,
    /// Request state
    pub phase: LoadPhase,
    /// Whether further pages may be requested
    pub has_more: bool,
    epoch: u64,
}

impl Default for StatusBucket {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            phase: LoadPhase::Idle,
            has_more: true,
            epoch: 0,
        }
    }
}

impl StatusBucket {
    /// Token of the most recently issued request
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a response carrying `epoch` may still be applied
    #[must_use]
    pub const fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Read-only view for the UI
    #[must_use]
    pub fn snapshot(&self) -> BucketSnapshot {
        BucketSnapshot {
            items: self.items.clone(),
            pagination: self.pagination,
            loading: self.phase.loading(),
            refreshing: self.phase.refreshing(),
            has_more: self.has_more,
        }
    }

    fn position(&self, id: ReservationId) -> Option<usize> {
        self.items.iter().position(|r| r.id == id)
    }
}

/// Snapshot of one bucket as rendered by the UI
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BucketSnapshot {
    /// Records in display order
    pub items: Vec<Reservation>,
    /// Pagination metadata
    pub pagination: Pagination,
    /// Initial or next-page fetch in flight
    pub loading: bool,
    /// Pull-to-refresh in flight
    pub refreshing: bool,
    /// Whether more pages can be requested
    pub has_more: bool,
}

/// The three status buckets
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BucketStore {
    /// Reservations awaiting a decision
    pub pending: StatusBucket,
    /// Confirmed reservations
    pub confirmed: StatusBucket,
    /// Cancelled reservations
    pub cancelled: StatusBucket,
}

impl BucketStore {
    /// Bucket for a status
    #[must_use]
    pub const fn bucket(&self, status: ReservationStatus) -> &StatusBucket {
        match status {
            ReservationStatus::Pending => &self.pending,
            ReservationStatus::Confirmed => &self.confirmed,
            ReservationStatus::Cancelled => &self.cancelled,
        }
    }

    /// Mutable bucket for a status
    pub const fn bucket_mut(&mut self, status: ReservationStatus) -> &mut StatusBucket {
        match status {
            ReservationStatus::Pending => &mut self.pending,
            ReservationStatus::Confirmed => &mut self.confirmed,
            ReservationStatus::Cancelled => &mut self.cancelled,
        }
    }

    /// Starts a request on a bucket
    ///
    /// Returns `None` when the bucket already has a request in flight (the
    /// new request is dropped, not queued). Otherwise enters `phase` and
    /// returns the request token that the response must carry.
    pub fn begin_load(&mut self, status: ReservationStatus, phase: LoadPhase) -> Option<u64> {
        let bucket = self.bucket_mut(status);
        if bucket.phase.is_busy() || !phase.is_busy() {
            return None;
        }

        bucket.phase = phase;
        bucket.epoch += 1;
        Some(bucket.epoch)
    }

    /// Applies a fetched page
    ///
    /// Page 1 replaces the items, later pages are appended. Pagination is
    /// always overwritten and the bucket returns to idle.
    pub fn replace_page(
        &mut self,
        status: ReservationStatus,
        page: u32,
        items: Vec<Reservation>,
        pagination: Pagination,
    ) {
        let bucket = self.bucket_mut(status);
        if page <= 1 {
            bucket.items = items;
        } else {
            bucket.items.extend(items);
        }
        bucket.pagination = pagination;
        bucket.has_more = pagination.has_next_page;
        bucket.phase = LoadPhase::Idle;
    }

    /// Sets the load state without touching items
    pub const fn set_loading(&mut self, status: ReservationStatus, phase: LoadPhase) {
        self.bucket_mut(status).phase = phase;
    }

    /// Moves a record to the head of another bucket, applying `patch`
    ///
    /// Returns `false` (and changes nothing) if `id` is not in `from`. A copy
    /// of the record already present in `to` is replaced, never duplicated.
    pub fn move_item(
        &mut self,
        from: ReservationStatus,
        to: ReservationStatus,
        id: ReservationId,
        patch: &ReservationPatch,
    ) -> bool {
        let source = self.bucket_mut(from);
        let Some(index) = source.position(id) else {
            return false;
        };
        let mut reservation = source.items.remove(index);
        patch.apply(&mut reservation);

        let destination = self.bucket_mut(to);
        destination.items.retain(|r| r.id != id);
        destination.items.insert(0, reservation);
        true
    }

    /// Empties a bucket after a filter change
    ///
    /// Pagination and load state are reset and the request token is bumped,
    /// so a response to a request issued before the clear is discarded.
    pub fn clear(&mut self, status: ReservationStatus) {
        let bucket = self.bucket_mut(status);
        let epoch = bucket.epoch + 1;
        *bucket = StatusBucket {
            epoch,
            ..StatusBucket::default()
        };
    }

    /// Empties every bucket
    pub fn clear_all(&mut self) {
        for status in ReservationStatus::ALL {
            self.clear(status);
        }
    }

    /// First status in `order` whose bucket holds `id`
    #[must_use]
    pub fn locate(
        &self,
        id: ReservationId,
        order: &[ReservationStatus],
    ) -> Option<ReservationStatus> {
        order
            .iter()
            .copied()
            .find(|status| self.bucket(*status).position(id).is_some())
    }

    /// Number of loaded records in a bucket
    #[must_use]
    pub fn len(&self, status: ReservationStatus) -> usize {
        self.bucket(status).items.len()
    }

    /// Whether every bucket is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        ReservationStatus::ALL.iter().all(|s| self.len(*s) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::fixture;
    use proptest::prelude::*;

    use ReservationStatus::{Cancelled, Confirmed, Pending};

    fn page(ids: std::ops::Range<u64>, status: ReservationStatus) -> Vec<Reservation> {
        ids.map(|id| fixture(id, status)).collect()
    }

    fn pagination(page: u32, has_next_page: bool) -> Pagination {
        Pagination {
            page,
            total_pages: 2,
            total: 20,
            has_next_page,
        }
    }

    #[test]
    fn first_page_replaces_later_pages_append() {
        let mut store = BucketStore::default();
        store.replace_page(Pending, 1, page(1..4, Pending), pagination(1, true));
        store.replace_page(Pending, 2, page(4..6, Pending), pagination(2, false));

        let ids: Vec<u64> = store.pending.items.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(!store.pending.has_more);
        assert_eq!(store.pending.pagination.page, 2);

        store.replace_page(Pending, 1, page(10..12, Pending), pagination(1, true));
        assert_eq!(store.len(Pending), 2);
        assert!(store.pending.has_more);
    }

    #[test]
    fn begin_load_is_single_flight() {
        let mut store = BucketStore::default();
        let first = store.begin_load(Confirmed, LoadPhase::Loading);
        assert_eq!(first, Some(1));
        assert_eq!(store.begin_load(Confirmed, LoadPhase::LoadingMore), None);
        assert_eq!(store.begin_load(Confirmed, LoadPhase::Refreshing), None);

        // Other buckets are independent
        assert_eq!(store.begin_load(Pending, LoadPhase::Refreshing), Some(1));
        assert!(store.pending.phase.refreshing());
        assert!(!store.pending.phase.loading());
    }

    #[test]
    fn begin_load_rejects_idle_phase() {
        let mut store = BucketStore::default();
        assert_eq!(store.begin_load(Pending, LoadPhase::Idle), None);
        assert_eq!(store.pending.epoch(), 0);
    }

    #[test]
    fn replace_page_returns_bucket_to_idle() {
        let mut store = BucketStore::default();
        store.begin_load(Cancelled, LoadPhase::Refreshing);
        store.replace_page(Cancelled, 1, page(1..2, Cancelled), pagination(1, false));
        assert_eq!(store.cancelled.phase, LoadPhase::Idle);
    }

    #[test]
    fn move_item_inserts_at_head_with_patch() {
        let mut store = BucketStore::default();
        store.replace_page(Pending, 1, page(1..4, Pending), pagination(1, false));
        store.replace_page(Confirmed, 1, page(10..12, Confirmed), pagination(1, false));

        let moved = store.move_item(
            Pending,
            Confirmed,
            ReservationId::new(2),
            &ReservationPatch::status(Confirmed),
        );

        assert!(moved);
        assert_eq!(store.len(Pending), 2);
        assert_eq!(store.confirmed.items[0].id, ReservationId::new(2));
        assert_eq!(store.confirmed.items[0].status, Confirmed);
        assert_eq!(store.len(Confirmed), 3);
    }

    #[test]
    fn move_item_missing_id_is_noop() {
        let mut store = BucketStore::default();
        store.replace_page(Pending, 1, page(1..3, Pending), pagination(1, false));
        let before = store.clone();

        let moved = store.move_item(
            Pending,
            Cancelled,
            ReservationId::new(99),
            &ReservationPatch::status(Cancelled),
        );

        assert!(!moved);
        assert_eq!(store, before);
    }

    #[test]
    fn clear_resets_bucket_and_invalidates_requests() {
        let mut store = BucketStore::default();
        store.replace_page(Pending, 1, page(1..3, Pending), pagination(1, false));
        let epoch = store.begin_load(Pending, LoadPhase::LoadingMore).unwrap_or_default();

        store.clear(Pending);

        assert!(store.pending.items.is_empty());
        assert!(store.pending.has_more);
        assert_eq!(store.pending.phase, LoadPhase::Idle);
        assert_eq!(store.pending.pagination, Pagination::default());
        assert!(!store.pending.is_current(epoch));
    }

    #[test]
    fn locate_follows_search_order() {
        let mut store = BucketStore::default();
        store.replace_page(Confirmed, 1, page(5..6, Confirmed), pagination(1, false));

        assert_eq!(
            store.locate(ReservationId::new(5), &[Pending, Confirmed]),
            Some(Confirmed)
        );
        assert_eq!(store.locate(ReservationId::new(6), &[Pending, Confirmed]), None);
    }

    #[test]
    fn snapshot_exposes_flags() {
        let mut store = BucketStore::default();
        store.begin_load(Pending, LoadPhase::LoadingMore);
        let snapshot = store.pending.snapshot();
        assert!(snapshot.loading);
        assert!(!snapshot.refreshing);
        assert!(snapshot.has_more);
    }

    proptest! {
        #[test]
        fn pages_accumulate_in_load_order(first in 0usize..20, second in 0usize..20) {
            let mut store = BucketStore::default();
            let first_ids = 1..=(first as u64);
            let second_ids = 1000..(1000 + second as u64);

            store.replace_page(Pending, 1, first_ids.clone().map(|id| fixture(id, Pending)).collect(), pagination(1, true));
            store.replace_page(Pending, 2, second_ids.clone().map(|id| fixture(id, Pending)).collect(), pagination(2, false));

            let ids: Vec<u64> = store.pending.items.iter().map(|r| r.id.get()).collect();
            let expected: Vec<u64> = first_ids.chain(second_ids).collect();
            prop_assert_eq!(ids, expected);
        }

        #[test]
        fn repeated_move_changes_destination_once(count in 1u64..15, target in 1u64..15, repeats in 1usize..4) {
            let mut store = BucketStore::default();
            store.replace_page(Pending, 1, (1..=count).map(|id| fixture(id, Pending)).collect(), pagination(1, false));

            let patch = ReservationPatch::status(Confirmed);
            let mut moves = 0;
            for _ in 0..repeats {
                if store.move_item(Pending, Confirmed, ReservationId::new(target), &patch) {
                    moves += 1;
                }
            }

            let expected = usize::from(target <= count);
            prop_assert_eq!(moves, expected);
            prop_assert_eq!(store.len(Confirmed), expected);
            prop_assert_eq!(store.len(Pending) + store.len(Confirmed), count as usize);
        }
    }
}
