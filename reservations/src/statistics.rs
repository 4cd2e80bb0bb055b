//! Dashboard statistics derived from the loaded buckets.
//!
//! Everything here is a pure function of the bucket contents and the weekly
//! chart series. Counts reflect what is loaded, not server-side totals.

use crate::bucket::BucketStore;
use crate::types::{Reservation, ReservationStatus};
use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Placeholder shown when no confirmed match exists
pub const NO_POPULAR_TIME: &str = "--";

/// Revenue per day for one Monday-to-Sunday week
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyChart {
    /// Revenue for Monday through Sunday, in minor currency units
    pub daily_revenue: [u64; 7],
}

impl WeeklyChart {
    /// Sum of the seven days
    #[must_use]
    pub fn total(&self) -> u64 {
        self.daily_revenue.iter().sum()
    }
}

/// Summary metrics for the manager dashboard
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Statistics {
    /// Σ price × registered players over confirmed matches
    pub revenue: u64,
    /// Number of confirmed matches
    pub matches: usize,
    /// Σ registered players over confirmed matches
    pub players: u64,
    /// `players / matches`, one decimal
    pub average_players: f64,
    /// Registered players over capacity for confirmed matches, percent, one decimal
    pub occupancy_rate: f64,
    /// Most frequent two-hour kick-off slot among confirmed matches
    pub popular_time: String,
    /// Loaded records across all buckets
    pub reservations: usize,
    /// Loaded confirmed records
    pub reservations_confirmed: usize,
    /// Loaded pending records
    pub reservations_pending: usize,
    /// Loaded cancelled records
    pub reservations_cancelled: usize,
    /// Weekly chart series
    pub weekly_revenue: [u64; 7],
    /// Sum of the weekly chart series
    pub weekly_total: u64,
}

impl Default for Statistics {
    fn default() -> Self {
        compute(&BucketStore::default(), &WeeklyChart::default())
    }
}

/// Computes the dashboard statistics
#[must_use]
#[allow(clippy::cast_precision_loss)] // player counts are far below 2^52
pub fn compute(buckets: &BucketStore, chart: &WeeklyChart) -> Statistics {
    let confirmed = &buckets.confirmed.items;

    let revenue = confirmed.iter().map(Reservation::revenue).sum();
    let matches = confirmed.len();
    let players: u64 = confirmed
        .iter()
        .map(|r| u64::from(r.registered_players))
        .sum();
    let capacity: u64 = confirmed.iter().map(|r| u64::from(r.max_players)).sum();

    let average_players = if matches == 0 {
        0.0
    } else {
        round_one_decimal(players as f64 / matches as f64)
    };

    let occupancy_rate = if capacity == 0 {
        0.0
    } else {
        round_one_decimal(players as f64 * 100.0 / capacity as f64)
    };

    let popular_time = popular_start_hour(confirmed)
        .map_or_else(|| NO_POPULAR_TIME.to_string(), slot_label);

    let reservations_pending = buckets.len(ReservationStatus::Pending);
    let reservations_cancelled = buckets.len(ReservationStatus::Cancelled);

    Statistics {
        revenue,
        matches,
        players,
        average_players,
        occupancy_rate,
        popular_time,
        reservations: reservations_pending + matches + reservations_cancelled,
        reservations_confirmed: matches,
        reservations_pending,
        reservations_cancelled,
        weekly_revenue: chart.daily_revenue,
        weekly_total: chart.total(),
    }
}

/// Label of the two-hour slot starting at `hour`, e.g. `18h-20h`
#[must_use]
pub fn slot_label(hour: u32) -> String {
    format!("{hour}h-{}h", (hour + 2) % 24)
}

/// Start hour occurring most often; ties go to the hour seen first
fn popular_start_hour(reservations: &[Reservation]) -> Option<u32> {
    let mut counts: Vec<(u32, usize)> = Vec::new();
    for reservation in reservations {
        let hour = reservation.starts_at.hour();
        match counts.iter_mut().find(|(h, _)| *h == hour) {
            Some((_, count)) => *count += 1,
            None => counts.push((hour, 1)),
        }
    }

    let mut best: Option<(u32, usize)> = None;
    for (hour, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((hour, count));
        }
    }
    best.map(|(hour, _)| hour)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::mocks::fixture;
    use crate::types::{Pagination, ReservationStatus::*};
    use chrono::NaiveDate;

    fn confirmed_at(id: u64, hour: u32, price: u32, registered: u32) -> Reservation {
        let mut r = fixture(id, Confirmed);
        r.starts_at = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        r.price_per_player = price;
        r.registered_players = registered;
        r.max_players = 10;
        r
    }

    fn store_with_confirmed(items: Vec<Reservation>) -> BucketStore {
        let mut store = BucketStore::default();
        store.replace_page(Confirmed, 1, items, Pagination::default());
        store
    }

    #[test]
    fn aggregates_confirmed_bucket() {
        let store = store_with_confirmed(vec![
            confirmed_at(1, 18, 1000, 5),
            confirmed_at(2, 20, 2000, 3),
        ]);

        let stats = compute(&store, &WeeklyChart::default());

        assert_eq!(stats.revenue, 11_000);
        assert_eq!(stats.players, 8);
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.average_players, 4.0);
        assert_eq!(stats.occupancy_rate, 40.0);
    }

    #[test]
    fn pending_and_cancelled_do_not_count_towards_revenue() {
        let mut store = store_with_confirmed(vec![confirmed_at(1, 18, 1000, 2)]);
        store.replace_page(Pending, 1, vec![fixture(2, Pending)], Pagination::default());
        store.replace_page(
            Cancelled,
            1,
            vec![fixture(3, Cancelled), fixture(4, Cancelled)],
            Pagination::default(),
        );

        let stats = compute(&store, &WeeklyChart::default());

        assert_eq!(stats.revenue, 2000);
        assert_eq!(stats.reservations, 4);
        assert_eq!(stats.reservations_pending, 1);
        assert_eq!(stats.reservations_confirmed, 1);
        assert_eq!(stats.reservations_cancelled, 2);
    }

    #[test]
    fn empty_confirmed_uses_placeholders() {
        let stats = Statistics::default();
        assert_eq!(stats.popular_time, NO_POPULAR_TIME);
        assert_eq!(stats.average_players, 0.0);
        assert_eq!(stats.occupancy_rate, 0.0);
        assert_eq!(stats.reservations, 0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let store = store_with_confirmed(vec![
            confirmed_at(1, 9, 0, 3),
            confirmed_at(2, 9, 0, 3),
            confirmed_at(3, 9, 0, 4),
        ]);
        assert_eq!(compute(&store, &WeeklyChart::default()).average_players, 3.3);
    }

    #[test]
    fn popular_time_picks_most_frequent_hour() {
        let store = store_with_confirmed(vec![
            confirmed_at(1, 10, 0, 1),
            confirmed_at(2, 18, 0, 1),
            confirmed_at(3, 18, 0, 1),
        ]);
        assert_eq!(compute(&store, &WeeklyChart::default()).popular_time, "18h-20h");
    }

    #[test]
    fn popular_time_tie_goes_to_first_seen() {
        let store = store_with_confirmed(vec![
            confirmed_at(1, 20, 0, 1),
            confirmed_at(2, 8, 0, 1),
            confirmed_at(3, 8, 0, 1),
            confirmed_at(4, 20, 0, 1),
        ]);
        assert_eq!(compute(&store, &WeeklyChart::default()).popular_time, "20h-22h");
    }

    #[test]
    fn slot_wraps_past_midnight() {
        assert_eq!(slot_label(23), "23h-1h");
    }

    #[test]
    fn weekly_series_is_passed_through() {
        let chart = WeeklyChart {
            daily_revenue: [100, 0, 250, 0, 0, 900, 50],
        };
        let stats = compute(&BucketStore::default(), &chart);
        assert_eq!(stats.weekly_revenue, chart.daily_revenue);
        assert_eq!(stats.weekly_total, 1300);
    }
}
