//! Filter state: search text, facility, and reporting period.
//!
//! Only the facility and the *resolved* date range reach the server. The
//! search text is applied locally by [`matches_search`].

use crate::types::{FacilityId, Reservation};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Reporting period selected in the filter bar
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePeriod {
    /// Only today
    Today,
    /// The last seven days, today included
    Week,
    /// The last calendar month
    Month,
    /// The last three calendar months
    ThreeMonths,
    /// The last six calendar months
    SixMonths,
    /// The last twelve calendar months
    Year,
    /// No date restriction
    #[default]
    All,
    /// Explicit inclusive bounds chosen by the user
    Custom {
        /// First day included
        start: NaiveDate,
        /// Last day included
        end: NaiveDate,
    },
}

impl DatePeriod {
    /// Key used by the filter bar
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::ThreeMonths => "3months",
            Self::SixMonths => "6months",
            Self::Year => "year",
            Self::All => "all",
            Self::Custom { .. } => "custom",
        }
    }

    /// Resolves the period to concrete bounds relative to `today`
    ///
    /// Returns `None` for [`DatePeriod::All`]. Reversed custom bounds are swapped.
    #[must_use]
    pub fn resolve(&self, today: NaiveDate) -> Option<DateRange> {
        let months_back = |months: u32| {
            today
                .checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN)
        };

        let start = match *self {
            Self::All => return None,
            Self::Custom { start, end } => return Some(DateRange::new(start, end)),
            Self::Today => today,
            Self::Week => today.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN),
            Self::Month => months_back(1),
            Self::ThreeMonths => months_back(3),
            Self::SixMonths => months_back(6),
            Self::Year => months_back(12),
        };

        Some(DateRange::new(start, today))
    }
}

/// Error returned when parsing an unknown period key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePeriodError {
    /// The key is not one of the known periods
    #[error("unknown period: {0}")]
    Unknown(String),
    /// `custom` needs explicit bounds and cannot be parsed from its key
    #[error("custom periods need explicit bounds")]
    CustomWithoutBounds,
}

impl FromStr for DatePeriod {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "3months" => Ok(Self::ThreeMonths),
            "6months" => Ok(Self::SixMonths),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            "custom" => Err(ParsePeriodError::CustomWithoutBounds),
            other => Err(ParsePeriodError::Unknown(other.to_string())),
        }
    }
}

/// Inclusive date bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included
    pub start: NaiveDate,
    /// Last day included
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the bounds if given in reverse
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Monday to Sunday of the week containing `day`
    #[must_use]
    pub fn week_of(day: NaiveDate) -> Self {
        let offset = u64::from(day.weekday().num_days_from_monday());
        let monday = day.checked_sub_days(Days::new(offset)).unwrap_or(day);
        let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(monday);
        Self { start: monday, end: sunday }
    }

    /// Whether `day` falls inside the range
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Current filter selection
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text search over facility and organizer names
    pub search: String,
    /// Restrict to one facility
    pub facility_id: Option<FacilityId>,
    /// Reporting period
    pub period: DatePeriod,
}

impl FilterState {
    /// Merges a partial update
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(facility_id) = patch.facility_id {
            self.facility_id = facility_id;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
    }

    /// The server-relevant part of the filters, with the period resolved
    #[must_use]
    pub fn applied(&self, today: NaiveDate) -> AppliedFilters {
        AppliedFilters {
            facility_id: self.facility_id,
            range: self.period.resolve(today),
        }
    }
}

/// Partial filter update; unset fields are left unchanged
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterPatch {
    /// New search text
    pub search: Option<String>,
    /// New facility restriction (`Some(None)` clears it)
    pub facility_id: Option<Option<FacilityId>>,
    /// New period
    pub period: Option<DatePeriod>,
}

impl FilterPatch {
    /// Empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restrict to one facility
    #[must_use]
    pub const fn facility(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = Some(Some(facility_id));
        self
    }

    /// Remove the facility restriction
    #[must_use]
    pub const fn any_facility(mut self) -> Self {
        self.facility_id = Some(None);
        self
    }

    /// Set the period
    #[must_use]
    pub const fn period(mut self, period: DatePeriod) -> Self {
        self.period = Some(period);
        self
    }
}

/// Facility and resolved range last used to load the buckets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppliedFilters {
    /// Facility restriction
    pub facility_id: Option<FacilityId>,
    /// Resolved date bounds (`None` for all time)
    pub range: Option<DateRange>,
}

impl AppliedFilters {
    /// Query parameters sent with every page fetch
    #[must_use]
    pub fn query(&self) -> ReservationQuery {
        ReservationQuery {
            facility_id: self.facility_id,
            date_from: self.range.map(|r| r.start),
            date_to: self.range.map(|r| r.end),
        }
    }
}

/// Server-side filters of a page fetch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReservationQuery {
    /// Facility restriction
    pub facility_id: Option<FacilityId>,
    /// First day included
    pub date_from: Option<NaiveDate>,
    /// Last day included
    pub date_to: Option<NaiveDate>,
}

impl ReservationQuery {
    /// Whether a record satisfies this query
    #[must_use]
    pub fn matches(&self, reservation: &Reservation) -> bool {
        let day = reservation.starts_at.date();
        self.facility_id.is_none_or(|id| id == reservation.facility_id)
            && self.date_from.is_none_or(|from| day >= from)
            && self.date_to.is_none_or(|to| day <= to)
    }
}

/// Case-insensitive substring match on facility and organizer names
///
/// Only an empty needle matches every record; whitespace is matched literally.
#[must_use]
pub fn matches_search(reservation: &Reservation, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    reservation.facility_name.to_lowercase().contains(&needle)
        || reservation.organizer_name.to_lowercase().contains(&needle)
}
