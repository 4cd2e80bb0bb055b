//! HTTP implementation of [`ReservationService`]

use crate::config::Config;
use crate::filters::{DateRange, ReservationQuery};
use crate::service::{ReservationService, ServiceError, ServiceResult};
use crate::statistics::WeeklyChart;
use crate::types::{
    FacilityId, Pagination, Reservation, ReservationId, ReservationPage, ReservationStatus,
    UserId,
};
use chrono::NaiveDateTime;
use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

/// Client for the booking API
#[derive(Clone)]
pub struct HttpReservationService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpReservationService {
    /// Create a client for `base_url`, e.g. `https://api.example.com/api`
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Create a client from loaded configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.clone(), config.api_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl std::fmt::Debug for HttpReservationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReservationService")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// Sends a request and returns the body of a 2xx response
async fn execute(request: RequestBuilder) -> ServiceResult<String> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!(error = %e, "Booking API unreachable");
        ServiceError::Network(e.to_string())
    })?;

    let status = response.status();
    tracing::debug!(%status, "Booking API responded");
    let body = response
        .text()
        .await
        .map_err(|e| ServiceError::Network(e.to_string()))?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(ServiceError::Server {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Extracts `message` from an error body
#[must_use]
pub fn error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationDto {
    id: u64,
    terrain_id: u64,
    terrain_name: String,
    #[serde(default)]
    terrain_location: String,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    duration: f32,
    status: String,
    organizer_name: String,
    registered_players: u32,
    max_players: u32,
    price_per_player: u32,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<ReservationDto> for Reservation {
    type Error = ServiceError;

    fn try_from(dto: ReservationDto) -> Result<Self, Self::Error> {
        let status: ReservationStatus = dto
            .status
            .parse()
            .map_err(|e: crate::types::ParseStatusError| ServiceError::Decode(e.to_string()))?;

        let reservation = Self {
            id: ReservationId::new(dto.id),
            facility_id: FacilityId::new(dto.terrain_id),
            facility_name: dto.terrain_name,
            facility_location: dto.terrain_location,
            starts_at: dto.start_time,
            ends_at: dto.end_time,
            duration_hours: dto.duration,
            status,
            organizer_name: dto.organizer_name,
            registered_players: dto.registered_players,
            max_players: dto.max_players,
            price_per_player: dto.price_per_player,
            description: dto.description.unwrap_or_default(),
        };

        if reservation.is_consistent() {
            Ok(reservation)
        } else {
            Err(ServiceError::InvalidRecord { id: reservation.id })
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationDto {
    page: u32,
    total_pages: u32,
    total: u64,
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct PageDto {
    data: Vec<ReservationDto>,
    pagination: PaginationDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartDto {
    daily_revenue: Vec<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmBody {
    approver_id: UserId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    approver_id: Option<UserId>,
}

/// Decodes a `GET /reservations` body
///
/// Records over capacity are skipped with a warning so the rest of the page
/// still loads.
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] for malformed JSON or an unknown status.
pub fn decode_page(body: &str) -> ServiceResult<ReservationPage> {
    let dto: PageDto =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;

    let mut items = Vec::with_capacity(dto.data.len());
    for record in dto.data {
        match Reservation::try_from(record) {
            Ok(reservation) => items.push(reservation),
            Err(ServiceError::InvalidRecord { id }) => {
                tracing::warn!(%id, "Skipping reservation with more players than places");
            },
            Err(e) => return Err(e),
        }
    }

    Ok(ReservationPage {
        items,
        pagination: Pagination {
            page: dto.pagination.page,
            total_pages: dto.pagination.total_pages,
            total: dto.pagination.total,
            has_next_page: dto.pagination.has_next_page,
        },
    })
}

/// Decodes a `GET /statistics/weekly` body
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] unless the series has exactly seven days.
pub fn decode_chart(body: &str) -> ServiceResult<WeeklyChart> {
    let dto: ChartDto =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;

    let daily_revenue: [u64; 7] = dto.daily_revenue.try_into().map_err(|days: Vec<u64>| {
        ServiceError::Decode(format!("expected 7 days of revenue, got {}", days.len()))
    })?;

    Ok(WeeklyChart { daily_revenue })
}

impl ReservationService for HttpReservationService {
    fn fetch_reservations(
        &self,
        status: ReservationStatus,
        page: u32,
        page_size: u32,
        query: ReservationQuery,
    ) -> BoxFuture<'static, ServiceResult<ReservationPage>> {
        let mut params = vec![
            ("status", status.as_str().to_string()),
            ("page", page.to_string()),
            ("limit", page_size.to_string()),
        ];
        if let Some(facility) = query.facility_id {
            params.push(("terrainId", facility.to_string()));
        }
        if let Some(from) = query.date_from {
            params.push(("dateFrom", from.to_string()));
        }
        if let Some(to) = query.date_to {
            params.push(("dateTo", to.to_string()));
        }

        let request = self.authorized(self.client.get(self.url("/reservations")).query(&params));
        let span = tracing::info_span!("fetch_reservations", %status, page, page_size, ?query);

        Box::pin(
            async move {
                let body = execute(request).await?;
                decode_page(&body)
            }
            .instrument(span),
        )
    }

    fn fetch_weekly_chart(
        &self,
        week: DateRange,
        facility_id: Option<FacilityId>,
    ) -> BoxFuture<'static, ServiceResult<WeeklyChart>> {
        let mut params = vec![
            ("dateFrom", week.start.to_string()),
            ("dateTo", week.end.to_string()),
        ];
        if let Some(facility) = facility_id {
            params.push(("terrainId", facility.to_string()));
        }

        let request = self.authorized(
            self.client
                .get(self.url("/statistics/weekly"))
                .query(&params),
        );

        let span = tracing::info_span!("fetch_weekly_chart", ?week, ?facility_id);

        Box::pin(
            async move {
                let body = execute(request).await?;
                decode_chart(&body)
            }
            .instrument(span),
        )
    }

    fn confirm_reservation(
        &self,
        id: ReservationId,
        approver: UserId,
    ) -> BoxFuture<'static, ServiceResult<()>> {
        let request = self.authorized(
            self.client
                .patch(self.url(&format!("/reservations/{id}/confirm")))
                .json(&ConfirmBody {
                    approver_id: approver,
                }),
        );
        let span = tracing::info_span!("confirm_reservation", %id, %approver);

        Box::pin(async move { execute(request).await.map(drop) }.instrument(span))
    }

    fn cancel_reservation(
        &self,
        id: ReservationId,
        reason: Option<String>,
        approver: Option<UserId>,
    ) -> BoxFuture<'static, ServiceResult<()>> {
        let span = tracing::info_span!("cancel_reservation", %id, ?approver);
        let request = self.authorized(
            self.client
                .patch(self.url(&format!("/reservations/{id}/cancel")))
                .json(&CancelBody {
                    reason,
                    approver_id: approver,
                }),
        );

        Box::pin(async move { execute(request).await.map(drop) }.instrument(span))
    }
}
