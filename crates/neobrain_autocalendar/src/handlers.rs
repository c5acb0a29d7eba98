// File: crates/neobrain_autocalendar/src/handlers.rs
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use neobrain_common::services::CalendarConnector;
use neobrain_common::{config_error, AuthenticatedUser, NeoBrainError};
use neobrain_config::AppConfig;
use neobrain_gcal::list_events;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::filter::{CodeFilter, RowFilter};
use crate::logic::{
    batch_assign, confirm_code, resolve_date_range, suggestion_for, BatchReport, ConfirmOutcome,
    EventRef,
};
use crate::normalize::{end_of_day, normalize_events, start_of_day, NormalizedRow};

// Shared state for the autocalendar handlers
#[derive(Clone)]
pub struct AutocalendarState {
    pub config: Arc<AppConfig>,
    pub connector: Arc<dyn CalendarConnector>,
    pub time_zone: Tz,
}

impl AutocalendarState {
    pub fn new(
        config: Arc<AppConfig>,
        connector: Arc<dyn CalendarConnector>,
    ) -> Result<Self, NeoBrainError> {
        let time_zone = Tz::from_str(&config.gcal.time_zone)
            .map_err(|e| config_error(format!("gcal.time_zone: {}", e)))?;
        Ok(Self {
            config,
            connector,
            time_zone,
        })
    }

    fn calendar_id<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.config.gcal.calendar_id)
    }
}

#[cfg_attr(
    feature = "openapi",
    derive(utoipa::IntoParams),
    into_params(parameter_in = Query)
)]
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    /// First day fetched from the calendar (default: today - 7 days)
    pub start_date: Option<NaiveDate>,
    /// Last day fetched from the calendar (default: today + 7 days)
    pub end_date: Option<NaiveDate>,
    /// Display filter: first day shown
    pub from: Option<NaiveDate>,
    /// Display filter: last day shown
    pub to: Option<NaiveDate>,
    pub code: Option<CodeFilter>,
    /// Text searched in title and description
    pub q: Option<String>,
    pub calendar_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowView {
    #[serde(flatten)]
    pub row: NormalizedRow,
    pub suggested_code: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub calendar_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Events fetched before filtering
    pub total: usize,
    pub shown: usize,
    pub with_code: usize,
    pub without_code: usize,
    pub rows: Vec<RowView>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmRequest {
    pub calendar_id: Option<String>,
    #[serde(flatten)]
    pub event: EventRef,
    /// Code to write; omitted to accept the suggestion
    pub code: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub calendar_id: Option<String>,
    pub code: String,
    /// Selected events, in selection order
    pub events: Vec<EventRef>,
}

/// Fetches, normalizes and filters the user's events.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/autocalendar/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "Filtered rows with suggested codes", body = EventsResponse),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Login required"),
        (status = 502, description = "Calendar API error")
    ),
    tag = "Autocalendar"
))]
pub async fn list_events_handler(
    State(state): State<Arc<AutocalendarState>>,
    user: AuthenticatedUser,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsResponse>, NeoBrainError> {
    let today = Utc::now().with_timezone(&state.time_zone).date_naive();
    let (start_date, end_date) = resolve_date_range(
        query.start_date,
        query.end_date,
        today,
        &state.config.autocalendar,
    )?;
    let calendar_id = state.calendar_id(query.calendar_id.as_deref()).to_string();

    let time_min = start_of_day(start_date, &state.time_zone);
    let time_max = end_of_day(end_date, &state.time_zone);

    let service = state.connector.connect(&user.token)?;
    let events = list_events(
        service.as_ref(),
        &calendar_id,
        time_min,
        time_max,
        state.config.gcal.page_size,
    )
    .await?;

    let rows = normalize_events(&events, &state.time_zone);
    let filter = RowFilter {
        from: query.from,
        to: query.to,
        code: query.code.unwrap_or_default(),
        text: query.q,
    };
    let shown = filter.apply(&rows);
    let with_code = shown.iter().filter(|r| !r.code.is_empty()).count();

    info!(
        "{}: {} of {} events shown for {} .. {}",
        user.email,
        shown.len(),
        rows.len(),
        start_date,
        end_date
    );

    let prefix = &state.config.autocalendar.suggestion_prefix;
    Ok(Json(EventsResponse {
        calendar_id,
        start_date,
        end_date,
        total: rows.len(),
        shown: shown.len(),
        with_code,
        without_code: shown.len() - with_code,
        rows: shown
            .into_iter()
            .map(|row| RowView {
                suggested_code: suggestion_for(&row, prefix),
                row,
            })
            .collect(),
    }))
}

/// Confirms the suggested code of one event, or writes a replacement.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/autocalendar/confirm",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Event updated, or already carrying the code", body = ConfirmOutcome),
        (status = 400, description = "Empty code"),
        (status = 401, description = "Login required"),
        (status = 502, description = "Calendar API error")
    ),
    tag = "Autocalendar"
))]
pub async fn confirm_handler(
    State(state): State<Arc<AutocalendarState>>,
    user: AuthenticatedUser,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ConfirmOutcome>, NeoBrainError> {
    let calendar_id = state.calendar_id(request.calendar_id.as_deref());
    let service = state.connector.connect(&user.token)?;
    let outcome = confirm_code(
        service.as_ref(),
        calendar_id,
        &request.event,
        request.code.as_deref(),
        &state.config.autocalendar,
    )
    .await?;
    Ok(Json(outcome))
}

/// Assigns one code to all selected events; stops at the first failure.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/autocalendar/batch",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "All selected events updated", body = BatchReport),
        (status = 400, description = "Empty code or empty selection"),
        (status = 401, description = "Login required"),
        (status = 502, description = "Stopped at a failing event; report lists what was done", body = BatchReport)
    ),
    tag = "Autocalendar"
))]
pub async fn batch_handler(
    State(state): State<Arc<AutocalendarState>>,
    user: AuthenticatedUser,
    Json(request): Json<BatchRequest>,
) -> Result<(StatusCode, Json<BatchReport>), NeoBrainError> {
    let calendar_id = state.calendar_id(request.calendar_id.as_deref());
    let service = state.connector.connect(&user.token)?;
    let report = batch_assign(
        service.as_ref(),
        calendar_id,
        &request.events,
        &request.code,
        &state.config.autocalendar,
    )
    .await?;

    let status = if report.failed.is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    Ok((status, Json(report)))
}
