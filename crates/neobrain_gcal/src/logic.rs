// File: crates/neobrain_gcal/src/logic.rs
use chrono::{DateTime, Duration, Utc};
use neobrain_common::services::{CalendarEvent, CalendarService, TimeWindow};
use neobrain_common::NeoBrainError;
use thiserror::Error;
use tracing::{debug, info};

/// The Calendar API refuses larger pages.
pub const MAX_PAGE_SIZE: u32 = 2500;

/// Length of the window used when no end is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

#[derive(Error, Debug)]
pub enum GcalError {
    #[error("OAuth token is missing field: {0}")]
    MissingTokenField(String),
    #[error("page size must be between 1 and 2500, got {0}")]
    InvalidPageSize(u32),
    #[error("time window ends before it starts: {0} > {1}")]
    InvalidWindow(DateTime<Utc>, DateTime<Utc>),
    #[error("failed to build HTTPS connector: {0}")]
    Connector(String),
}

impl From<GcalError> for NeoBrainError {
    fn from(err: GcalError) -> Self {
        match err {
            GcalError::MissingTokenField(field) => NeoBrainError::MissingTokenField(field),
            GcalError::InvalidPageSize(_) | GcalError::InvalidWindow(..) => {
                NeoBrainError::ValidationError(err.to_string())
            }
            GcalError::Connector(msg) => NeoBrainError::ConfigError(msg),
        }
    }
}

/// Fills in a missing window: the start defaults to `now`, the end to start + 7 days.
pub fn resolve_window(
    time_min: Option<DateTime<Utc>>,
    time_max: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<TimeWindow, GcalError> {
    let time_min = time_min.unwrap_or(now);
    let time_max = time_max.unwrap_or(time_min + Duration::days(DEFAULT_WINDOW_DAYS));
    if time_max < time_min {
        return Err(GcalError::InvalidWindow(time_min, time_max));
    }
    Ok(TimeWindow { time_min, time_max })
}

/// Lists all events of `calendar_id` in the window, following page cursors until exhausted.
///
/// Pages are fetched strictly one after another and concatenated in order.
pub async fn list_events(
    service: &dyn CalendarService,
    calendar_id: &str,
    time_min: Option<DateTime<Utc>>,
    time_max: Option<DateTime<Utc>>,
    page_size: u32,
) -> Result<Vec<CalendarEvent>, NeoBrainError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(GcalError::InvalidPageSize(page_size).into());
    }
    let window = resolve_window(time_min, time_max, Utc::now())?;

    let mut events = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = service
            .list_events_page(calendar_id, window, page_size, page_token.as_deref())
            .await?;
        pages += 1;
        events.extend(page.events);
        match page.next_page_token {
            Some(next) => page_token = Some(next),
            None => break,
        }
    }

    info!(
        "listed {} events from {} in {} page(s) ({} .. {})",
        events.len(),
        calendar_id,
        pages,
        window.time_min,
        window.time_max
    );
    Ok(events)
}

/// Updates the event with `event_id` (fields set on `event` only), or inserts `event`.
///
/// Remote failures propagate unchanged; there is no retry and no conflict detection.
pub async fn upsert_event(
    service: &dyn CalendarService,
    calendar_id: &str,
    event: CalendarEvent,
    event_id: Option<&str>,
) -> Result<CalendarEvent, NeoBrainError> {
    debug!(
        "upserting event {} in {}",
        event_id.unwrap_or("<new>"),
        calendar_id
    );
    service.upsert_event(calendar_id, event, event_id).await
}
