// --- File: crates/neobrain_common/src/services.rs ---
//! Service abstractions for the remote calendar.
//!
//! Handlers and workflows depend on these traits rather than on the Google
//! client, so the same logic runs against the in-memory service in tests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::NeoBrainError;
use crate::models::OAuthToken;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// Start or end of an event: a timed instant or an all-day date.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    pub date_time: Option<DateTime<Utc>>,
    pub date: Option<NaiveDate>,
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn at(date_time: DateTime<Utc>) -> Self {
        Self {
            date_time: Some(date_time),
            ..Default::default()
        }
    }

    pub fn all_day(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }

    /// Instant used for ordering and window checks; all-day dates count from UTC midnight.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.date_time.or_else(|| {
            self.date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
    }
}

/// A calendar event as read from, or written to, the remote calendar.
///
/// On writes only the fields that are `Some` (and non-empty properties) are sent.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    /// Private extended properties visible only to this calendar's owner.
    #[serde(default)]
    pub private_properties: BTreeMap<String, String>,
}

/// One page of an event listing.
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<CalendarEvent>,
    pub next_page_token: Option<String>,
}

/// A closed time window `[time_min, time_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
}

/// Operations the remote calendar must support.
pub trait CalendarService: Send + Sync {
    /// Fetch one page of single (expanded) events ordered by start time.
    fn list_events_page<'a>(
        &'a self,
        calendar_id: &'a str,
        window: TimeWindow,
        page_size: u32,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, EventPage, NeoBrainError>;

    /// Patch the event with `event_id`, or insert `event` when no id is given.
    fn upsert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: CalendarEvent,
        event_id: Option<&'a str>,
    ) -> BoxFuture<'a, CalendarEvent, NeoBrainError>;
}

/// Builds a calendar service acting on behalf of the user holding `token`.
pub trait CalendarConnector: Send + Sync {
    fn connect(&self, token: &OAuthToken) -> Result<Arc<dyn CalendarService>, NeoBrainError>;
}
