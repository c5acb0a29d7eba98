// --- File: crates/neobrain_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! This module provides an implementation of the CalendarService trait for Google Calendar.

use google_calendar3::api::{Event, EventDateTime, EventExtendedProperties};
use neobrain_common::remote_api_error;
use neobrain_common::services::{
    BoxFuture, CalendarEvent, CalendarService, EventPage, EventTime, TimeWindow,
};
use neobrain_common::NeoBrainError;
use std::sync::Arc;
use tracing::debug;

use crate::auth::HubType;

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

impl CalendarService for GoogleCalendarService {
    /// Lists one page of expanded single events ordered by start time.
    ///
    /// # Errors
    ///
    /// Any API failure is returned as `NeoBrainError::RemoteApiError` wrapping the library error.
    fn list_events_page<'a>(
        &'a self,
        calendar_id: &'a str,
        window: TimeWindow,
        page_size: u32,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, EventPage, NeoBrainError> {
        Box::pin(async move {
            let max_results = i32::try_from(page_size).unwrap_or(i32::MAX);
            let mut call = self
                .calendar_hub
                .events()
                .list(calendar_id)
                .time_min(window.time_min)
                .time_max(window.time_max)
                .single_events(true)
                .order_by("startTime")
                .max_results(max_results);
            if let Some(token) = page_token {
                call = call.page_token(token);
            }

            let (_response, events) = call.doit().await.map_err(remote_api_error)?;

            let items = events.items.unwrap_or_default();
            debug!(
                "fetched {} events from {} (next page: {})",
                items.len(),
                calendar_id,
                events.next_page_token.is_some()
            );

            Ok(EventPage {
                events: items.into_iter().map(from_api_event).collect(),
                next_page_token: events.next_page_token.filter(|t| !t.is_empty()),
            })
        })
    }

    /// Patches the event when `event_id` is given, inserts it otherwise.
    ///
    /// Patch semantics: only the fields set on `event` are written.
    fn upsert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: CalendarEvent,
        event_id: Option<&'a str>,
    ) -> BoxFuture<'a, CalendarEvent, NeoBrainError> {
        Box::pin(async move {
            let body = to_api_event(event);
            let (_response, written) = match event_id {
                Some(id) => {
                    debug!("patching event {} in {}", id, calendar_id);
                    self.calendar_hub
                        .events()
                        .patch(body, calendar_id, id)
                        .doit()
                        .await
                }
                None => {
                    debug!("inserting event in {}", calendar_id);
                    self.calendar_hub
                        .events()
                        .insert(body, calendar_id)
                        .doit()
                        .await
                }
            }
            .map_err(remote_api_error)?;

            Ok(from_api_event(written))
        })
    }
}

/// Converts an API event into the shared calendar type.
pub fn from_api_event(event: Event) -> CalendarEvent {
    CalendarEvent {
        id: event.id,
        summary: event.summary,
        description: event.description,
        start: event.start.map(from_api_time),
        end: event.end.map(from_api_time),
        private_properties: event
            .extended_properties
            .and_then(|props| props.private)
            .map(|private| private.into_iter().collect())
            .unwrap_or_default(),
    }
}

/// Converts a shared calendar event into an API request body.
///
/// The id is never part of the body; it travels as a path parameter.
pub fn to_api_event(event: CalendarEvent) -> Event {
    let extended_properties = if event.private_properties.is_empty() {
        None
    } else {
        Some(EventExtendedProperties {
            private: Some(event.private_properties.into_iter().collect()),
            ..Default::default()
        })
    };

    Event {
        summary: event.summary,
        description: event.description,
        start: event.start.map(to_api_time),
        end: event.end.map(to_api_time),
        extended_properties,
        ..Default::default()
    }
}

fn from_api_time(time: EventDateTime) -> EventTime {
    EventTime {
        date_time: time.date_time,
        date: time.date,
        time_zone: time.time_zone,
    }
}

fn to_api_time(time: EventTime) -> EventDateTime {
    EventDateTime {
        date_time: time.date_time,
        date: time.date,
        time_zone: time.time_zone,
    }
}

/// In-memory calendar used by tests here and in dependent crates (feature `mock`).
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    /// Failure returned for ids registered with `fail_on`.
    #[derive(Debug, thiserror::Error)]
    #[error("mock calendar failure for event {0}")]
    pub struct MockRemoteError(pub String);

    /// Keeps events in memory and pages through them with offset tokens.
    #[derive(Default)]
    pub struct InMemoryCalendarService {
        events: Mutex<Vec<CalendarEvent>>,
        failing_ids: Mutex<HashSet<String>>,
        next_id: AtomicU64,
        list_calls: AtomicU64,
        upsert_calls: Mutex<Vec<Option<String>>>,
    }

    impl InMemoryCalendarService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_events(events: Vec<CalendarEvent>) -> Self {
            let service = Self::default();
            if let Ok(mut stored) = service.events.lock() {
                *stored = events;
            }
            service
        }

        /// Makes every upsert targeting `event_id` fail.
        pub fn fail_on(&self, event_id: &str) {
            if let Ok(mut ids) = self.failing_ids.lock() {
                ids.insert(event_id.to_string());
            }
        }

        pub fn events(&self) -> Vec<CalendarEvent> {
            self.events.lock().map(|e| e.clone()).unwrap_or_default()
        }

        pub fn event(&self, event_id: &str) -> Option<CalendarEvent> {
            self.events()
                .into_iter()
                .find(|e| e.id.as_deref() == Some(event_id))
        }

        /// Number of page requests served so far.
        pub fn list_calls(&self) -> u64 {
            self.list_calls.load(Ordering::SeqCst)
        }

        /// Target ids of upserts in call order (`None` for inserts).
        pub fn upsert_calls(&self) -> Vec<Option<String>> {
            self.upsert_calls
                .lock()
                .map(|c| c.clone())
                .unwrap_or_default()
        }

        fn sorted_in_window(&self, window: TimeWindow) -> Vec<CalendarEvent> {
            let mut events: Vec<CalendarEvent> = self
                .events()
                .into_iter()
                .filter(|e| {
                    e.start
                        .as_ref()
                        .and_then(EventTime::instant)
                        .map(|at| at >= window.time_min && at <= window.time_max)
                        .unwrap_or(false)
                })
                .collect();
            events.sort_by_key(|e| e.start.as_ref().and_then(EventTime::instant));
            events
        }
    }

    impl CalendarService for InMemoryCalendarService {
        fn list_events_page<'a>(
            &'a self,
            _calendar_id: &'a str,
            window: TimeWindow,
            page_size: u32,
            page_token: Option<&'a str>,
        ) -> BoxFuture<'a, EventPage, NeoBrainError> {
            Box::pin(async move {
                self.list_calls.fetch_add(1, Ordering::SeqCst);
                let offset = match page_token {
                    Some(token) => token.parse::<usize>().map_err(|_| {
                        remote_api_error(MockRemoteError(format!("bad page token {}", token)))
                    })?,
                    None => 0,
                };
                let all = self.sorted_in_window(window);
                let end = (offset + page_size as usize).min(all.len());
                let events = all.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();
                let next_page_token = (end < all.len()).then(|| end.to_string());
                Ok(EventPage {
                    events,
                    next_page_token,
                })
            })
        }

        fn upsert_event<'a>(
            &'a self,
            _calendar_id: &'a str,
            event: CalendarEvent,
            event_id: Option<&'a str>,
        ) -> BoxFuture<'a, CalendarEvent, NeoBrainError> {
            Box::pin(async move {
                if let Ok(mut calls) = self.upsert_calls.lock() {
                    calls.push(event_id.map(str::to_string));
                }
                let mut events = self
                    .events
                    .lock()
                    .map_err(|_| remote_api_error(MockRemoteError("poisoned".into())))?;

                match event_id {
                    Some(id) => {
                        let fails = self
                            .failing_ids
                            .lock()
                            .map(|ids| ids.contains(id))
                            .unwrap_or(false);
                        if fails {
                            return Err(remote_api_error(MockRemoteError(id.to_string())));
                        }
                        let stored = events
                            .iter_mut()
                            .find(|e| e.id.as_deref() == Some(id))
                            .ok_or_else(|| remote_api_error(MockRemoteError(id.to_string())))?;
                        if event.summary.is_some() {
                            stored.summary = event.summary;
                        }
                        if event.description.is_some() {
                            stored.description = event.description;
                        }
                        if event.start.is_some() {
                            stored.start = event.start;
                        }
                        if event.end.is_some() {
                            stored.end = event.end;
                        }
                        stored.private_properties.extend(event.private_properties);
                        Ok(stored.clone())
                    }
                    None => {
                        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                        let created = CalendarEvent {
                            id: Some(format!("mock{:04}", n)),
                            ..event
                        };
                        events.push(created.clone());
                        Ok(created)
                    }
                }
            })
        }
    }
}
