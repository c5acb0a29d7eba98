// --- File: crates/neobrain_autocalendar/src/normalize.rs ---
//! Turns raw calendar events into display rows and splits the `#code` off titles.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use neobrain_common::services::{CalendarEvent, EventTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Private extended property that may carry the code alongside the title.
pub const CODE_PROPERTY: &str = "neobrain_code";

/// Separator written between code and description.
pub const TITLE_SEPARATOR: &str = " – ";

// "#12345 – desc", "#12345 - desc", "#12345—desc" or "#12345 desc"
static TITLE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(\d+)(?:\s*[-–—]\s*|\s+)(.*)").expect("title code pattern is valid")
});

static BARE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\d+$").expect("bare code pattern is valid"));

/// True for codes of the form `#<digits>`, the only shape `extract_code` reads back.
pub fn is_valid_code(code: &str) -> bool {
    BARE_CODE.is_match(code)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCode {
    /// `#<digits>`, or empty when the title carries no code.
    pub code: String,
    pub description: String,
}

/// Splits a leading `#<digits>` code from a title.
///
/// Total: an unmatched title gives an empty code and the trimmed title as description.
pub fn extract_code(title: &str) -> TitleCode {
    let title = title.trim();
    match TITLE_CODE.captures(title) {
        Some(caps) => TitleCode {
            code: format!("#{}", &caps[1]),
            description: caps[2].trim().to_string(),
        },
        None => TitleCode {
            code: String::new(),
            description: title.to_string(),
        },
    }
}

/// `"<code> – <description>"`, falling back to the raw title when the description is empty.
pub fn reconstruct_title(code: &str, description: &str, title_raw: &str) -> String {
    let text = if description.is_empty() {
        title_raw
    } else {
        description
    };
    format!("{}{}{}", code, TITLE_SEPARATOR, text)
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("event has no id")]
    MissingId,
    #[error("event {0} has no start")]
    MissingStart(String),
}

/// One event as shown in the table.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub id: String,
    pub date: NaiveDate,
    /// Start time as `HH:MM` in the display zone.
    pub time: String,
    pub duration_minutes: i64,
    /// Duration as `H:MM`.
    pub duration: String,
    pub title_raw: String,
    pub code: String,
    pub description: String,
}

/// Local wall-clock time of an event boundary; all-day dates start at midnight.
fn local_time(time: &EventTime, tz: &Tz) -> Option<NaiveDateTime> {
    match (time.date_time, time.date) {
        (Some(at), _) => Some(at.with_timezone(tz).naive_local()),
        (None, Some(date)) => date.and_hms_opt(0, 0, 0),
        (None, None) => None,
    }
}

fn duration_between(start: &EventTime, end: Option<&EventTime>, tz: &Tz) -> Duration {
    let Some(end) = end else {
        return Duration::zero();
    };
    let elapsed = match (start.date_time, end.date_time) {
        (Some(s), Some(e)) => Some(e - s),
        _ => match (local_time(start, tz), local_time(end, tz)) {
            (Some(s), Some(e)) => Some(e - s),
            _ => None,
        },
    };
    elapsed
        .filter(|d| *d > Duration::zero())
        .unwrap_or_else(Duration::zero)
}

pub fn format_duration(minutes: i64) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Derives the display row of `event` in zone `tz`.
///
/// A title without a code falls back to the `neobrain_code` private property.
pub fn normalize_event(event: &CalendarEvent, tz: &Tz) -> Result<NormalizedRow, NormalizeError> {
    let id = event
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(NormalizeError::MissingId)?;
    let start = event
        .start
        .as_ref()
        .filter(|s| s.date_time.is_some() || s.date.is_some())
        .ok_or_else(|| NormalizeError::MissingStart(id.to_string()))?;
    let local_start =
        local_time(start, tz).ok_or_else(|| NormalizeError::MissingStart(id.to_string()))?;

    let duration_minutes = duration_between(start, event.end.as_ref(), tz).num_minutes();

    let title_raw = event.summary.as_deref().unwrap_or("").trim().to_string();
    let TitleCode {
        mut code,
        description,
    } = extract_code(&title_raw);
    if code.is_empty() {
        if let Some(stored) = event.private_properties.get(CODE_PROPERTY) {
            code = stored.trim().to_string();
        }
    }

    Ok(NormalizedRow {
        id: id.to_string(),
        date: local_start.date(),
        time: local_start.format("%H:%M").to_string(),
        duration_minutes,
        duration: format_duration(duration_minutes),
        title_raw,
        code,
        description,
    })
}

/// Normalizes every event, skipping those without id or start.
pub fn normalize_events(events: &[CalendarEvent], tz: &Tz) -> Vec<NormalizedRow> {
    events
        .iter()
        .filter_map(|event| match normalize_event(event, tz) {
            Ok(row) => Some(row),
            Err(err) => {
                tracing::debug!("skipping event: {}", err);
                None
            }
        })
        .collect()
}

/// UTC instant of local midnight starting `date` in `tz`.
pub fn start_of_day(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(*tz).earliest())
        .map(|local| local.with_timezone(&Utc))
}

/// UTC instant of the last second of `date` in `tz`.
pub fn end_of_day(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59)
        .and_then(|naive| naive.and_local_timezone(*tz).latest())
        .map(|local| local.with_timezone(&Utc))
}
