// --- File: crates/neobrain_autocalendar/src/logic.rs ---
use chrono::{Duration, NaiveDate};
use neobrain_common::logging::log_result;
use neobrain_common::services::{CalendarEvent, CalendarService};
use neobrain_common::{validation_error, NeoBrainError};
use neobrain_config::AutocalendarConfig;
use neobrain_gcal::upsert_event;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::normalize::{
    extract_code, is_valid_code, reconstruct_title, NormalizedRow, CODE_PROPERTY,
};

/// `<prefix><last four digits of the id>`, left-padded with zeros when the id has fewer.
pub fn suggest_code(prefix: &str, event_id: &str) -> String {
    let digits: Vec<char> = event_id.chars().filter(char::is_ascii_digit).collect();
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("{}{:0>4}", prefix, tail)
}

fn check_code(code: &str) -> Result<(), NeoBrainError> {
    if code.is_empty() {
        return Err(validation_error("enter a code"));
    }
    if !is_valid_code(code) {
        return Err(validation_error(format!(
            "code must look like #123, got {}",
            code
        )));
    }
    Ok(())
}

/// Suggestion for rows that have no code yet.
pub fn suggestion_for(row: &NormalizedRow, prefix: &str) -> Option<String> {
    row.code
        .is_empty()
        .then(|| suggest_code(prefix, &row.id))
}

/// An event the client wants to tag, identified by id and its current title.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub event_id: String,
    pub title: String,
    /// Code shown to the user when it came from the stored property rather than the title.
    #[serde(default)]
    pub current_code: Option<String>,
}

impl EventRef {
    pub fn from_row(row: &NormalizedRow) -> Self {
        Self {
            event_id: row.id.clone(),
            title: row.title_raw.clone(),
            current_code: (!row.code.is_empty()).then(|| row.code.clone()),
        }
    }
}

/// A title rewrite about to be sent to the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAssignment {
    pub event_id: String,
    pub code: String,
    pub title: String,
}

fn current_parts(event: &EventRef) -> (String, String, String) {
    let title_raw = event.title.trim().to_string();
    let parsed = extract_code(&title_raw);
    let code = if parsed.code.is_empty() {
        event.current_code.clone().unwrap_or_default()
    } else {
        parsed.code
    };
    (code, parsed.description, title_raw)
}

/// Builds the rewrite of `event` with `code`, even if the code is unchanged.
pub fn assign_code(event: &EventRef, code: &str) -> CodeAssignment {
    let (_, description, title_raw) = current_parts(event);
    CodeAssignment {
        event_id: event.event_id.clone(),
        code: code.to_string(),
        title: reconstruct_title(code, &description, &title_raw),
    }
}

/// Like `assign_code`, but `None` when the event already carries `code`.
pub fn plan_assignment(event: &EventRef, code: &str) -> Option<CodeAssignment> {
    let (current, _, _) = current_parts(event);
    (current != code).then(|| assign_code(event, code))
}

fn patch_body(assignment: &CodeAssignment, mirror_property: bool) -> CalendarEvent {
    let mut private_properties = BTreeMap::new();
    if mirror_property {
        private_properties.insert(CODE_PROPERTY.to_string(), assignment.code.clone());
    }
    CalendarEvent {
        summary: Some(assignment.title.clone()),
        private_properties,
        ..Default::default()
    }
}

async fn write_assignment(
    service: &dyn CalendarService,
    calendar_id: &str,
    assignment: &CodeAssignment,
    mirror_property: bool,
) -> Result<CalendarEvent, NeoBrainError> {
    upsert_event(
        service,
        calendar_id,
        patch_body(assignment, mirror_property),
        Some(&assignment.event_id),
    )
    .await
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmOutcome {
    pub event_id: String,
    pub code: String,
    pub title: String,
    /// False when the chosen code was already the event's code.
    pub updated: bool,
}

/// Single-item flow: write `chosen` unless it is the current code.
///
/// Without a choice the current code is kept, or the suggestion is taken for uncoded events.
pub async fn confirm_code(
    service: &dyn CalendarService,
    calendar_id: &str,
    event: &EventRef,
    chosen: Option<&str>,
    config: &AutocalendarConfig,
) -> Result<ConfirmOutcome, NeoBrainError> {
    let code = match chosen.map(str::trim) {
        Some(code) => code.to_string(),
        None => {
            let (current, _, _) = current_parts(event);
            if current.is_empty() {
                suggest_code(&config.suggestion_prefix, &event.event_id)
            } else {
                current
            }
        }
    };
    check_code(&code)?;

    match plan_assignment(event, &code) {
        None => Ok(ConfirmOutcome {
            event_id: event.event_id.clone(),
            code,
            title: event.title.trim().to_string(),
            updated: false,
        }),
        Some(assignment) => {
            let written = log_result(
                write_assignment(service, calendar_id, &assignment, config.mirror_code_property)
                    .await,
                &format!("event {} updated: {}", assignment.event_id, assignment.title),
                &format!("updating event {}", assignment.event_id),
            )?;
            Ok(ConfirmOutcome {
                event_id: assignment.event_id,
                code: assignment.code,
                title: written.summary.unwrap_or(assignment.title),
                updated: true,
            })
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedEvent {
    pub event_id: String,
    pub title: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEvent {
    pub event_id: String,
    /// The remote error text, unmodified.
    pub error: String,
}

/// Result of a batch; a failure stops the batch, leaving later events untouched.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub code: String,
    pub updated: Vec<UpdatedEvent>,
    pub failed: Option<FailedEvent>,
    pub not_attempted: Vec<String>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none() && self.not_attempted.is_empty()
    }
}

/// Batch flow: writes `code` into every selected event, one at a time in selection order.
pub async fn batch_assign(
    service: &dyn CalendarService,
    calendar_id: &str,
    selected: &[EventRef],
    code: &str,
    config: &AutocalendarConfig,
) -> Result<BatchReport, NeoBrainError> {
    let code = code.trim();
    check_code(code)?;
    if selected.is_empty() {
        return Err(validation_error("select at least one event"));
    }

    let mut report = BatchReport {
        code: code.to_string(),
        updated: Vec::with_capacity(selected.len()),
        failed: None,
        not_attempted: Vec::new(),
    };

    for (position, event) in selected.iter().enumerate() {
        let assignment = assign_code(event, code);
        match write_assignment(service, calendar_id, &assignment, config.mirror_code_property).await
        {
            Ok(written) => report.updated.push(UpdatedEvent {
                event_id: assignment.event_id,
                title: written.summary.unwrap_or(assignment.title),
            }),
            Err(err) => {
                warn!(
                    "batch stopped at event {} ({} of {}): {}",
                    assignment.event_id,
                    position + 1,
                    selected.len(),
                    err
                );
                report.failed = Some(FailedEvent {
                    event_id: assignment.event_id,
                    error: err.to_string(),
                });
                report.not_attempted = selected[position + 1..]
                    .iter()
                    .map(|e| e.event_id.clone())
                    .collect();
                break;
            }
        }
    }

    info!(
        "code {} assigned to {} of {} event(s)",
        report.code,
        report.updated.len(),
        selected.len()
    );
    Ok(report)
}

/// Fetch window in local dates: defaults around `today`, bounded by `max_range_days` either way.
pub fn resolve_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
    config: &AutocalendarConfig,
) -> Result<(NaiveDate, NaiveDate), NeoBrainError> {
    let start = start.unwrap_or(today - Duration::days(config.default_days_back));
    let end = end.unwrap_or(today + Duration::days(config.default_days_forward));

    if end < start {
        return Err(validation_error("end_date must not be before start_date"));
    }
    let earliest = today - Duration::days(config.max_range_days);
    let latest = today + Duration::days(config.max_range_days);
    if start < earliest || end > latest {
        return Err(validation_error(format!(
            "dates must lie between {} and {}",
            earliest, latest
        )));
    }
    Ok((start, end))
}
