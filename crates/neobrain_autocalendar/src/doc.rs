// File: crates/neobrain_autocalendar/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::filter::CodeFilter;
use crate::handlers::{BatchRequest, ConfirmRequest, EventsResponse, RowView};
use crate::logic::{BatchReport, ConfirmOutcome, EventRef, FailedEvent, UpdatedEvent};
use crate::normalize::NormalizedRow;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_events_handler,
        crate::handlers::confirm_handler,
        crate::handlers::batch_handler,
    ),
    components(schemas(
        CodeFilter,
        NormalizedRow,
        RowView,
        EventsResponse,
        EventRef,
        ConfirmRequest,
        ConfirmOutcome,
        BatchRequest,
        BatchReport,
        UpdatedEvent,
        FailedEvent,
    )),
    tags(
        (name = "Autocalendar", description = "Tag calendar events with project codes")
    )
)]
pub struct AutocalendarApiDoc;
