// --- File: crates/neobrain_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
#[cfg(test)]
mod logic_test;
pub mod service;

pub use auth::{build_credentials, Credentials, GoogleCalendarConnector};
pub use logic::{list_events, upsert_event, GcalError};
