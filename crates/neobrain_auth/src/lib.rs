// --- File: crates/neobrain_auth/src/lib.rs ---
pub mod doc;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod middleware;
pub mod oauth;
pub mod provider;
pub mod routes;
pub mod verify;

pub use error::AuthError;
pub use gate::{decide_access, AccessDecision, DomainGate};
pub use handlers::AuthState;
pub use middleware::require_session;
pub use provider::{GoogleIdentityProvider, IdentityProvider};
pub use routes::routes;
