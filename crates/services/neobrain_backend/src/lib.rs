// --- File: crates/services/neobrain_backend/src/lib.rs ---
pub mod app_state;
pub mod chatbot;
pub mod router;

pub use app_state::{AppState, AppStateBuilder};
pub use router::{api_router, build_app};
