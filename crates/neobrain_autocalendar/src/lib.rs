// --- File: crates/neobrain_autocalendar/src/lib.rs ---
pub mod doc;
pub mod filter;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod normalize;
pub mod routes;

pub use handlers::AutocalendarState;
pub use routes::routes;
