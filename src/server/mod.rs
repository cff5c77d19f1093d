// Submodules
pub mod cors;
pub mod handlers;
pub mod routes;
pub mod runtime;
pub mod state;

// Public API (what main.rs and tests import)
pub use state::AppState;
