// Submodules
pub mod fetch;
pub mod registry;
pub mod server;

// Public API (what handlers and tests import)
pub use fetch::{fetch, FetchedFile};
pub use registry::OfferRegistry;
pub use server::{bind, serve};
