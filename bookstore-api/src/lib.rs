// Bookstore admin API library
//
// HTTP binding of the admin control surface

pub mod http;

// Re-export commonly used types
pub use http::{create_router, AppState};
