//! Bootstrap module for initializing the control plane
//!
//! This module handles:
//! - Configuration loading
//! - Startup environment logging
//! - Collaborator wiring (secrets, event stream, HTTP fan-out)

pub mod config;
pub mod environment;
pub mod services;

pub use config::load_config;
pub use environment::log_environment;
pub use services::{build_control_surface, init_services};
