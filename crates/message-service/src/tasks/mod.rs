//! Background tasks for the message service.
//!
//! # Tasks
//!
//! - `health_scanner` - Probes registered health monitors on a fixed
//!   interval and updates the health registry

pub mod health_scanner;

pub use health_scanner::start_health_scanner;
