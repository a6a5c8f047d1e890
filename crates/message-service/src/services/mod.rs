//! Service layer for the message service.
//!
//! # Components
//!
//! - `health_registry` - Registry of monitored subsystems with an
//!   aggregated health view, polled by the health scanner task.

pub mod health_registry;

pub use health_registry::{HealthMonitor, HealthRegistry, HealthStatus};
