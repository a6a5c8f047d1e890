//! # Message Service Test Utilities
//!
//! Shared test utilities for the message service.
//!
//! This crate provides:
//! - Server test harness (`TestMessageServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ms_test_utils::TestMessageServer;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestMessageServer::spawn().await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .get(format!("{}/v1/health", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
