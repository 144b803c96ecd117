//! # Replica Configuration
//!
//! Configuration for the client replica service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Replica configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplicaConfig {
    /// Base URL of the authoritative corpus service.
    pub base_url: String,

    /// Timeout for the bootstrap snapshot fetch. On expiry the fetch is
    /// treated exactly like a network failure.
    pub fetch_timeout: Duration,

    /// Timeout for a single authoritative submission.
    pub submit_timeout: Duration,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            fetch_timeout: Duration::from_secs(10),
            submit_timeout: Duration::from_secs(5),
        }
    }
}

impl ReplicaConfig {
    /// Create a config for testing (short timeouts).
    pub fn for_testing() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            fetch_timeout: Duration::from_millis(50),
            submit_timeout: Duration::from_millis(50),
        }
    }
}
