// src/http.rs
// Shared HTTP client for outbound calls

use std::time::Duration;

/// Default connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the shared HTTP client with the given overall request timeout.
///
/// Created once at startup; uses connection pooling internally.
pub fn create_shared_client(request_timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout(request_timeout))
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Connect timeout never exceeds the overall request timeout
fn connect_timeout(request_timeout: Duration) -> Duration {
    CONNECT_TIMEOUT.min(request_timeout)
}
