use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent on every outbound request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for outbound calls without special timeout needs
/// (IndexNow forwarding).
///
/// Built lazily on first access and reused for connection pooling. A build
/// failure is kept so callers report it instead of running without timeouts.
pub static HTTP_CLIENT: LazyLock<reqwest::Result<reqwest::Client>> =
    LazyLock::new(|| build_client(Duration::from_secs(30)));

/// Build a client with the shared pooling/compression settings and a custom
/// request timeout. Email providers use this to honor `email.timeout`.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(USER_AGENT)
        .build()
}
