use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::{Context, Handler};

/// Middleware for collecting Prometheus-compatible metrics
///
/// Tracks request counts, latency, error classes and coroutine stack size.
/// All counters use atomic operations for thread-safe updates without locks.
///
/// Clones share the same counters, so one clone goes into the chain and
/// another stays with whatever exposes them:
///
/// ```rust
/// use relayrouter::middleware::Metrics;
/// use relayrouter::{Context, EngineBuilder, Request};
///
/// # fn main() -> Result<(), relayrouter::RouteError> {
/// let metrics = Metrics::new();
/// let mut builder = EngineBuilder::new();
/// builder.use_middleware(metrics.clone());
/// builder.get("/", |ctx: &mut Context| ctx.write_text(200, "ok"))?;
/// let engine = builder.build();
///
/// let _ = engine.dispatch(Request::new("GET", "/"));
/// let _ = engine.dispatch(Request::new("GET", "/missing"));
/// assert_eq!(metrics.request_count(), 2);
/// assert_eq!(metrics.client_errors(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Metrics {
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    request_count: AtomicUsize,
    client_errors: AtomicUsize,
    server_errors: AtomicUsize,
    total_latency_ns: AtomicU64,
    stack_size: AtomicUsize,
}

impl Metrics {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.counters.request_count.load(Ordering::Relaxed)
    }

    /// Requests finalized with a 4xx status
    #[must_use]
    pub fn client_errors(&self) -> usize {
        self.counters.client_errors.load(Ordering::Relaxed)
    }

    /// Requests finalized with a 5xx status
    #[must_use]
    pub fn server_errors(&self) -> usize {
        self.counters.server_errors.load(Ordering::Relaxed)
    }

    /// Calculate the average request latency
    ///
    /// Returns zero duration if no requests have been processed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.counters.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.counters.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Stack size of the coroutine that served the most recent request
    #[must_use]
    pub fn stack_size(&self) -> usize {
        self.counters.stack_size.load(Ordering::Relaxed)
    }

    /// Render all counters in the Prometheus text exposition format
    #[must_use]
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# HELP relay_requests_total Total requests dispatched");
        let _ = writeln!(out, "# TYPE relay_requests_total counter");
        let _ = writeln!(out, "relay_requests_total {}", self.request_count());
        let _ = writeln!(out, "# HELP relay_responses_errors_total Responses by error class");
        let _ = writeln!(out, "# TYPE relay_responses_errors_total counter");
        let _ = writeln!(
            out,
            "relay_responses_errors_total{{class=\"4xx\"}} {}",
            self.client_errors()
        );
        let _ = writeln!(
            out,
            "relay_responses_errors_total{{class=\"5xx\"}} {}",
            self.server_errors()
        );
        let _ = writeln!(out, "# HELP relay_request_latency_seconds Average request latency");
        let _ = writeln!(out, "# TYPE relay_request_latency_seconds gauge");
        let _ = writeln!(
            out,
            "relay_request_latency_seconds {:.6}",
            self.average_latency().as_secs_f64()
        );
        let _ = writeln!(out, "# HELP relay_coroutine_stack_bytes Coroutine stack size");
        let _ = writeln!(out, "# TYPE relay_coroutine_stack_bytes gauge");
        let _ = writeln!(out, "relay_coroutine_stack_bytes {}", self.stack_size());
        out
    }

    fn record(&self, status: u16, latency: Duration) {
        self.counters.request_count.fetch_add(1, Ordering::Relaxed);
        self.counters
            .total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
        match status {
            400..=499 => {
                self.counters.client_errors.fetch_add(1, Ordering::Relaxed);
            }
            500..=599 => {
                self.counters.server_errors.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
        // record stack metrics for the current coroutine when available
        let size = if may::coroutine::is_coroutine() {
            may::coroutine::current().stack_size()
        } else {
            may::config().get_stack_size()
        };
        self.counters.stack_size.store(size, Ordering::Relaxed);
    }
}

/// Passive: never blocks a request, only observes the finalized status.
impl Handler for Metrics {
    fn handle(&self, ctx: &mut Context) {
        let start = Instant::now();
        ctx.next();
        self.record(ctx.status().unwrap_or(200), start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_error_classes() {
        let metrics = Metrics::new();
        metrics.record(200, Duration::from_millis(2));
        metrics.record(404, Duration::from_millis(4));
        metrics.record(503, Duration::from_millis(6));

        assert_eq!(metrics.request_count(), 3);
        assert_eq!(metrics.client_errors(), 1);
        assert_eq!(metrics.server_errors(), 1);
        assert_eq!(metrics.average_latency(), Duration::from_millis(4));
    }

    #[test]
    fn test_average_latency_without_requests() {
        assert_eq!(Metrics::new().average_latency(), Duration::ZERO);
    }

    #[test]
    fn test_render_prometheus() {
        let metrics = Metrics::new();
        metrics.record(500, Duration::from_millis(1));
        let text = metrics.render_prometheus();
        assert!(text.contains("relay_requests_total 1"));
        assert!(text.contains("relay_responses_errors_total{class=\"5xx\"} 1"));
        assert!(text.contains("relay_responses_errors_total{class=\"4xx\"} 0"));
        assert!(text.contains("# TYPE relay_request_latency_seconds gauge"));
    }
}
