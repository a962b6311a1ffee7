// Metrics module - Prometheus-compatible metrics tracking
// Provides counters and histograms for observability

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Maximum retained duration samples; older samples are dropped first
const MAX_DURATION_SAMPLES: usize = 10_000;

/// Histogram represents percentile statistics for latency measurements
#[derive(Debug, Clone, Copy)]
pub struct Histogram {
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Metrics struct tracks counters and histograms for Prometheus export
/// Thread-safe via atomic operations and mutexes
pub struct Metrics {
    // Request counters
    request_count: AtomicU64,

    // Status code counters (e.g., 200, 400, 500)
    status_counts: Mutex<HashMap<u16, u64>>,

    // Endpoint counters (overlay, catalog, health, ...)
    endpoint_counts: Mutex<HashMap<String, u64>>,

    // Overlay render duration tracking (stored in microseconds as u64)
    overlay_durations: Mutex<Vec<u64>>,

    // Overlay failure counters by error kind (invalid_request, image_load, encode)
    overlay_failures: Mutex<HashMap<String, u64>>,

    // Upstream collaborator failure counters by provider (catalog, ratings)
    upstream_failures: Mutex<HashMap<String, u64>>,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Metrics {
            request_count: AtomicU64::new(0),
            status_counts: Mutex::new(HashMap::new()),
            endpoint_counts: Mutex::new(HashMap::new()),
            overlay_durations: Mutex::new(Vec::new()),
            overlay_failures: Mutex::new(HashMap::new()),
            upstream_failures: Mutex::new(HashMap::new()),
        }
    }

    /// Increment the total request count
    pub fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment counter for a specific HTTP status code
    pub fn increment_status_count(&self, status_code: u16) {
        if let Ok(mut counts) = self.status_counts.lock() {
            *counts.entry(status_code).or_insert(0) += 1;
        }
    }

    /// Increment counter for a specific endpoint
    pub fn increment_endpoint_count(&self, endpoint: &str) {
        if let Ok(mut counts) = self.endpoint_counts.lock() {
            *counts.entry(endpoint.to_string()).or_insert(0) += 1;
        }
    }

    /// Record an overlay render duration in microseconds
    pub fn record_overlay_duration_us(&self, duration_us: u64) {
        if let Ok(mut durations) = self.overlay_durations.lock() {
            if durations.len() >= MAX_DURATION_SAMPLES {
                durations.remove(0);
            }
            durations.push(duration_us);
        }
    }

    /// Number of duration samples currently retained
    pub fn overlay_sample_count(&self) -> usize {
        self.overlay_durations
            .lock()
            .map(|durations| durations.len())
            .unwrap_or(0)
    }

    /// Increment overlay failure counter for an error kind
    pub fn increment_overlay_failure(&self, kind: &str) {
        if let Ok(mut counts) = self.overlay_failures.lock() {
            *counts.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    /// Increment upstream failure counter for a provider
    pub fn increment_upstream_failure(&self, provider: &str) {
        if let Ok(mut counts) = self.upstream_failures.lock() {
            *counts.entry(provider.to_string()).or_insert(0) += 1;
        }
    }

    /// Get the total request count
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Get the count for a specific status code
    pub fn status_count(&self, status_code: u16) -> u64 {
        self.status_counts
            .lock()
            .ok()
            .and_then(|counts| counts.get(&status_code).copied())
            .unwrap_or(0)
    }

    /// Calculate overlay render duration percentiles in milliseconds
    pub fn overlay_duration_histogram(&self) -> Histogram {
        let durations = match self.overlay_durations.lock() {
            Ok(d) => d.clone(),
            Err(_) => Vec::new(),
        };
        calculate_percentiles(&durations)
    }

    /// Export all metrics in Prometheus text exposition format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP http_requests_total Total number of HTTP requests received\n");
        output.push_str("# TYPE http_requests_total counter\n");
        output.push_str(&format!(
            "http_requests_total {}\n",
            self.request_count.load(Ordering::Relaxed)
        ));

        output.push_str("\n# HELP http_requests_by_status_total HTTP requests by status code\n");
        output.push_str("# TYPE http_requests_by_status_total counter\n");
        if let Ok(counts) = self.status_counts.lock() {
            for (status, count) in counts.iter() {
                output.push_str(&format!(
                    "http_requests_by_status_total{{status=\"{}\"}} {}\n",
                    status, count
                ));
            }
        }

        output.push_str("\n# HELP http_requests_by_endpoint_total HTTP requests by endpoint\n");
        output.push_str("# TYPE http_requests_by_endpoint_total counter\n");
        if let Ok(counts) = self.endpoint_counts.lock() {
            for (endpoint, count) in counts.iter() {
                output.push_str(&format!(
                    "http_requests_by_endpoint_total{{endpoint=\"{}\"}} {}\n",
                    endpoint, count
                ));
            }
        }

        output.push_str("\n# HELP overlay_render_duration_ms Overlay render duration percentiles\n");
        output.push_str("# TYPE overlay_render_duration_ms summary\n");
        let histogram = self.overlay_duration_histogram();
        output.push_str(&format!(
            "overlay_render_duration_ms{{quantile=\"0.5\"}} {:.3}\n",
            histogram.p50
        ));
        output.push_str(&format!(
            "overlay_render_duration_ms{{quantile=\"0.9\"}} {:.3}\n",
            histogram.p90
        ));
        output.push_str(&format!(
            "overlay_render_duration_ms{{quantile=\"0.95\"}} {:.3}\n",
            histogram.p95
        ));
        output.push_str(&format!(
            "overlay_render_duration_ms{{quantile=\"0.99\"}} {:.3}\n",
            histogram.p99
        ));

        output.push_str("\n# HELP overlay_failures_total Overlay render failures by error kind\n");
        output.push_str("# TYPE overlay_failures_total counter\n");
        if let Ok(counts) = self.overlay_failures.lock() {
            for (kind, count) in counts.iter() {
                output.push_str(&format!(
                    "overlay_failures_total{{kind=\"{}\"}} {}\n",
                    kind, count
                ));
            }
        }

        output.push_str("\n# HELP upstream_failures_total Upstream provider failures\n");
        output.push_str("# TYPE upstream_failures_total counter\n");
        if let Ok(counts) = self.upstream_failures.lock() {
            for (provider, count) in counts.iter() {
                output.push_str(&format!(
                    "upstream_failures_total{{provider=\"{}\"}} {}\n",
                    provider, count
                ));
            }
        }

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculate p50/p90/p95/p99 from raw microsecond samples, in milliseconds
fn calculate_percentiles(samples_us: &[u64]) -> Histogram {
    if samples_us.is_empty() {
        return Histogram {
            p50: 0.0,
            p90: 0.0,
            p95: 0.0,
            p99: 0.0,
        };
    }

    let mut sorted = samples_us.to_vec();
    sorted.sort_unstable();

    let percentile = |p: f64| -> f64 {
        let idx = ((sorted.len() as f64 * p).ceil() as usize).saturating_sub(1);
        sorted[idx.min(sorted.len() - 1)] as f64 / 1000.0
    };

    Histogram {
        p50: percentile(0.50),
        p90: percentile(0.90),
        p95: percentile(0.95),
        p99: percentile(0.99),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_count_increments() {
        let metrics = Metrics::new();
        assert_eq!(metrics.request_count(), 0);

        metrics.increment_request_count();
        metrics.increment_request_count();
        assert_eq!(metrics.request_count(), 2);
    }

    #[test]
    fn test_status_counts() {
        let metrics = Metrics::new();
        metrics.increment_status_count(200);
        metrics.increment_status_count(200);
        metrics.increment_status_count(500);

        assert_eq!(metrics.status_count(200), 2);
        assert_eq!(metrics.status_count(500), 1);
        assert_eq!(metrics.status_count(404), 0);
    }

    #[test]
    fn test_percentiles_empty() {
        let h = calculate_percentiles(&[]);
        assert_eq!(h.p50, 0.0);
        assert_eq!(h.p99, 0.0);
    }

    #[test]
    fn test_percentiles_single_sample() {
        let h = calculate_percentiles(&[4000]);
        assert_eq!(h.p50, 4.0);
        assert_eq!(h.p99, 4.0);
    }

    #[test]
    fn test_percentiles_ordering() {
        let samples: Vec<u64> = (1..=100).map(|i| i * 1000).collect();
        let h = calculate_percentiles(&samples);
        assert_eq!(h.p50, 50.0);
        assert_eq!(h.p90, 90.0);
        assert_eq!(h.p95, 95.0);
        assert_eq!(h.p99, 99.0);
    }

    #[test]
    fn test_duration_samples_are_bounded() {
        let metrics = Metrics::new();
        for i in 0..(MAX_DURATION_SAMPLES as u64 + 500) {
            metrics.record_overlay_duration_us(i);
        }

        assert_eq!(metrics.overlay_sample_count(), MAX_DURATION_SAMPLES);

        // Oldest samples were evicted, so the percentiles reflect the
        // most recent window
        let h = metrics.overlay_duration_histogram();
        assert!(h.p50 >= 500.0 / 1000.0);
    }

    #[test]
    fn test_export_prometheus_contains_metrics() {
        let metrics = Metrics::new();
        metrics.increment_request_count();
        metrics.increment_status_count(200);
        metrics.increment_endpoint_count("overlay");
        metrics.record_overlay_duration_us(12_000);
        metrics.increment_overlay_failure("image_load");
        metrics.increment_upstream_failure("ratings");

        let output = metrics.export_prometheus();
        assert!(output.contains("http_requests_total 1"));
        assert!(output.contains("http_requests_by_status_total{status=\"200\"} 1"));
        assert!(output.contains("http_requests_by_endpoint_total{endpoint=\"overlay\"} 1"));
        assert!(output.contains("overlay_render_duration_ms{quantile=\"0.5\"} 12.000"));
        assert!(output.contains("overlay_failures_total{kind=\"image_load\"} 1"));
        assert!(output.contains("upstream_failures_total{provider=\"ratings\"} 1"));
    }
}
