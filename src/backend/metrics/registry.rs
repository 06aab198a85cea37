/**
 * Metrics Registry
 *
 * In-process counters, gauges and histograms rendered in the Prometheus
 * text exposition format. Samples are keyed by metric name plus a sorted
 * label set, so the output order is stable between scrapes.
 */

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

/// Buckets for `http_request_duration_seconds`
pub const HTTP_DURATION_BUCKETS: &[f64] = &[0.1, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Buckets for `ai_generation_duration_seconds`
pub const GENERATION_DURATION_BUCKETS: &[f64] = &[1.0, 3.0, 5.0, 10.0, 20.0, 30.0, 60.0];

/// Buckets for `db_query_duration_seconds`
pub const DB_DURATION_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Counter,
    Gauge,
    Histogram,
}

impl Kind {
    fn as_str(self) -> &'static str {
        match self {
            Kind::Counter => "counter",
            Kind::Gauge => "gauge",
            Kind::Histogram => "histogram",
        }
    }
}

/// Metric families in exposition order
const FAMILIES: &[(&str, &str, Kind)] = &[
    ("http_requests_total", "Total number of HTTP requests", Kind::Counter),
    ("http_request_duration_seconds", "HTTP request duration in seconds", Kind::Histogram),
    ("ai_pages_created_total", "Total number of AI pages created", Kind::Counter),
    ("ai_pages_views_total", "Total number of AI page views", Kind::Counter),
    ("ai_generation_duration_seconds", "AI generation duration in seconds", Kind::Histogram),
    ("cache_hits_total", "Total number of cache hits", Kind::Counter),
    ("cache_misses_total", "Total number of cache misses", Kind::Counter),
    ("db_queries_total", "Total number of database queries", Kind::Counter),
    ("db_query_duration_seconds", "Database query duration in seconds", Kind::Histogram),
    ("active_pages_total", "Number of stored AI pages", Kind::Gauge),
    ("active_users_total", "Number of synced users", Kind::Gauge),
];

type LabelSet = BTreeMap<&'static str, String>;

#[derive(Debug, Clone)]
struct Histogram {
    buckets: &'static [f64],
    counts: Vec<u64>,
    sum: f64,
    count: u64,
}

impl Histogram {
    fn new(buckets: &'static [f64]) -> Self {
        Self {
            buckets,
            counts: vec![0; buckets.len()],
            sum: 0.0,
            count: 0,
        }
    }

    fn observe(&mut self, value: f64) {
        for (bound, count) in self.buckets.iter().zip(self.counts.iter_mut()) {
            if value <= *bound {
                *count += 1;
            }
        }
        self.sum += value;
        self.count += 1;
    }
}

#[derive(Debug, Default)]
struct Registry {
    counters: BTreeMap<(&'static str, LabelSet), u64>,
    gauges: BTreeMap<&'static str, f64>,
    histograms: BTreeMap<(&'static str, LabelSet), Histogram>,
}

/// Shared metrics handle, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    registry: Arc<RwLock<Registry>>,
}

fn labels<const N: usize>(pairs: [(&'static str, &str); N]) -> LabelSet {
    pairs.into_iter().map(|(k, v)| (k, v.to_string())).collect()
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn inc(&self, name: &'static str, labels: LabelSet) {
        *self.registry.write().counters.entry((name, labels)).or_insert(0) += 1;
    }

    fn observe(&self, name: &'static str, buckets: &'static [f64], labels: LabelSet, value: f64) {
        self.registry
            .write()
            .histograms
            .entry((name, labels))
            .or_insert_with(|| Histogram::new(buckets))
            .observe(value);
    }

    /// Count a finished HTTP request and its duration
    pub fn record_http_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        let status = status.to_string();
        let set = labels([("method", method), ("route", route), ("status", &status)]);
        self.inc("http_requests_total", set.clone());
        self.observe(
            "http_request_duration_seconds",
            HTTP_DURATION_BUCKETS,
            set,
            duration.as_secs_f64(),
        );
    }

    pub fn record_page_created(&self) {
        self.inc("ai_pages_created_total", LabelSet::new());
    }

    pub fn record_page_view(&self, slug: &str) {
        self.inc("ai_pages_views_total", labels([("slug", slug)]));
    }

    /// Record how long a provider took to answer
    pub fn record_generation(&self, model: &str, duration: Duration) {
        self.observe(
            "ai_generation_duration_seconds",
            GENERATION_DURATION_BUCKETS,
            labels([("model", model)]),
            duration.as_secs_f64(),
        );
    }

    pub fn record_cache_hit(&self, kind: &str) {
        self.inc("cache_hits_total", labels([("type", kind)]));
    }

    pub fn record_cache_miss(&self, kind: &str) {
        self.inc("cache_misses_total", labels([("type", kind)]));
    }

    pub fn record_db_query(&self, duration: Duration) {
        self.inc("db_queries_total", LabelSet::new());
        self.observe(
            "db_query_duration_seconds",
            DB_DURATION_BUCKETS,
            LabelSet::new(),
            duration.as_secs_f64(),
        );
    }

    pub fn set_active_pages(&self, count: i64) {
        self.registry.write().gauges.insert("active_pages_total", count as f64);
    }

    pub fn set_active_users(&self, count: i64) {
        self.registry.write().gauges.insert("active_users_total", count as f64);
    }

    /// Current value of a counter, zero when it was never incremented
    pub fn counter_value(&self, name: &str, pairs: &[(&str, &str)]) -> u64 {
        let registry = self.registry.read();
        registry
            .counters
            .iter()
            .find(|((n, set), _)| {
                *n == name
                    && set.len() == pairs.len()
                    && pairs.iter().all(|(k, v)| set.get(k).map(String::as_str) == Some(*v))
            })
            .map(|(_, value)| *value)
            .unwrap_or(0)
    }

    /// Render every metric in the Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let registry = self.registry.read();
        let mut output = String::new();

        for (name, help, kind) in FAMILIES {
            let _ = writeln!(output, "# HELP {name} {help}");
            let _ = writeln!(output, "# TYPE {name} {}", kind.as_str());

            match kind {
                Kind::Counter => {
                    let samples: Vec<_> = registry
                        .counters
                        .iter()
                        .filter(|((n, _), _)| n == name)
                        .collect();
                    if samples.is_empty() && !has_labels(name) {
                        let _ = writeln!(output, "{name} 0");
                    }
                    for ((_, set), value) in samples {
                        let _ = writeln!(output, "{name}{} {value}", format_labels(set, None));
                    }
                }
                Kind::Gauge => {
                    let value = registry.gauges.get(name).copied().unwrap_or(0.0);
                    let _ = writeln!(output, "{name} {value}");
                }
                Kind::Histogram => {
                    for ((_, set), hist) in registry.histograms.iter().filter(|((n, _), _)| n == name) {
                        for (bound, count) in hist.buckets.iter().zip(&hist.counts) {
                            let le = bound.to_string();
                            let _ = writeln!(
                                output,
                                "{name}_bucket{} {count}",
                                format_labels(set, Some(&le))
                            );
                        }
                        let _ = writeln!(
                            output,
                            "{name}_bucket{} {}",
                            format_labels(set, Some("+Inf")),
                            hist.count
                        );
                        let _ = writeln!(output, "{name}_sum{} {}", format_labels(set, None), hist.sum);
                        let _ = writeln!(output, "{name}_count{} {}", format_labels(set, None), hist.count);
                    }
                }
            }
        }

        output
    }
}

/// Families whose samples always carry labels
fn has_labels(name: &str) -> bool {
    matches!(
        name,
        "http_requests_total" | "ai_pages_views_total" | "cache_hits_total" | "cache_misses_total"
    )
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_labels(set: &LabelSet, le: Option<&str>) -> String {
    let mut parts: Vec<String> = set
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
        .collect();
    if let Some(le) = le {
        parts.push(format!("le=\"{le}\""));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", parts.join(","))
    }
}
