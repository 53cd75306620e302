//! Minimal metrics registry.
//!
//! Counter and histogram families with dynamic label values backed by
//! `DashMap`, rendered in the Prometheus text exposition format. Label names
//! are fixed per family (`N` is checked at compile time); series are sorted on
//! render so identical state always renders identical bytes.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use dashmap::DashMap;
use landsearch_core::error::{LandSearchError, Result};

/// Default latency buckets in seconds (`+Inf` is implicit).
pub const DEFAULT_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Sample values always carry a fractional part (`1.0`, `0.25`, `+Inf`).
fn fmt_value(v: f64) -> String {
    if v.is_infinite() {
        if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
    } else if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn write_labels(out: &mut String, names: &[&str], values: &[String], le: Option<&str>) {
    if names.is_empty() && le.is_none() {
        return;
    }
    out.push('{');
    let mut first = true;
    for (k, v) in names.iter().zip(values) {
        if !first {
            out.push(',');
        }
        first = false;
        let _ = write!(out, "{}=\"{}\"", k, escape_label(v));
    }
    if let Some(le) = le {
        if !first {
            out.push(',');
        }
        let _ = write!(out, "le=\"{le}\"");
    }
    out.push('}');
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(help));
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

fn label_key<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// A metric family that can render itself into the exposition format.
pub trait Collector: Send + Sync {
    fn name(&self) -> &str;
    fn render(&self, out: &mut String);
}

pub struct CounterVec<const N: usize> {
    name: &'static str,
    help: &'static str,
    labels: [&'static str; N],
    map: DashMap<Vec<String>, AtomicU64>,
}

impl<const N: usize> CounterVec<N> {
    pub fn new(name: &'static str, help: &'static str, labels: [&'static str; N]) -> Self {
        Self { name, help, labels, map: DashMap::new() }
    }

    /// Increment by 1.
    pub fn inc(&self, values: [&str; N]) {
        self.add(values, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, values: [&str; N], v: u64) {
        let counter = self.map.entry(label_key(values)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 if never touched).
    pub fn get(&self, values: [&str; N]) -> u64 {
        self.map
            .get(&label_key(values))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Number of distinct label sets seen so far.
    pub fn series_len(&self) -> usize {
        self.map.len()
    }
}

impl<const N: usize> Collector for CounterVec<N> {
    fn name(&self) -> &str {
        self.name
    }

    fn render(&self, out: &mut String) {
        write_header(out, self.name, self.help, "counter");
        let mut series: Vec<(Vec<String>, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        series.sort();
        for (key, val) in series {
            out.push_str(self.name);
            write_labels(out, &self.labels, &key, None);
            let _ = writeln!(out, " {}", fmt_value(val as f64));
        }
    }
}

/// Cumulative bucket counts plus sum (nanoseconds) and count.
struct AtomicHistogram {
    count: AtomicU64,
    sum_nanos: AtomicU64,
    buckets: Vec<AtomicU64>,
}

impl AtomicHistogram {
    fn new(len: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_nanos: AtomicU64::new(0),
            buckets: (0..len).map(|_| AtomicU64::new(0)).collect(),
        }
    }
}

pub struct HistogramVec<const N: usize> {
    name: &'static str,
    help: &'static str,
    labels: [&'static str; N],
    bounds: &'static [f64],
    map: DashMap<Vec<String>, AtomicHistogram>,
}

impl<const N: usize> HistogramVec<N> {
    pub fn new(name: &'static str, help: &'static str, labels: [&'static str; N]) -> Self {
        Self::with_buckets(name, help, labels, &DEFAULT_BUCKETS)
    }

    /// `bounds` must be sorted ascending.
    pub fn with_buckets(
        name: &'static str,
        help: &'static str,
        labels: [&'static str; N],
        bounds: &'static [f64],
    ) -> Self {
        Self { name, help, labels, bounds, map: DashMap::new() }
    }

    /// Observe a value in seconds. Negative or non-finite values are rejected.
    pub fn observe(&self, values: [&str; N], seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(LandSearchError::InvalidMeasurement(format!(
                "{}: duration must be a non-negative number of seconds, got {seconds}",
                self.name
            )));
        }
        self.record(values, seconds, (seconds * 1e9).round() as u64);
        Ok(())
    }

    /// Observe a duration (always valid).
    pub fn observe_duration(&self, values: [&str; N], duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.record(values, duration.as_secs_f64(), nanos);
    }

    fn record(&self, values: [&str; N], seconds: f64, nanos: u64) {
        let hist = self
            .map
            .entry(label_key(values))
            .or_insert_with(|| AtomicHistogram::new(self.bounds.len()));

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_nanos.fetch_add(nanos, Ordering::Relaxed);

        // Cumulative buckets: bump every bucket whose bound holds the value
        for (i, &le) in self.bounds.iter().enumerate() {
            if seconds <= le {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations in one series.
    pub fn sample_count(&self, values: [&str; N]) -> u64 {
        self.map
            .get(&label_key(values))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum of observations in one series, in seconds.
    pub fn sample_sum(&self, values: [&str; N]) -> f64 {
        self.map
            .get(&label_key(values))
            .map(|h| h.sum_nanos.load(Ordering::Relaxed) as f64 / 1e9)
            .unwrap_or(0.0)
    }
}

impl<const N: usize> Collector for HistogramVec<N> {
    fn name(&self) -> &str {
        self.name
    }

    fn render(&self, out: &mut String) {
        write_header(out, self.name, self.help, "histogram");
        let mut keys: Vec<Vec<String>> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();

        let bucket_name = format!("{}_bucket", self.name);
        for key in keys {
            let Some(hist) = self.map.get(&key) else { continue };
            let count = hist.count.load(Ordering::Relaxed);

            for (i, &le) in self.bounds.iter().enumerate() {
                let n = hist.buckets[i].load(Ordering::Relaxed);
                out.push_str(&bucket_name);
                write_labels(out, &self.labels, &key, Some(&fmt_value(le)));
                let _ = writeln!(out, " {}", fmt_value(n as f64));
            }
            out.push_str(&bucket_name);
            write_labels(out, &self.labels, &key, Some("+Inf"));
            let _ = writeln!(out, " {}", fmt_value(count as f64));

            let _ = write!(out, "{}_count", self.name);
            write_labels(out, &self.labels, &key, None);
            let _ = writeln!(out, " {}", fmt_value(count as f64));

            let sum = hist.sum_nanos.load(Ordering::Relaxed) as f64 / 1e9;
            let _ = write!(out, "{}_sum", self.name);
            write_labels(out, &self.labels, &key, None);
            let _ = writeln!(out, " {}", fmt_value(sum));
        }
    }
}

/// Ordered set of metric families sharing one `/metrics` exposition.
///
/// Families are rendered in registration order. Names are unique within a
/// registry; build a fresh registry per test to avoid collisions.
#[derive(Default)]
pub struct MetricsRegistry {
    collectors: RwLock<Vec<Arc<dyn Collector>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family. Fails if the name is already taken.
    pub fn register(&self, collector: Arc<dyn Collector>) -> Result<()> {
        let mut collectors = self.collectors.write().unwrap_or_else(PoisonError::into_inner);
        if collectors.iter().any(|c| c.name() == collector.name()) {
            return Err(LandSearchError::InvalidConfiguration(format!(
                "metric already registered: {}",
                collector.name()
            )));
        }
        collectors.push(collector);
        Ok(())
    }

    /// Render every registered family.
    pub fn render(&self) -> String {
        let collectors = self.collectors.read().unwrap_or_else(PoisonError::into_inner);
        let mut out = String::new();
        for c in collectors.iter() {
            c.render(&mut out);
        }
        out
    }
}
