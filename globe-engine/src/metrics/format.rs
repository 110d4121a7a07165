// format.rs - Overlay panel content
//
// Host-independent view model for the performance panel: labels, hints,
// formatted values and rating per row.

use super::rating::{Metric, Rating};
use super::record::MetricsRecord;
use super::source::HeapUsage;

pub const UNKNOWN: &str = "—";

#[derive(Clone, Debug, PartialEq)]
pub struct MetricRow {
    pub metric: Metric,
    pub label: &'static str,
    pub hint: &'static str,
    pub value: String,
    pub rating: Rating,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemoryRow {
    pub value: String,
    pub fill_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelModel {
    pub fps: MetricRow,
    pub vitals: Vec<MetricRow>,
    /// Only present when the host reports heap usage
    pub memory: Option<MemoryRow>,
}

pub fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.0}ms"),
        None => UNKNOWN.to_string(),
    }
}

pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => UNKNOWN.to_string(),
    }
}

pub fn format_bytes(bytes: f64) -> String {
    format!("{:.1}MB", bytes / 1024.0 / 1024.0)
}

pub fn format_heap(memory: &HeapUsage) -> String {
    format!("{} / {}", format_bytes(memory.used), format_bytes(memory.limit))
}

pub fn panel(record: &MetricsRecord, fps: u32) -> PanelModel {
    let row = |metric: Metric, label: &'static str, hint: &'static str, value: Option<f64>| MetricRow {
        metric,
        label,
        hint,
        value: if metric == Metric::Cls { format_score(value) } else { format_ms(value) },
        rating: metric.rate(value),
    };

    PanelModel {
        fps: MetricRow {
            metric: Metric::Fps,
            label: "Frames Per Second",
            hint: "Current rendering performance",
            value: format!("{fps} fps"),
            rating: Metric::Fps.rate(Some(fps as f64)),
        },
        vitals: vec![
            row(Metric::Fcp, "First Contentful Paint", "Time until first content is rendered", record.fcp),
            row(
                Metric::Lcp,
                "Largest Contentful Paint",
                "Time until largest content element is rendered",
                record.lcp,
            ),
            row(Metric::Cls, "Cumulative Layout Shift", "Visual stability score", record.cls),
            row(
                Metric::Inp,
                "Interaction to Next Paint",
                "Responsiveness - worst interaction latency",
                record.inp,
            ),
            row(Metric::Ttfb, "Time to First Byte", "Server response time", record.ttfb),
        ],
        memory: record.memory.map(|m| MemoryRow {
            value: format_heap(&m),
            fill_percent: m.used_percent(),
        }),
    }
}
