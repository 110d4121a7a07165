// record.rs - Metrics record and per-stream reducers
//
// Each reducer folds one observation stream into the single value the
// record keeps, and says whether that value should be republished.

use serde::Serialize;

use super::source::{HeapUsage, PerfEntry};

/// Latest known value per metric; None until observed
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub fcp: Option<f64>,
    pub lcp: Option<f64>,
    pub cls: Option<f64>,
    pub inp: Option<f64>,
    pub ttfb: Option<f64>,
    pub memory: Option<HeapUsage>,
}

/// Largest-contentful-paint: the last entry of a batch is the current candidate.
pub fn latest_paint(batch: &[PerfEntry]) -> Option<f64> {
    batch.iter().rev().find_map(|entry| match *entry {
        PerfEntry::LargestContentfulPaint { start_time } => Some(start_time),
        _ => None,
    })
}

/// Running layout-shift score, ignoring shifts caused by recent input
#[derive(Clone, Copy, Debug, Default)]
pub struct ShiftScore {
    total: f64,
}

impl ShiftScore {
    /// Running total after each qualifying entry, in order
    pub fn accumulate(&mut self, batch: &[PerfEntry]) -> Vec<f64> {
        let mut published = Vec::new();
        for entry in batch {
            if let PerfEntry::LayoutShift { value, had_recent_input: false } = *entry {
                self.total += value;
                published.push(self.total);
            }
        }
        published
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Worst interaction latency seen so far
#[derive(Clone, Copy, Debug, Default)]
pub struct WorstInteraction {
    max: f64,
}

impl WorstInteraction {
    /// New maxima found in this batch, in order
    pub fn observe(&mut self, batch: &[PerfEntry]) -> Vec<f64> {
        let mut published = Vec::new();
        for entry in batch {
            if let PerfEntry::Event { duration } = *entry {
                if duration > self.max {
                    self.max = duration;
                    published.push(duration);
                }
            }
        }
        published
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(value: f64, had_recent_input: bool) -> PerfEntry {
        PerfEntry::LayoutShift { value, had_recent_input }
    }

    fn event(duration: f64) -> PerfEntry {
        PerfEntry::Event { duration }
    }

    #[test]
    fn last_paint_in_batch_wins() {
        let batch = [
            PerfEntry::LargestContentfulPaint { start_time: 900.0 },
            PerfEntry::LargestContentfulPaint { start_time: 1400.0 },
            PerfEntry::LargestContentfulPaint { start_time: 1200.0 },
        ];
        assert_eq!(latest_paint(&batch), Some(1200.0));
        assert_eq!(latest_paint(&[]), None);
    }

    #[test]
    fn input_driven_shifts_excluded() {
        let mut score = ShiftScore::default();
        let published = score.accumulate(&[shift(0.05, false), shift(0.08, true), shift(0.02, false)]);
        assert!((score.total() - 0.07).abs() < 1e-12);
        assert_eq!(published.len(), 2);
        assert!(published.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn shift_total_spans_batches() {
        let mut score = ShiftScore::default();
        score.accumulate(&[shift(0.1, false)]);
        assert!(score.accumulate(&[shift(0.3, true)]).is_empty());
        let published = score.accumulate(&[shift(0.05, false)]);
        assert!((published[0] - 0.15).abs() < 1e-12);
    }

    #[test]
    fn worst_interaction_only_grows() {
        let mut worst = WorstInteraction::default();
        let published = worst.observe(&[event(40.0), event(120.0), event(90.0), event(200.0)]);
        assert_eq!(published, vec![40.0, 120.0, 200.0]);
        assert_eq!(worst.max(), 200.0);

        assert!(worst.observe(&[event(150.0), event(0.0)]).is_empty());
        assert_eq!(worst.max(), 200.0);
    }
}
