// metrics/ - Page performance sampling
//
// source.rs is the host seam, sampler.rs wires it to the record, the rest
// is pure folding, rating and formatting.

pub mod format;
pub mod fps;
pub mod rating;
pub mod record;
pub mod sampler;
pub mod source;

pub use rating::{Metric, Rating};
pub use record::MetricsRecord;
pub use sampler::MetricsSampler;
pub use source::{EntryKind, HeapUsage, NavigationTiming, PerfEntry, PerformanceSource};
