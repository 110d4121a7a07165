// rating.rs - Three-tier metric ratings
//
// Web vital thresholds. Frame rate is higher-is-better and compares with
// >= against both bounds. Everything else is lower-is-better and compares
// with strict <, so a value sitting exactly on a bound falls into the
// worse tier.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Fcp,
    Lcp,
    Cls,
    Inp,
    Ttfb,
    Fps,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
    Neutral,
}

impl Rating {
    /// CSS modifier used by the overlay
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Poor => "poor",
            Rating::Neutral => "neutral",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub good: f64,
    pub poor: f64,
}

impl Metric {
    pub const ALL: [Metric; 6] = [Metric::Fcp, Metric::Lcp, Metric::Cls, Metric::Inp, Metric::Ttfb, Metric::Fps];

    pub fn thresholds(self) -> Thresholds {
        let (good, poor) = match self {
            Metric::Fcp => (1800.0, 3000.0),
            Metric::Lcp => (2500.0, 4000.0),
            Metric::Cls => (0.1, 0.25),
            Metric::Inp => (200.0, 500.0),
            Metric::Ttfb => (800.0, 1800.0),
            Metric::Fps => (55.0, 30.0),
        };
        Thresholds { good, poor }
    }

    pub fn higher_is_better(self) -> bool {
        matches!(self, Metric::Fps)
    }

    pub fn rate(self, value: Option<f64>) -> Rating {
        let Some(v) = value else {
            return Rating::Neutral;
        };
        if v.is_nan() {
            return Rating::Neutral;
        }

        let t = self.thresholds();
        if self.higher_is_better() {
            if v >= t.good {
                Rating::Good
            } else if v >= t.poor {
                Rating::NeedsImprovement
            } else {
                Rating::Poor
            }
        } else if v < t.good {
            Rating::Good
        } else if v < t.poor {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}
