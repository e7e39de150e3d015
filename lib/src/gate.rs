use std::borrow::Cow;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{downsample, is_sorted_by_x, Point};

/// Series at or below this many points are drawn as is.
pub const DEFAULT_LIMIT: usize = 1000;

// A Reducer turns a series into the one that gets drawn.
pub trait Reducer: Send + Sync {
    // Reduce returns the series to plot. Implementations borrow the input
    // when it needs no reduction.
    fn reduce<'a>(&self, series: &'a [Point]) -> Cow<'a, [Point]>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    pub enabled: bool,
    pub limit: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            enabled: true,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Decides whether a series needs downsampling at all and, if so, reduces it
/// to `limit` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub config: GateConfig,
}

impl Gate {
    pub fn new(limit: usize) -> Self {
        Gate {
            config: GateConfig {
                enabled: true,
                limit,
            },
        }
    }

    // A gate that never reduces.
    pub fn disabled() -> Self {
        Gate {
            config: GateConfig {
                enabled: false,
                ..GateConfig::default()
            },
        }
    }

    pub fn limit(&self) -> usize {
        self.config.limit
    }

    pub fn passes(&self, series: &[Point]) -> bool {
        !self.config.enabled || series.len() <= self.config.limit
    }
}

impl Default for Gate {
    fn default() -> Self {
        Gate::from(GateConfig::default())
    }
}

impl From<GateConfig> for Gate {
    fn from(config: GateConfig) -> Self {
        Gate { config }
    }
}

impl Reducer for Gate {
    fn reduce<'a>(&self, series: &'a [Point]) -> Cow<'a, [Point]> {
        if self.passes(series) {
            debug!(len = series.len(), limit = self.config.limit, "series passes gate");
            return Cow::Borrowed(series);
        }
        Cow::Owned(downsample(series, self.config.limit))
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Gate{{Enabled: {}, Limit: {}}}",
            self.config.enabled, self.config.limit
        )
    }
}

/// Outcome of a single timed reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reduction {
    pub input: usize,
    pub output: usize,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

/// Wraps a Reducer with timing and a debug event per call. The inner reducer
/// stays free of side effects.
#[derive(Debug, Clone, Default)]
pub struct Traced<R> {
    inner: R,
}

impl<R: Reducer> Traced<R> {
    pub fn new(inner: R) -> Self {
        Traced { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn measure<'a>(&self, series: &'a [Point]) -> (Cow<'a, [Point]>, Reduction) {
        if !is_sorted_by_x(series) {
            warn!(len = series.len(), "series is not sorted by x; the plot will not follow the data");
        }
        let began = Instant::now();
        let reduced = self.inner.reduce(series);
        let reduction = Reduction {
            input: series.len(),
            output: reduced.len(),
            elapsed: began.elapsed(),
        };
        debug!(
            input = reduction.input,
            output = reduction.output,
            elapsed = ?reduction.elapsed,
            "reduced series"
        );
        (reduced, reduction)
    }
}

impl<R: Reducer> Reducer for Traced<R> {
    fn reduce<'a>(&self, series: &'a [Point]) -> Cow<'a, [Point]> {
        self.measure(series).0
    }
}
