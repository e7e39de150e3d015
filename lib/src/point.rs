use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

// Point is a single (x, y) sample. x is usually a timestamp.
#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Reports whether x never decreases across the series. NaN x values make a
/// series unsorted.
pub fn is_sorted_by_x(series: &[Point]) -> bool {
    series
        .windows(2)
        .all(|w| matches!(w[0].x.partial_cmp(&w[1].x), Some(Ordering::Less | Ordering::Equal)))
}

/// Stable sort by x. Incomparable values keep their relative order.
pub fn sort_by_x(series: &mut [Point]) {
    series.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
}
