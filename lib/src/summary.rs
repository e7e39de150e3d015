use std::cmp::Ordering;

use serde::Serialize;

use crate::{Point, Reduction};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    fn widen(extent: &mut Option<Extent>, v: f64) {
        if v.is_nan() {
            return;
        }
        match extent {
            Some(e) => {
                e.min = e.min.min(v);
                e.max = e.max.max(v);
            }
            None => *extent = Some(Extent { min: v, max: v }),
        }
    }
}

/// Point count and bounds of a series. NaN coordinates are ignored for the
/// bounds; an empty series has none.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub points: usize,
    pub x: Option<Extent>,
    pub y: Option<Extent>,
    pub sorted: bool,
    #[serde(skip)]
    last_x: Option<f64>,
}

impl Summary {
    pub fn new() -> Self {
        Summary {
            sorted: true,
            ..Summary::default()
        }
    }

    pub fn add(&mut self, p: &Point) {
        self.points += 1;
        Extent::widen(&mut self.x, p.x);
        Extent::widen(&mut self.y, p.y);

        if let Some(prev) = self.last_x {
            if !matches!(prev.partial_cmp(&p.x), Some(Ordering::Less | Ordering::Equal)) {
                self.sorted = false;
            }
        }
        self.last_x = Some(p.x);
    }
}

impl<'a> FromIterator<&'a Point> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a Point>>(iter: I) -> Self {
        let mut summary = Summary::new();
        for p in iter {
            summary.add(p);
        }
        summary
    }
}

/// Before and after of one gated reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Report {
    pub input: Summary,
    pub output: Summary,
    pub reduction: Reduction,
}

impl Report {
    pub fn new(input: &[Point], output: &[Point], reduction: Reduction) -> Self {
        Report {
            input: input.iter().collect(),
            output: output.iter().collect(),
            reduction,
        }
    }

    // Fraction of input points kept, 1 for an empty input.
    pub fn ratio(&self) -> f64 {
        if self.input.points == 0 {
            return 1.0;
        }
        self.output.points as f64 / self.input.points as f64
    }
}
