//! Largest Triangle Three Buckets (LTTB) downsampling.
//!
//! Reduces a series of (x, y) points to at most `threshold` points while
//! preserving the visual shape of the data. The input is expected to be
//! sorted by x; unsorted input still yields a deterministic result, it just
//! no longer looks like the original curve.

use std::ops::Range;

use crate::{Error, Point};

/// A validated downsampling target. Zero means "do not reduce".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(usize);

impl Threshold {
    pub const fn new(n: usize) -> Self {
        Threshold(n)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for Threshold {
    fn from(n: usize) -> Self {
        Threshold(n)
    }
}

impl TryFrom<i64> for Threshold {
    type Error = Error;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .map(Threshold)
            .map_err(|_| Error::InvalidThreshold(n))
    }
}

/// Splits the interior of a series (everything but the first and last point)
/// into `threshold - 2` buckets of `step` points each.
#[derive(Debug, Clone, Copy)]
pub struct Buckets {
    len: usize,
    count: usize,
    step: f64,
}

impl Buckets {
    /// Requires `3 <= threshold < len`.
    pub fn new(len: usize, threshold: usize) -> Self {
        debug_assert!(threshold >= 3 && threshold < len);
        let count = threshold - 2;
        Buckets {
            len,
            count,
            step: (len - 2) as f64 / count as f64,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    // floor(k * step) + 1
    fn edge(&self, k: usize) -> usize {
        (k as f64 * self.step).floor() as usize + 1
    }

    /// Candidates for bucket `i`.
    pub fn selection(&self, i: usize) -> Range<usize> {
        let end = self.edge(i + 1).min(self.len);
        self.edge(i).min(end)..end
    }

    /// The bucket after `i`, whose centroid is the far vertex of the triangle.
    pub fn averaging(&self, i: usize) -> Range<usize> {
        let end = self.edge(i + 2).min(self.len);
        self.edge(i + 1).min(end)..end
    }
}

/// Mean of the given points, or `None` when there are none.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let n = points.len() as f64;
    Some(Point::new(sum_x / n, sum_y / n))
}

/// Unsigned area of the triangle (a, p, c).
pub fn triangle_area(a: Point, p: Point, c: Point) -> f64 {
    0.5 * ((a.x - c.x) * (p.y - a.y) - (a.x - p.x) * (c.y - a.y)).abs()
}

/// Returns the offset into `candidates` of the point forming the largest
/// triangle with `anchor` and `centroid`. The first maximum wins; NaN areas
/// never do. `None` when nothing qualifies.
pub fn largest_triangle(anchor: Point, candidates: &[Point], centroid: Point) -> Option<usize> {
    let mut max_area = -1.0f64;
    let mut max_idx = None;

    for (j, &p) in candidates.iter().enumerate() {
        let area = triangle_area(anchor, p, centroid);
        if area > max_area {
            max_area = area;
            max_idx = Some(j);
        }
    }

    max_idx
}

/// Downsamples `data` to at most `threshold` points.
///
/// Returns a copy of the input when `threshold == 0` or the input already fits.
/// Otherwise the output always starts and ends with the input's first and last
/// points, with one point per interior bucket in between. A threshold of 1
/// still yields both endpoints.
pub fn downsample(data: &[Point], threshold: usize) -> Vec<Point> {
    let n = data.len();
    if threshold == 0 || threshold >= n {
        return data.to_vec();
    }

    // No interior buckets fit, only the endpoints survive.
    if threshold < 3 {
        return vec![data[0], data[n - 1]];
    }

    let buckets = Buckets::new(n, threshold);
    let last = data[n - 1];

    let mut sampled = Vec::with_capacity(threshold);
    sampled.push(data[0]);

    let mut a_idx = 0usize;

    for i in 0..buckets.count() {
        // An empty averaging bucket can only sit at the tail, so the last
        // point stands in for its centroid.
        let c = centroid(&data[buckets.averaging(i)]).unwrap_or(last);

        let range = buckets.selection(i);
        let start = range.start;
        if let Some(j) = largest_triangle(data[a_idx], &data[range], c) {
            a_idx = start + j;
            sampled.push(data[a_idx]);
        }
    }

    sampled.push(last);
    sampled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(pairs: &[(f64, f64)]) -> Vec<Point> {
        pairs.iter().copied().map(Point::from).collect()
    }

    fn line(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, i as f64)).collect()
    }

    #[test]
    fn threshold_ge_n_returns_original() {
        let data = line(5);
        assert_eq!(downsample(&data, 5), data);
        assert_eq!(downsample(&data, 10), data);
    }

    #[test]
    fn threshold_zero_returns_original() {
        let data = line(50);
        assert_eq!(downsample(&data, 0), data);
    }

    #[test]
    fn tiny_thresholds_keep_endpoints() {
        let data = line(5);
        let endpoints = vec![Point::new(0.0, 0.0), Point::new(4.0, 4.0)];
        assert_eq!(downsample(&data, 1), endpoints);
        assert_eq!(downsample(&data, 2), endpoints);
    }

    #[test]
    fn empty_input() {
        assert!(downsample(&[], 0).is_empty());
        assert!(downsample(&[], 3).is_empty());
        assert!(downsample(&[], 1000).is_empty());
    }

    #[test]
    fn single_point() {
        let data = points(&[(1.0, 1.0)]);
        assert_eq!(downsample(&data, 5), data);
    }

    #[test]
    fn two_points() {
        let data = points(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(downsample(&data, 5), data);
    }

    #[test]
    fn three_points_to_three() {
        let data = points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(downsample(&data, 3), data);
    }

    #[test]
    fn preserves_first_and_last() {
        let data = line(10);
        let result = downsample(&data, 5);
        assert_eq!(result.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(result.last(), Some(&Point::new(9.0, 9.0)));
    }

    #[test]
    fn correct_downsampling_size() {
        let data: Vec<Point> = (0..100)
            .map(|i| Point::new(i as f64, (i * i) as f64))
            .collect();
        assert_eq!(downsample(&data, 20).len(), 20);
    }

    #[test]
    fn bucket_ranges() {
        let b = Buckets::new(11, 5);
        assert_eq!(b.count(), 3);
        assert_eq!(b.step(), 3.0);
        assert_eq!(b.selection(0), 1..4);
        assert_eq!(b.averaging(0), 4..7);
        assert_eq!(b.selection(1), 4..7);
        assert_eq!(b.averaging(1), 7..10);
        assert_eq!(b.selection(2), 7..10);
        assert_eq!(b.averaging(2), 10..11);
    }

    #[test]
    fn buckets_cover_interior() {
        for (n, t) in [(10, 3), (11, 5), (100, 7), (1200, 1000), (2000, 1000), (1001, 1000)] {
            let b = Buckets::new(n, t);
            let mut next = 1;
            for i in 0..b.count() {
                let sel = b.selection(i);
                assert_eq!(sel.start, next, "n={n} t={t} i={i}");
                assert!(!sel.is_empty(), "n={n} t={t} i={i}");
                let avg = b.averaging(i);
                assert_eq!(avg.start, sel.end);
                assert!(avg.end <= n);
                next = sel.end;
            }
            assert!(next >= n - 2 && next < n, "n={n} t={t}");
        }
    }

    #[test]
    fn centroid_of_points() {
        let c = centroid(&points(&[(0.0, 0.0), (2.0, 4.0), (4.0, 2.0)]));
        assert_eq!(c, Some(Point::new(2.0, 2.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn area_of_right_triangle() {
        let area = triangle_area(
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(4.0, 0.0),
        );
        assert_eq!(area, 6.0);
    }

    #[test]
    fn first_maximum_wins() {
        let a = Point::new(0.0, 0.0);
        let c = Point::new(4.0, 0.0);
        let candidates = points(&[(1.0, 1.0), (2.0, -2.0), (3.0, 2.0)]);
        assert_eq!(largest_triangle(a, &candidates, c), Some(1));

        let flat = points(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert_eq!(largest_triangle(a, &flat, c), Some(0));
    }

    #[test]
    fn empty_or_nan_candidates_select_nothing() {
        let a = Point::new(0.0, 0.0);
        let c = Point::new(4.0, 0.0);
        assert_eq!(largest_triangle(a, &[], c), None);
        assert_eq!(
            largest_triangle(a, &[Point::new(1.0, f64::NAN)], c),
            None
        );
    }

    #[test]
    fn nan_buckets_carry_anchor() {
        // The NaN poisons the centroid of bucket 0, so nothing is selected
        // there and the first point stays the anchor for bucket 1.
        let data = points(&[
            (0.0, 0.0),
            (1.0, 5.0),
            (2.0, f64::NAN),
            (3.0, 1.0),
            (4.0, 0.0),
        ]);
        let result = downsample(&data, 4);
        assert_eq!(result, points(&[(0.0, 0.0), (3.0, 1.0), (4.0, 0.0)]));
    }

    #[test]
    fn ten_points_to_three() {
        let data = points(&[
            (0.0, 0.0),
            (1.0, 10.0),
            (2.0, 2.0),
            (3.0, 8.0),
            (4.0, 4.0),
            (5.0, 6.0),
            (6.0, 1.0),
            (7.0, 9.0),
            (8.0, 3.0),
            (9.0, 7.0),
        ]);
        let result = downsample(&data, 3);
        assert_eq!(result, points(&[(0.0, 0.0), (1.0, 10.0), (9.0, 7.0)]));
    }

    #[test]
    fn known_downsampling() {
        let data = points(&[
            (0.0, 0.0),
            (1.0, 5.0),
            (2.0, 1.0),
            (3.0, 0.0),
            (4.0, 0.0),
            (5.0, 9.0),
            (6.0, 0.0),
            (7.0, 0.0),
            (8.0, 2.0),
            (9.0, 0.0),
            (10.0, 0.0),
        ]);
        let result = downsample(&data, 5);
        assert_eq!(
            result,
            points(&[(0.0, 0.0), (1.0, 5.0), (5.0, 9.0), (7.0, 0.0), (10.0, 0.0)])
        );
    }

    #[test]
    fn sine_wave() {
        let data: Vec<Point> = (0..1200)
            .map(|i| Point::new(i as f64, (i as f64).sin()))
            .collect();
        let result = downsample(&data, 1000);
        assert_eq!(result.len(), 1000);
        assert_eq!(result[0], Point::new(0.0, 0.0));
        assert_eq!(result[999], Point::new(1199.0, 1199f64.sin()));
    }

    #[test]
    fn below_threshold_is_identity() {
        let data: Vec<Point> = (0..500)
            .map(|i| Point::new(i as f64, (i % 7) as f64))
            .collect();
        assert_eq!(downsample(&data, 1000), data);
    }

    #[test]
    fn flat_line_picks_first_candidates() {
        let data: Vec<Point> = (0..2000).map(|i| Point::new(i as f64, 3.0)).collect();
        let result = downsample(&data, 1000);
        assert_eq!(result.len(), 1000);

        let buckets = Buckets::new(2000, 1000);
        for i in 0..buckets.count() {
            assert_eq!(result[i + 1], data[buckets.selection(i).start]);
        }
    }

    #[test]
    fn deterministic() {
        let data: Vec<Point> = (0..5000)
            .map(|i| Point::new(i as f64, ((i * 7919) % 113) as f64))
            .collect();
        let a = downsample(&data, 321);
        let b = downsample(&data, 321);
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(&b) {
            assert_eq!(p.x.to_bits(), q.x.to_bits());
            assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
    }

    #[test]
    fn threshold_from_signed() {
        assert_eq!(Threshold::try_from(0i64).unwrap().get(), 0);
        assert_eq!(Threshold::try_from(1000i64).unwrap(), Threshold::new(1000));
        assert!(matches!(
            Threshold::try_from(-1i64),
            Err(Error::InvalidThreshold(-1))
        ));
    }
}
