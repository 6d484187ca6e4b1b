//! Planar geometry in projected map units (metres).
//!
//! Node coordinates are stored as `f32` on disk and in the node table; all
//! derived geometry (rectangles, distances) is computed in `f64` so that
//! dataset extents read from the header keep their full precision.

/// A point in projected map coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate along `axis`.
    #[inline]
    pub fn coord(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Distance from `self` to the closed segment `a`–`b`.
    ///
    /// A zero-length segment degenerates to the distance to `a`.
    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance(a);
        }
        let t = ((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq;
        let t = t.clamp(0.0, 1.0);
        self.distance(Point::new(a.x + t * dx, a.y + t * dy))
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Splitting axis of a KD-tree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
}

/// Axis-aligned rectangle, `min` corner inclusive, `max` corner inclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Build a rectangle from two opposite corners in any order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Zero-area rectangle at `p`.
    #[inline]
    pub fn from_point(p: Point) -> Self {
        Self { min_x: p.x, min_y: p.y, max_x: p.x, max_y: p.y }
    }

    /// Smallest rectangle containing every point, or `None` for an empty
    /// iterator.
    pub fn enclosing<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Rect::from_point(first), |r, p| r.include(p)))
    }

    /// Grow `self` to contain `p`.
    #[inline]
    pub fn include(self, p: Point) -> Self {
        Self {
            min_x: self.min_x.min(p.x),
            min_y: self.min_y.min(p.y),
            max_x: self.max_x.max(p.x),
            max_y: self.max_y.max(p.y),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) * 0.5, (self.min_y + self.max_y) * 0.5)
    }

    /// Pad every side by `margin`.
    #[inline]
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// `true` if the closed rectangles share at least one point.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.overlaps_on(Axis::X, other) && self.overlaps_on(Axis::Y, other)
    }

    /// `true` if the projections of both rectangles onto `axis` overlap.
    #[inline]
    pub fn overlaps_on(&self, axis: Axis, other: &Rect) -> bool {
        let (lo, hi) = self.span(axis);
        let (other_lo, other_hi) = other.span(axis);
        other_hi >= lo && other_lo <= hi
    }

    /// `(min, max)` along `axis`.
    #[inline]
    pub fn span(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.min_x, self.max_x),
            Axis::Y => (self.min_y, self.max_y),
        }
    }

    /// Axis with the larger extent.  Equal extents split on `Y`.
    #[inline]
    pub fn longer_axis(&self) -> Axis {
        if self.height() < self.width() { Axis::X } else { Axis::Y }
    }

    /// Cut the rectangle at `at` along `axis` into `(low, high)` halves.
    pub fn split(&self, axis: Axis, at: f64) -> (Rect, Rect) {
        match axis {
            Axis::X => (
                Rect { max_x: at, ..*self },
                Rect { min_x: at, ..*self },
            ),
            Axis::Y => (
                Rect { max_y: at, ..*self },
                Rect { min_y: at, ..*self },
            ),
        }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}] x [{:.2}, {:.2}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}
