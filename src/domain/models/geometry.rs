//! Rectangles and regions used by coverage predicates.
//!
//! A [`Region`] is a union of axis-aligned rectangles. Set operations are
//! computed on a compressed grid built from every rectangle edge involved,
//! which keeps them exact without a general polygon library.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle, half-open on the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge, inclusive.
    pub left: i32,
    /// Top edge, inclusive.
    pub top: i32,
    /// Right edge, exclusive.
    pub right: i32,
    /// Bottom edge, exclusive.
    pub bottom: i32,
}

impl Rect {
    /// Zero-sized rectangle at the origin.
    pub const EMPTY: Self = Self {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    /// Rectangle from its four edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent, negative for inverted rectangles.
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Vertical extent, negative for inverted rectangles.
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Whether the rectangle encloses no pixel.
    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Pixel area, zero when empty.
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            i64::from(self.width()) * i64::from(self.height())
        }
    }

    const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }

    /// Whether `other` lies inside this rectangle. Empty rectangles are contained everywhere.
    pub fn contains(&self, other: &Self) -> bool {
        other.is_empty()
            || (self.left <= other.left
                && self.top <= other.top
                && self.right >= other.right
                && self.bottom >= other.bottom)
    }

    /// Overlap of two rectangles, `None` when they do not touch.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let rect = Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!rect.is_empty()).then_some(rect)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Union of rectangles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Region from rectangles; empty ones are dropped.
    pub fn new(rects: impl IntoIterator<Item = Rect>) -> Self {
        Self {
            rects: rects.into_iter().filter(|r| !r.is_empty()).collect(),
        }
    }

    /// Region covering nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rectangles forming the region, possibly overlapping.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Whether the region covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.rects.iter().all(Rect::is_empty)
    }

    /// Union of this region with another.
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.rects.iter().chain(other.rects.iter()).copied())
    }

    /// Smallest rectangle enclosing the region.
    pub fn bounds(&self) -> Rect {
        self.rects
            .iter()
            .copied()
            .reduce(|acc, r| {
                Rect::new(
                    acc.left.min(r.left),
                    acc.top.min(r.top),
                    acc.right.max(r.right),
                    acc.bottom.max(r.bottom),
                )
            })
            .unwrap_or(Rect::EMPTY)
    }

    fn contains_point(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains_point(x, y))
    }

    /// Area covered by the region, counting overlaps once.
    pub fn area(&self) -> i64 {
        Grid::build(&[self])
            .cells()
            .filter(|cell| self.contains_point(cell.left, cell.top))
            .map(|cell| cell.area())
            .sum()
    }

    /// Part of `self` not covered by `other`.
    pub fn subtract(&self, other: &Self) -> Self {
        let grid = Grid::build(&[self, other]);
        let mut out: Vec<Rect> = Vec::new();
        for cell in grid.cells() {
            if !self.contains_point(cell.left, cell.top) || other.contains_point(cell.left, cell.top)
            {
                continue;
            }
            // Merge with the previous cell of the same row when adjacent.
            match out.last_mut() {
                Some(last)
                    if last.top == cell.top
                        && last.bottom == cell.bottom
                        && last.right == cell.left =>
                {
                    last.right = cell.right;
                }
                _ => out.push(cell),
            }
        }
        Self::new(out)
    }

    /// Part of `self` also inside `other`.
    pub fn intersection(&self, other: &Self) -> Self {
        self.subtract(&self.subtract(other))
    }

    /// True when every point of `other` is inside `self`.
    pub fn covers(&self, other: &Self) -> bool {
        other.subtract(self).is_empty()
    }

    /// True when both regions cover exactly the same points.
    pub fn same_area(&self, other: &Self) -> bool {
        self.covers(other) && other.covers(self)
    }

    /// Whether the regions share at least one pixel.
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersection(other).is_empty()
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::new([rect])
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Region(empty)");
        }
        let parts: Vec<String> = self.rects.iter().map(ToString::to_string).collect();
        write!(f, "Region({})", parts.join(", "))
    }
}

/// Compressed coordinate grid over a set of regions.
struct Grid {
    xs: Vec<i32>,
    ys: Vec<i32>,
}

impl Grid {
    fn build(regions: &[&Region]) -> Self {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for rect in regions.iter().flat_map(|r| r.rects.iter()) {
            xs.extend([rect.left, rect.right]);
            ys.extend([rect.top, rect.bottom]);
        }
        xs.sort_unstable();
        xs.dedup();
        ys.sort_unstable();
        ys.dedup();
        Self { xs, ys }
    }

    fn cells(&self) -> impl Iterator<Item = Rect> + '_ {
        self.ys.windows(2).flat_map(move |y| {
            self.xs
                .windows(2)
                .map(move |x| Rect::new(x[0], y[0], x[1], y[1]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_empty_and_area() {
        assert!(Rect::new(0, 0, 0, 10).is_empty());
        assert_eq!(Rect::new(0, 0, 10, 20).area(), 200);
        assert_eq!(Rect::new(5, 5, 1, 1).area(), 0);
    }

    #[test]
    fn test_region_area_counts_overlap_once() {
        let region = Region::new([Rect::new(0, 0, 10, 10), Rect::new(5, 0, 15, 10)]);
        assert_eq!(region.area(), 150);
    }

    #[test]
    fn test_covers_split_region() {
        let display = Region::from(Rect::new(0, 0, 100, 200));
        let halves = Region::new([Rect::new(0, 0, 100, 100), Rect::new(0, 100, 100, 200)]);
        assert!(halves.covers(&display));
        assert!(halves.same_area(&display));
    }

    #[test]
    fn test_subtract_reports_uncovered_part() {
        let display = Region::from(Rect::new(0, 0, 100, 200));
        let top = Region::from(Rect::new(0, 0, 100, 100));
        let uncovered = display.subtract(&top);
        assert_eq!(uncovered.rects(), &[Rect::new(0, 100, 100, 200)]);
        assert!(!top.covers(&display));
    }

    #[test]
    fn test_overlap() {
        let a = Region::from(Rect::new(0, 0, 10, 10));
        let b = Region::from(Rect::new(9, 9, 20, 20));
        let c = Region::from(Rect::new(10, 10, 20, 20));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_empty_region_is_covered_by_anything() {
        let empty = Region::empty();
        assert!(empty.covers(&Region::empty()));
        assert!(Region::from(Rect::new(0, 0, 1, 1)).covers(&empty));
        assert_eq!(empty.bounds(), Rect::EMPTY);
    }
}
