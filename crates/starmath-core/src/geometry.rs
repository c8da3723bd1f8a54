use num_traits::{Num, NumCast};
use serde::{Deserialize, Serialize};

/// A position in image coordinates (x = column, y = row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T: Copy + Num + NumCast> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn translated(&self, dx: T, dy: T) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Point<f64> {
    pub fn distance(&self, other: &Point<f64>) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Nearest pixel.
    pub fn round(&self) -> Point<i32> {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T: Copy + Num + PartialOrd> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    pub fn square(edge: T) -> Self {
        Self::new(edge, edge)
    }

    pub fn area(&self) -> T {
        self.width * self.height
    }
}

/// Axis-aligned rectangle. `x`/`y` is the top-left corner; the right and
/// bottom edges are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T: Copy + Num + NumCast + PartialOrd> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect of the given size whose center pixel is `center`.
    pub fn from_center_point(center: Point<T>, size: Size<T>) -> Self {
        let two = T::one() + T::one();
        let dx = (size.width - T::one()) / two;
        let dy = (size.height - T::one()) / two;
        Self::new(center.x - dx, center.y - dy, size.width, size.height)
    }

    pub fn right(&self) -> T {
        self.x + self.width
    }

    pub fn bottom(&self) -> T {
        self.y + self.height
    }

    pub fn size(&self) -> Size<T> {
        Size::new(self.width, self.height)
    }

    pub fn area(&self) -> T {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= T::zero() || self.height <= T::zero()
    }

    pub fn center(&self) -> Point<T> {
        let two = T::one() + T::one();
        Point::new(self.x + self.width / two, self.y + self.height / two)
    }

    /// True if `other` lies completely inside `self`.
    pub fn contains(&self, other: &Rect<T>) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn contains_point(&self, p: &Point<T>) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Overlapping part of two rects, `None` if they do not overlap.
    pub fn intersect(&self, other: &Rect<T>) -> Option<Rect<T>> {
        let x0 = max(self.x, other.x);
        let y0 = max(self.y, other.y);
        let x1 = min(self.right(), other.right());
        let y1 = min(self.bottom(), other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Square with side `max(width, height)` around the same center.
    pub fn expand_to_square(&self) -> Self {
        let two = T::one() + T::one();
        let side = max(self.width, self.height);
        Self::new(
            self.x - (side - self.width) / two,
            self.y - (side - self.height) / two,
            side,
            side,
        )
    }

    /// Grow by `by` pixels on every side.
    pub fn grow(&self, by: T) -> Self {
        let two = T::one() + T::one();
        Self::new(
            self.x - by,
            self.y - by,
            self.width + two * by,
            self.height + two * by,
        )
    }

    /// Shrink by `by` pixels on every side. The size never goes negative.
    pub fn shrink(&self, by: T) -> Self {
        let two = T::one() + T::one();
        let width = max(self.width - two * by, T::zero());
        let height = max(self.height - two * by, T::zero());
        Self::new(self.x + by, self.y + by, width, height)
    }

    pub fn translated(&self, dx: T, dy: T) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

fn max<T: PartialOrd>(a: T, b: T) -> T {
    if a >= b {
        a
    } else {
        b
    }
}

fn min<T: PartialOrd>(a: T, b: T) -> T {
    if a <= b {
        a
    } else {
        b
    }
}
