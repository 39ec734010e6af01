//! Geometry primitives shared by every Trellis crate.
//!
//! - [`Point`]: a pair of coordinates with componentwise arithmetic
//! - [`Area`]: an axis-aligned rectangle stored as two normalized corners
//!
//! Both types are generic over the coordinate type. Widget geometry uses
//! `f64` (the default), pixel-level helpers use integer coordinates.
//!
//! # Example
//!
//! ```
//! use trellis_core::{Area, Point};
//!
//! let mut damage = Area::new(0.0, 0.0, 10.0, 10.0);
//! damage += Area::new(5.0, 5.0, 10.0, 10.0);
//! assert_eq!(damage, Area::new(0.0, 0.0, 15.0, 15.0));
//!
//! assert!(damage.contains(Point::new(15.0, 15.0)));
//! ```

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Numeric types usable as coordinates.
///
/// Implemented for the primitive integer and floating point types.
pub trait Coord:
    Copy
    + Default
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
}

impl<T> Coord for T where
    T: Copy
        + Default
        + PartialOrd
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
{
}

#[inline]
fn min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

#[inline]
fn max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

/// A point in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point<T = f64> {
    /// X coordinate.
    pub x: T,
    /// Y coordinate.
    pub y: T,
}

impl<T> Point<T> {
    /// Create a new point.
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl Point<f64> {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point<f64>) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Reject NaN and infinite coordinates.
    pub fn finite(self, context: &'static str) -> CoreResult<Self> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(self)
        } else {
            Err(CoreError::NonFiniteCoordinate { context })
        }
    }
}

impl<T: Add<Output = T>> Add for Point<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for Point<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Copy + Add<Output = T>> AddAssign for Point<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.x = self.x + rhs.x;
        self.y = self.y + rhs.y;
    }
}

impl<T: Copy + Sub<Output = T>> SubAssign for Point<T> {
    fn sub_assign(&mut self, rhs: Self) {
        self.x = self.x - rhs.x;
        self.y = self.y - rhs.y;
    }
}

impl<T: Copy + Mul<Output = T>> Mul<T> for Point<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl<T: Copy + Div<Output = T>> Div<T> for Point<T> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl<T: Neg<Output = T>> Neg for Point<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<T> From<(T, T)> for Point<T> {
    fn from((x, y): (T, T)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle.
///
/// The two corners are always normalized so that `p1 <= p2` componentwise.
/// The default value is the empty area. Union with an empty area yields the
/// other operand; intersection of non-overlapping areas yields the empty area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "AreaRepr<T>", into = "AreaRepr<T>")]
#[serde(bound(
    serialize = "T: Coord + Serialize",
    deserialize = "T: Coord + Deserialize<'de>"
))]
pub struct Area<T = f64> {
    p1: Point<T>,
    p2: Point<T>,
}

/// Serialized form: position and extends.
#[derive(Serialize, Deserialize)]
struct AreaRepr<T> {
    x: T,
    y: T,
    width: T,
    height: T,
}

impl<T: Coord> From<AreaRepr<T>> for Area<T> {
    fn from(r: AreaRepr<T>) -> Self {
        Area::new(r.x, r.y, r.width, r.height)
    }
}

impl<T: Coord> From<Area<T>> for AreaRepr<T> {
    fn from(a: Area<T>) -> Self {
        AreaRepr {
            x: a.p1.x,
            y: a.p1.y,
            width: a.width(),
            height: a.height(),
        }
    }
}

impl<T: Coord> Area<T> {
    /// Create an area from a position and extends.
    ///
    /// Negative extends are normalized, so the result always covers the
    /// rectangle spanned by the two corners.
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Self::from_points(Point::new(x, y), Point::new(x + width, y + height))
    }

    /// Create an area spanned by two arbitrary corners.
    pub fn from_points(a: Point<T>, b: Point<T>) -> Self {
        Self {
            p1: Point::new(min(a.x, b.x), min(a.y, b.y)),
            p2: Point::new(max(a.x, b.x), max(a.y, b.y)),
        }
    }

    /// Create an area at `position` with the given extends.
    pub fn from_position(position: Point<T>, extends: Point<T>) -> Self {
        Self::new(position.x, position.y, extends.x, extends.y)
    }

    /// Top-left corner.
    #[inline]
    pub fn position(&self) -> Point<T> {
        self.p1
    }

    /// Bottom-right corner.
    #[inline]
    pub fn end(&self) -> Point<T> {
        self.p2
    }

    /// Width and height.
    #[inline]
    pub fn extends(&self) -> Point<T> {
        self.p2 - self.p1
    }

    #[inline]
    pub fn x(&self) -> T {
        self.p1.x
    }

    #[inline]
    pub fn y(&self) -> T {
        self.p1.y
    }

    #[inline]
    pub fn width(&self) -> T {
        self.p2.x - self.p1.x
    }

    #[inline]
    pub fn height(&self) -> T {
        self.p2.y - self.p1.y
    }

    /// Whether this is the empty area (both extends are zero).
    pub fn is_empty(&self) -> bool {
        let zero = T::default();
        self.width() == zero && self.height() == zero
    }

    /// Move the area so that its top-left corner is at `position`.
    pub fn move_to(&mut self, position: Point<T>) {
        let extends = self.extends();
        self.p1 = position;
        self.p2 = position + extends;
    }

    /// Move the area by an offset.
    pub fn move_by(&mut self, offset: Point<T>) {
        self.p1 += offset;
        self.p2 += offset;
    }

    /// Return a copy moved by an offset.
    pub fn moved(mut self, offset: Point<T>) -> Self {
        self.move_by(offset);
        self
    }

    /// Resize the area, keeping its top-left corner. Negative extends are
    /// clamped to zero.
    pub fn resize(&mut self, extends: Point<T>) {
        let zero = T::default();
        self.p2 = self.p1 + Point::new(max(extends.x, zero), max(extends.y, zero));
    }

    /// Whether the point lies inside the area. Both edges are inclusive.
    pub fn contains(&self, point: Point<T>) -> bool {
        point.x >= self.p1.x && point.x <= self.p2.x && point.y >= self.p1.y && point.y <= self.p2.y
    }

    /// Whether `other` lies completely inside this area.
    pub fn includes(&self, other: &Area<T>) -> bool {
        self.contains(other.p1) && self.contains(other.p2)
    }

    /// Whether the two areas share at least one point. Edges are inclusive.
    pub fn overlaps(&self, other: &Area<T>) -> bool {
        !(other.p1.x > self.p2.x
            || other.p2.x < self.p1.x
            || other.p1.y > self.p2.y
            || other.p2.y < self.p1.y)
    }

    /// Smallest area covering both operands.
    pub fn union(&self, other: &Area<T>) -> Area<T> {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Area {
            p1: Point::new(min(self.p1.x, other.p1.x), min(self.p1.y, other.p1.y)),
            p2: Point::new(max(self.p2.x, other.p2.x), max(self.p2.y, other.p2.y)),
        }
    }

    /// Common part of both operands, or the empty area if they do not
    /// overlap.
    pub fn intersection(&self, other: &Area<T>) -> Area<T> {
        if !self.overlaps(other) {
            return Area::default();
        }
        Area {
            p1: Point::new(max(self.p1.x, other.p1.x), max(self.p1.y, other.p1.y)),
            p2: Point::new(min(self.p2.x, other.p2.x), min(self.p2.y, other.p2.y)),
        }
    }
}

impl Area<f64> {
    /// Scale both corners by a factor (used for zoom).
    pub fn scaled(&self, factor: f64) -> Area<f64> {
        Area::from_points(self.p1 * factor, self.p2 * factor)
    }

    /// Smallest integer area covering this area.
    pub fn to_pixels(&self) -> Area<i32> {
        Area::from_points(
            Point::new(self.p1.x.floor() as i32, self.p1.y.floor() as i32),
            Point::new(self.p2.x.ceil() as i32, self.p2.y.ceil() as i32),
        )
    }
}

impl<T: Coord> AddAssign for Area<T> {
    /// Union.
    fn add_assign(&mut self, rhs: Self) {
        *self = self.union(&rhs);
    }
}

impl<T: Coord> Add for Area<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.union(&rhs)
    }
}

impl<T: Coord> MulAssign for Area<T> {
    /// Intersection.
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.intersection(&rhs);
    }
}

impl<T: Coord> Mul for Area<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.intersection(&rhs)
    }
}
