//! 2-D vector math for positions, velocities, and steering forces.
//!
//! `Vector2` uses `f32` like the rest of the spatial code.  All operations are
//! total: normalising or re-scaling the zero vector yields the zero vector
//! instead of NaN.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians (counter-clockwise from +x).
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn mag_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn mag(self) -> f32 {
        self.mag_sq().sqrt()
    }

    #[inline]
    pub fn dist(self, other: Vector2) -> f32 {
        (self - other).mag()
    }

    #[inline]
    pub fn dist_sq(self, other: Vector2) -> f32 {
        (self - other).mag_sq()
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    pub fn normalize(self) -> Vector2 {
        let m = self.mag();
        if m > 0.0 { self / m } else { Vector2::ZERO }
    }

    /// Same direction, magnitude `len`.
    #[inline]
    pub fn with_mag(self, len: f32) -> Vector2 {
        self.normalize() * len
    }

    /// Cap the magnitude at `max`, keeping direction.
    pub fn limit(self, max: f32) -> Vector2 {
        let m2 = self.mag_sq();
        if m2 > max * max && m2 > 0.0 {
            self * (max / m2.sqrt())
        } else {
            self
        }
    }

    /// Rotate by `theta` radians.
    pub fn rotate(self, theta: f32) -> Vector2 {
        let (s, c) = theta.sin_cos();
        Vector2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    #[inline]
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    #[inline]
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;
    #[inline]
    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f32> for Vector2 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f32> for Vector2 {
    type Output = Vector2;
    #[inline]
    fn div(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    #[inline]
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Vector2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
