//! Common types and traits for the container coordinate frame.
//!
//! All lengths are centimeters. The frame follows the viewer convention:
//! `x` runs along the container length, `y` is vertical (measured from the floor)
//! and `z` runs across the container width.

use std::ops::{Add, Mul, Sub};

use serde::Serialize;
use utoipa::ToSchema;

/// Numerical tolerance for floating-point comparisons.
pub const EPSILON_GENERAL: f64 = 1e-6;

/// Cubic centimeters per cubic meter.
pub const CM3_PER_M3: f64 = 1_000_000.0;

/// A 3D vector or point in the container frame.
///
/// # Examples
/// ```
/// use container_load_planner::types::Vec3;
///
/// let corner = Vec3::new(-284.5, 0.0, -107.5);
/// let extent = Vec3::new(50.0, 30.0, 40.0);
/// let center = corner + extent * 0.5;
/// assert_eq!(center, Vec3::new(-259.5, 15.0, -87.5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new vector.
    ///
    /// # Parameters
    /// * `x` - Along the container length
    /// * `y` - Vertical
    /// * `z` - Across the container width
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Product of all components; meaningful for extent vectors.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// Anything with a spatial extent in the container frame.
pub trait Dimensional {
    /// Returns the extent along (x, y, z).
    fn extent(&self) -> Vec3;

    /// Volume in cubic centimeters.
    fn volume_cm3(&self) -> f64 {
        self.extent().volume()
    }
}

/// Anything with a weight in kilograms.
pub trait Weighted {
    fn weight_kg(&self) -> f64;
}

/// Axis-aligned bounding box in the container frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a bounding box around a center point.
    #[inline]
    pub fn from_center_and_extent(center: Vec3, extent: Vec3) -> Self {
        let half = extent * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Checks if two boxes overlap with positive volume.
    ///
    /// Touching faces do not count as an intersection.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.max.x <= other.min.x
            || other.max.x <= self.min.x
            || self.max.y <= other.min.y
            || other.max.y <= self.min.y
            || self.max.z <= other.min.z
            || other.max.z <= self.min.z)
    }

    /// Top face height.
    #[inline]
    pub fn top(&self) -> f64 {
        self.max.y
    }
}
