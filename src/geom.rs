//! Rigid-body geometry: 3D vectors, unit quaternions, and the
//! rotation-matrix expansion used to carry local offsets into an
//! absolute reference frame.
//!
//! This is the single source of truth for transform math in the crate.
//! Callers are responsible for supplying normalized quaternions;
//! composition of unit quaternions preserves normalization.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length, also the distance from the observation origin.
    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Unit quaternion (x, y, z, w), w is the scalar part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    fn about_x(rad: f64) -> Self {
        let half = rad / 2.0;
        Self::new(half.sin(), 0.0, 0.0, half.cos())
    }

    fn about_y(rad: f64) -> Self {
        let half = rad / 2.0;
        Self::new(0.0, half.sin(), 0.0, half.cos())
    }

    fn about_z(rad: f64) -> Self {
        let half = rad / 2.0;
        Self::new(0.0, 0.0, half.sin(), half.cos())
    }

    /// Rotation from Euler angles in degrees, applied about the world
    /// Z axis, then X, then Y. This matches the convention the
    /// reference-pose resource and the correction tables were authored
    /// against.
    pub fn from_euler_deg(x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        Self::about_y(y_deg.to_radians())
            * Self::about_x(x_deg.to_radians())
            * Self::about_z(z_deg.to_radians())
    }

    /// Rotate a vector into this quaternion's frame via the standard
    /// rotation-matrix expansion.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let (qx, qy, qz, qw) = (self.x, self.y, self.z, self.w);

        let r11 = 1.0 - 2.0 * (qy * qy + qz * qz);
        let r12 = 2.0 * (qx * qy - qz * qw);
        let r13 = 2.0 * (qx * qz + qy * qw);
        let r21 = 2.0 * (qx * qy + qz * qw);
        let r22 = 1.0 - 2.0 * (qx * qx + qz * qz);
        let r23 = 2.0 * (qy * qz - qx * qw);
        let r31 = 2.0 * (qx * qz - qy * qw);
        let r32 = 2.0 * (qy * qz + qx * qw);
        let r33 = 1.0 - 2.0 * (qx * qx + qy * qy);

        Vec3::new(
            r11 * v.x + r12 * v.y + r13 * v.z,
            r21 * v.x + r22 * v.y + r23 * v.z,
            r31 * v.x + r32 * v.y + r33 * v.z,
        )
    }
}

impl Mul for Quat {
    type Output = Quat;

    /// Hamilton product; `a * b` applies `b` first, then `a`.
    fn mul(self, rhs: Quat) -> Quat {
        Quat::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::Pcg32;

    const EPS: f64 = 1e-9;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS && (a.z - b.z).abs() < EPS
    }

    #[test]
    fn identity_rotation_is_noop() {
        let v = Vec3::new(1.5, -2.0, 0.25);
        assert!(approx(Quat::IDENTITY.rotate(v), v));
    }

    #[test]
    fn yaw_minus_90_maps_x_to_z() {
        let q = Quat::from_euler_deg(0.0, -90.0, 0.0);
        let v = q.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(v, Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn rotation_preserves_magnitude() {
        let mut rng = Pcg32::new(7, 0);
        for _ in 0..200 {
            let q = Quat::from_euler_deg(
                rng.next_range(0.0, 360.0),
                rng.next_range(0.0, 360.0),
                rng.next_range(0.0, 360.0),
            );
            let v = Vec3::new(
                rng.next_range(-1.0, 1.0),
                rng.next_range(-1.0, 1.0),
                rng.next_range(-1.0, 1.0),
            );
            let rotated = q.rotate(v);
            assert!((rotated.magnitude() - v.magnitude()).abs() < EPS);
        }
    }

    #[test]
    fn composition_matches_sequential_rotation() {
        let a = Quat::from_euler_deg(30.0, 0.0, 0.0);
        let b = Quat::from_euler_deg(0.0, 45.0, 0.0);
        let v = Vec3::new(0.3, -1.2, 0.7);
        assert!(approx((b * a).rotate(v), b.rotate(a.rotate(v))));
    }

    #[test]
    fn unit_product_stays_unit() {
        let a = Quat::from_euler_deg(12.0, 250.0, 99.0);
        let b = Quat::from_euler_deg(301.0, 5.5, 180.0);
        let q = a * b;
        let norm = (q.x * q.x + q.y * q.y + q.z * q.z + q.w * q.w).sqrt();
        assert!((norm - 1.0).abs() < EPS);
    }

    #[test]
    fn vec_ops() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, -1.0, 2.0);
        assert!(approx(a + b, Vec3::new(1.5, 1.0, 5.0)));
        assert!(approx(a - b, Vec3::new(0.5, 3.0, 1.0)));
        assert!(approx(a * 2.0, Vec3::new(2.0, 4.0, 6.0)));
        assert!((Vec3::new(3.0, 4.0, 0.0).magnitude() - 5.0).abs() < EPS);
    }
}
