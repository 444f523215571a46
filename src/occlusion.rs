//! Face-visibility test for buttons, and the append-only occlusion
//! event log.
//!
//! The observation origin is fixed at the world origin. A button's
//! marked face sits a known distance from its center along the local
//! X axis; the law of cosines over the origin-center-face triangle
//! gives the angle between the face normal direction and the line of
//! sight. The face counts as occluded strictly below 90 degrees minus
//! the configured tolerance, never at or above.

use std::f64::consts::FRAC_PI_2;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::PlaceError;
use crate::geom::Vec3;
use crate::types::{Category, RigidPose};

/// Below this, the triangle degenerates and the test reports visible.
const DEGENERATE_EPS: f64 = 1e-12;

/// Law-of-cosines visibility test for a button's marked face.
///
/// `face_distance` is the category constant from object center to
/// face center. The acos argument is clamped to [-1, 1] so numerical
/// drift on near-collinear geometry cannot produce NaN.
pub fn face_occluded(pose: &RigidPose, face_distance: f64, tolerance_deg: f64) -> bool {
    let face = pose.position + pose.rotation.rotate(Vec3::new(face_distance, 0.0, 0.0));

    let a = face.magnitude();
    let b = face_distance;
    let c = pose.position.magnitude();

    if a.abs() < DEGENERATE_EPS || b.abs() < DEGENERATE_EPS {
        return false;
    }

    let cos_gamma = ((c * c - a * a - b * b) / (-2.0 * a * b)).clamp(-1.0, 1.0);
    let gamma = cos_gamma.acos();

    gamma < FRAC_PI_2 - tolerance_deg.to_radians()
}

/// Append-only record of occluded-face acceptances, one line per
/// event: `<iteration> <category>`. Truncated at the start of a run.
#[derive(Debug)]
pub struct OcclusionLog {
    path: PathBuf,
}

impl OcclusionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop any events from a previous run.
    pub fn clear(&self) -> Result<(), PlaceError> {
        File::create(&self.path).map_err(PlaceError::OcclusionLog)?;
        Ok(())
    }

    pub fn append(&self, iteration: u32, category: Category) -> Result<(), PlaceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(PlaceError::OcclusionLog)?;
        writeln!(file, "{} {}", iteration, category.as_str()).map_err(PlaceError::OcclusionLog)
    }
}
