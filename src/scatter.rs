//! Independent scatter placement for loose parts.
//!
//! Unlike the constrained engine, this samples a pose for a part
//! cluster and a detached fastener independently over a wide volume.
//! The only rule is a clearance box around the cluster: a fastener
//! that would spawn inside it is pushed out to the box's near face so
//! the two never interpenetrate on camera.

use serde::{Deserialize, Serialize};

use crate::geom::{Quat, Vec3};
use crate::prng::Pcg32;
use crate::types::RigidPose;

fn default_position_range() -> [f64; 2] {
    [-100.0, 100.0]
}

fn default_rotation_range() -> [f64; 2] {
    [0.0, 360.0]
}

fn default_clearance() -> f64 {
    // Cluster bounding diameter times a diagonal safety factor.
    0.03 * 1.73
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterParams {
    #[serde(default = "default_position_range")]
    pub position_range: [f64; 2],
    #[serde(default = "default_rotation_range")]
    pub rotation_range_deg: [f64; 2],
    #[serde(default = "default_clearance")]
    pub clearance: f64,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            position_range: default_position_range(),
            rotation_range_deg: default_rotation_range(),
            clearance: default_clearance(),
        }
    }
}

/// Poses produced by one scatter draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoses {
    pub cluster: RigidPose,
    pub fastener: RigidPose,
}

fn sample_vec(rng: &mut Pcg32, [lo, hi]: [f64; 2]) -> Vec3 {
    Vec3::new(
        rng.next_range(lo, hi),
        rng.next_range(lo, hi),
        rng.next_range(lo, hi),
    )
}

fn sample_rotation(rng: &mut Pcg32, [lo, hi]: [f64; 2]) -> Quat {
    Quat::from_euler_deg(
        rng.next_range(lo, hi),
        rng.next_range(lo, hi),
        rng.next_range(lo, hi),
    )
}

/// Draw independent cluster and fastener poses, clamping the fastener
/// out of the cluster's clearance box.
pub fn sample_scatter(params: &ScatterParams, rng: &mut Pcg32) -> ScatterPoses {
    let cluster_position = sample_vec(rng, params.position_range);
    let mut fastener_position = sample_vec(rng, params.position_range);

    let d = params.clearance;
    if fastener_position.z >= cluster_position.z - d
        && fastener_position.x >= cluster_position.x - d
        && fastener_position.x <= cluster_position.x + d
        && fastener_position.y >= cluster_position.y - d
        && fastener_position.y <= cluster_position.y + d
    {
        fastener_position.z = cluster_position.z - d;
    }

    ScatterPoses {
        cluster: RigidPose {
            position: cluster_position,
            rotation: sample_rotation(rng, params.rotation_range_deg),
        },
        fastener: RigidPose {
            position: fastener_position,
            rotation: sample_rotation(rng, params.rotation_range_deg),
        },
    }
}
