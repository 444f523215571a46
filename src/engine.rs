//! Constrained relative placement engine.
//!
//! Drives one scene-generation iteration at a time: orders the live
//! objects, places boards and buttons on the reference surface with a
//! bounded randomized search, occasionally seats buttons into board
//! slots, and enforces the one-occluded-face budget. Objects that
//! exhaust every attempt are parked off-scene rather than failing the
//! iteration; only configuration mismatches are errors.

use tracing::{debug, info, trace, warn};

use crate::error::PlaceError;
use crate::geom::{Quat, Vec3};
use crate::occlusion::{face_occluded, OcclusionLog};
use crate::prng::Pcg32;
use crate::refpose::{ReferencePose, ReferencePoseTable};
use crate::slots::{self, BoardStates};
use crate::tables;
use crate::types::{
    Category, IterationReport, NestedPlacement, PlacementParams, RigidPose, SceneObject,
};

/// Maximum randomized surface attempts per object.
const MAX_ATTEMPTS: u32 = 20;

/// Sentinel position outside any capture volume, for objects that
/// exhausted every attempt.
const OFF_SCENE: Vec3 = Vec3::new(100.0, 0.0, 0.0);

/// Bounding-volume overlap predicate, supplied by the rendering side.
/// The engine treats it as an opaque oracle.
pub trait OverlapOracle {
    fn overlaps(&self, a: &SceneObject, b: &SceneObject) -> bool;
}

/// Background index for an iteration: the run walks through the
/// background images in order, spending an equal share of iterations
/// on each.
fn background_index(iteration: u32, background_count: u32, total_iterations: u32) -> u32 {
    let total = total_iterations.max(1) as u64;
    (iteration as u64 * background_count as u64 / total) as u32
}

/// Outcome of placing a single object.
enum Placement {
    /// Committed to the surface.
    Surface,
    /// Seated into a board slot.
    Slot { board_idx: usize, slot: usize },
    /// Every attempt failed; parked at the off-scene sentinel.
    Exhausted,
}

/// Per-run placement engine. Owns the iteration counter, the single
/// random stream, the lazily loaded reference poses, and the
/// occlusion log.
pub struct PlacementEngine {
    params: PlacementParams,
    rng: Pcg32,
    iteration: u32,
    reference_poses: Option<ReferencePoseTable>,
    occlusion_log: OcclusionLog,
}

impl PlacementEngine {
    pub fn new(params: PlacementParams) -> Self {
        let rng = Pcg32::new(params.seed, 0);
        let occlusion_log = OcclusionLog::new(&params.occlusion_log_path);
        Self {
            params,
            rng,
            iteration: 0,
            reference_poses: None,
            occlusion_log,
        }
    }

    /// Iterations completed so far.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Run one full placement pass over the scene.
    ///
    /// Successes are committed through each object's pose; failures
    /// end up at the off-scene sentinel. The report lists both, plus
    /// any slot nesting and the occluded-face acceptance if one
    /// happened.
    pub fn place_iteration(
        &mut self,
        scene: &mut [SceneObject],
        overlap: &dyn OverlapOracle,
    ) -> Result<IterationReport, PlaceError> {
        let table = match self.reference_poses {
            Some(ref table) => table,
            None => {
                // First iteration: load the reference poses and start
                // the occlusion log fresh.
                let table = ReferencePoseTable::load(&self.params.reference_pose_path)?;
                info!(
                    poses = table.len(),
                    path = %self.params.reference_pose_path.display(),
                    "loaded reference poses"
                );
                self.occlusion_log.clear()?;
                &*self.reference_poses.insert(table)
            }
        };

        let bg_index = background_index(
            self.iteration,
            self.params.background_count,
            self.params.total_iterations,
        );
        let reference = *table.get(bg_index)?;

        let order = tables::placement_order(scene);
        let mut placed: Vec<usize> = Vec::with_capacity(scene.len());
        let mut hidden: Vec<usize> = Vec::new();
        let mut nested: Vec<NestedPlacement> = Vec::new();
        let mut board_states = BoardStates::new();
        let mut occluded_face_placed = false;
        let mut occluded: Option<Category> = None;

        for &idx in &order {
            let outcome = self.place_object(
                idx,
                scene,
                &reference,
                &placed,
                &mut board_states,
                &mut occluded_face_placed,
                &mut occluded,
                overlap,
            )?;
            match outcome {
                Placement::Surface => placed.push(idx),
                Placement::Slot { board_idx, slot } => {
                    nested.push(NestedPlacement {
                        button: scene[idx].id.clone(),
                        board: scene[board_idx].id.clone(),
                        slot,
                    });
                    placed.push(idx);
                }
                Placement::Exhausted => hidden.push(idx),
            }
        }

        let report = IterationReport {
            iteration: self.iteration,
            background_index: bg_index,
            placed: placed.iter().map(|&i| scene[i].id.clone()).collect(),
            hidden: hidden.iter().map(|&i| scene[i].id.clone()).collect(),
            nested,
            occluded,
        };
        self.iteration += 1;
        Ok(report)
    }

    /// Place one object: slot-insertion shortcut for buttons, then
    /// the bounded surface search, then the off-scene fallback.
    #[allow(clippy::too_many_arguments)]
    fn place_object(
        &mut self,
        idx: usize,
        scene: &mut [SceneObject],
        reference: &ReferencePose,
        placed: &[usize],
        board_states: &mut BoardStates,
        occluded_face_placed: &mut bool,
        occluded: &mut Option<Category>,
        overlap: &dyn OverlapOracle,
    ) -> Result<Placement, PlaceError> {
        let category = scene[idx].category;

        // Buttons get one shot at going straight into a board slot.
        // The draw picks one of the first two placed objects before
        // looking at what it is, so a non-board target simply wastes
        // the shortcut and falls through to surface placement.
        if !category.is_board() {
            let draw = self.rng.next_below(4) as usize;
            if draw < 2 && placed.len() > 1 {
                let board_idx = placed[draw];
                let target_category = scene[board_idx].category;
                let target_pose = scene[board_idx].pose;
                if let Some((slot, pose)) = slots::try_insert(
                    category,
                    target_category,
                    target_pose,
                    board_states,
                    &mut self.rng,
                ) {
                    scene[idx].pose = pose;
                    debug!(
                        id = %scene[idx].id,
                        board = %target_category,
                        slot,
                        "seated into board slot"
                    );
                    return Ok(Placement::Slot { board_idx, slot });
                }
            }
        }

        for attempt in 0..MAX_ATTEMPTS {
            scene[idx].pose = self.sample_surface_pose(category, reference);

            if placed
                .iter()
                .any(|&j| overlap.overlaps(&scene[idx], &scene[j]))
            {
                trace!(id = %scene[idx].id, attempt, "overlap, retrying");
                continue;
            }

            // Extra roll about the local X axis where the face pattern
            // makes the spin visible. Applied after the overlap check,
            // it never changes the footprint.
            if category.has_axial_variation() {
                let roll = self.rng.next_range(0.0, 360.0);
                scene[idx].pose.rotation =
                    scene[idx].pose.rotation * Quat::from_euler_deg(roll, 0.0, 0.0);
            }

            if let Some(face_distance) = category.face_distance() {
                let is_occluded = face_occluded(
                    &scene[idx].pose,
                    face_distance,
                    self.params.occlusion_tolerance_deg,
                );
                if is_occluded && *occluded_face_placed {
                    // One occluded face per scene; roll a new pose.
                    trace!(id = %scene[idx].id, attempt, "occlusion budget spent, retrying");
                    continue;
                }
                if is_occluded {
                    *occluded_face_placed = true;
                    *occluded = Some(category);
                    self.occlusion_log.append(self.iteration, category)?;
                    debug!(id = %scene[idx].id, "accepted with occluded face");
                }
            }

            debug!(id = %scene[idx].id, attempt, "placed on surface");
            return Ok(Placement::Surface);
        }

        scene[idx].pose.position = OFF_SCENE;
        warn!(
            id = %scene[idx].id,
            attempts = MAX_ATTEMPTS,
            "no valid pose found, parked off-scene"
        );
        Ok(Placement::Exhausted)
    }

    /// Candidate pose on the reference surface: the surface rotation
    /// composed with a fresh random rotation and the category's
    /// resting correction, plus a random local offset (standoff
    /// included) rotated into the absolute frame.
    fn sample_surface_pose(&mut self, category: Category, reference: &ReferencePose) -> RigidPose {
        let [rot_lo, rot_hi] = self.params.rotation_range_deg;
        let random_rotation = Quat::from_euler_deg(
            self.rng.next_range(rot_lo, rot_hi),
            self.rng.next_range(rot_lo, rot_hi),
            self.rng.next_range(rot_lo, rot_hi),
        );

        let [t_lo, t_hi] = self.params.translation_range;
        let mut local = Vec3::new(
            self.rng.next_range(t_lo, t_hi),
            self.rng.next_range(t_lo, t_hi),
            self.rng.next_range(t_lo, t_hi),
        );

        let correction = tables::correction(category);
        local.z += correction.standoff;

        RigidPose {
            position: reference.translation + reference.rotation.rotate(local),
            rotation: reference.rotation
                * random_rotation
                * Quat::from_euler_deg(0.0, correction.yaw_offset_deg, 0.0),
        }
    }
}

// -----------------------------------------------------------------
// Tests
// -----------------------------------------------------------------
