//! Static per-category tables: resting-pose corrections, board slot
//! offsets, and the fixed processing order.
//!
//! Keyed by `Category` so a missing entry is a compile error rather
//! than a runtime lookup failure. The constants were measured against
//! the real parts and are not derived from anything in this crate.

use crate::geom::Vec3;
use crate::types::{Category, SceneObject};

/// Static adjustment approximating how a category rests on a surface:
/// an extra yaw and a standoff along the local Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseCorrection {
    pub yaw_offset_deg: f64,
    pub standoff: f64,
}

pub fn correction(category: Category) -> PoseCorrection {
    match category {
        Category::ThreeSlotBoard | Category::TwoSlotBoard => PoseCorrection {
            yaw_offset_deg: 0.0,
            standoff: 0.0275,
        },
        Category::ArrowButton | Category::RedButton => PoseCorrection {
            yaw_offset_deg: -14.17,
            standoff: 0.0138,
        },
        Category::MushroomButton => PoseCorrection {
            yaw_offset_deg: -12.74,
            standoff: 0.0195,
        },
    }
}

// Slot offsets are in the board's local frame, one entry per physical
// slot. The mushroom button sits higher than the flat buttons, which
// share a profile.

const MUSHROOM_TWO_SLOT: [Vec3; 2] = [
    Vec3::new(0.0, 1.506, 0.0356),
    Vec3::new(0.0, -1.506, 0.0356),
];

const MUSHROOM_THREE_SLOT: [Vec3; 3] = [
    Vec3::new(0.0, 0.0301, 0.0356),
    Vec3::new(0.0, 0.0, 0.0356),
    Vec3::new(0.0, -0.0301, 0.0356),
];

const FLAT_TWO_SLOT: [Vec3; 2] = [
    Vec3::new(0.0, 1.506, 0.0251),
    Vec3::new(0.0, -1.506, 0.0251),
];

const FLAT_THREE_SLOT: [Vec3; 3] = [
    Vec3::new(0.0, 0.0301, 0.0251),
    Vec3::new(0.0, 0.0, 0.0251),
    Vec3::new(0.0, -0.0301, 0.0251),
];

/// Local slot offsets for seating `button` into `board`. `None` for
/// any pairing that is not a button on a board.
pub fn slot_offsets(button: Category, board: Category) -> Option<&'static [Vec3]> {
    match (button, board) {
        (Category::MushroomButton, Category::TwoSlotBoard) => Some(&MUSHROOM_TWO_SLOT),
        (Category::MushroomButton, Category::ThreeSlotBoard) => Some(&MUSHROOM_THREE_SLOT),
        (Category::ArrowButton | Category::RedButton, Category::TwoSlotBoard) => {
            Some(&FLAT_TWO_SLOT)
        }
        (Category::ArrowButton | Category::RedButton, Category::ThreeSlotBoard) => {
            Some(&FLAT_THREE_SLOT)
        }
        _ => None,
    }
}

/// Indices into `scene` in processing order: boards first, then
/// buttons in their fixed priority. Stable within a category.
pub fn placement_order(scene: &[SceneObject]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scene.len()).collect();
    order.sort_by_key(|&i| scene[i].category.priority());
    order
}
