//! Data types for the placement engine.
//!
//! Configuration derives Serialize + Deserialize so a run can be
//! described by a single JSON document, with serde defaults for every
//! knob that has a sensible one.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::geom::{Quat, Vec3};

// -- Object catalog ------------------------------------------------

/// Fixed catalog of placeable object types.
///
/// The category decides processing order, which resting corrections
/// apply, the slot geometry, and whether the marked face is checked
/// for occlusion. Serde names match the vocabulary used by the
/// reference-pose resource and the occlusion log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "3-slot")]
    ThreeSlotBoard,
    #[serde(rename = "2-slot")]
    TwoSlotBoard,
    #[serde(rename = "mushroombutton")]
    MushroomButton,
    #[serde(rename = "arrowbutton")]
    ArrowButton,
    #[serde(rename = "redbutton")]
    RedButton,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::ThreeSlotBoard,
        Category::TwoSlotBoard,
        Category::MushroomButton,
        Category::ArrowButton,
        Category::RedButton,
    ];

    /// Processing priority: boards before buttons, buttons in a fixed
    /// order. Lower places first.
    pub fn priority(self) -> u8 {
        match self {
            Category::ThreeSlotBoard => 0,
            Category::TwoSlotBoard => 1,
            Category::MushroomButton => 2,
            Category::ArrowButton => 3,
            Category::RedButton => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::ThreeSlotBoard => "3-slot",
            Category::TwoSlotBoard => "2-slot",
            Category::MushroomButton => "mushroombutton",
            Category::ArrowButton => "arrowbutton",
            Category::RedButton => "redbutton",
        }
    }

    pub fn is_board(self) -> bool {
        matches!(self, Category::ThreeSlotBoard | Category::TwoSlotBoard)
    }

    /// Number of button slots; zero for buttons themselves.
    pub fn slot_count(self) -> usize {
        match self {
            Category::ThreeSlotBoard => 3,
            Category::TwoSlotBoard => 2,
            _ => 0,
        }
    }

    /// Buttons whose face pattern makes a spin about the local X axis
    /// visually distinct, worth randomizing for dataset variety.
    pub fn has_axial_variation(self) -> bool {
        matches!(self, Category::MushroomButton | Category::ArrowButton)
    }

    /// Distance from object center to the center of the marked face,
    /// for buttons whose face visibility matters downstream.
    pub fn face_distance(self) -> Option<f64> {
        match self {
            Category::ArrowButton | Category::RedButton => Some(0.014),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Poses ---------------------------------------------------------

/// World-space placement of an object or reference surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidPose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// A live placeable instance. The caller owns the collection; the
/// engine mutates poses through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: String,
    pub category: Category,
    #[serde(default)]
    pub pose: RigidPose,
}

impl SceneObject {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
            pose: RigidPose::default(),
        }
    }
}

// -- Engine configuration ------------------------------------------

fn default_rotation_range() -> [f64; 2] {
    [0.0, 360.0]
}

fn default_translation_range() -> [f64; 2] {
    [-1.0, 1.0]
}

fn default_reference_pose_path() -> PathBuf {
    PathBuf::from("poses_azure.json")
}

fn default_occlusion_log_path() -> PathBuf {
    PathBuf::from("occlusions.txt")
}

/// Per-run configuration. Immutable once the engine is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementParams {
    pub seed: u64,
    /// Number of background images available to the run.
    pub background_count: u32,
    /// Total iterations the run will execute; with `background_count`
    /// this maps an iteration index to its background index.
    pub total_iterations: u32,
    /// Per-axis random rotation range in degrees.
    #[serde(default = "default_rotation_range")]
    pub rotation_range_deg: [f64; 2],
    /// Per-axis random translation range in meters, relative to the
    /// reference surface.
    #[serde(default = "default_translation_range")]
    pub translation_range: [f64; 2],
    /// Angular allowance in degrees for the face-occlusion test.
    #[serde(default)]
    pub occlusion_tolerance_deg: f64,
    #[serde(default = "default_reference_pose_path")]
    pub reference_pose_path: PathBuf,
    #[serde(default = "default_occlusion_log_path")]
    pub occlusion_log_path: PathBuf,
}

// -- Per-iteration output ------------------------------------------

/// A button that was seated into a board slot this iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedPlacement {
    pub button: String,
    pub board: String,
    pub slot: usize,
}

/// Summary of one placement iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationReport {
    pub iteration: u32,
    pub background_index: u32,
    /// Ids of successfully placed objects, in placement order.
    pub placed: Vec<String>,
    /// Ids of objects parked off-scene after exhausting every attempt.
    pub hidden: Vec<String>,
    /// Buttons seated into board slots (subset of `placed`).
    pub nested: Vec<NestedPlacement>,
    /// Category of the one button accepted with an occluded face, if
    /// any.
    pub occluded: Option<Category>,
}

// -- Tests ---------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_round_trip() {
        let json = r#"{
            "seed": 42,
            "background_count": 5,
            "total_iterations": 100
        }"#;

        let params: PlacementParams = serde_json::from_str(json).expect("deserialize");
        assert_eq!(params.seed, 42);
        assert_eq!(params.rotation_range_deg, [0.0, 360.0]);
        assert_eq!(params.translation_range, [-1.0, 1.0]);
        assert_eq!(params.occlusion_tolerance_deg, 0.0);
        assert_eq!(params.reference_pose_path, PathBuf::from("poses_azure.json"));

        let out = serde_json::to_string(&params).expect("serialize");
        let _: PlacementParams = serde_json::from_str(&out).expect("re-deserialize");
    }

    #[test]
    fn category_wire_names() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).expect("serialize");
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let back: Category = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, category);
        }
    }

    #[test]
    fn boards_precede_buttons() {
        for category in Category::ALL {
            if category.is_board() {
                assert!(category.priority() < Category::MushroomButton.priority());
            }
        }
        assert!(Category::MushroomButton.priority() < Category::ArrowButton.priority());
        assert!(Category::ArrowButton.priority() < Category::RedButton.priority());
    }

    #[test]
    fn slot_counts() {
        assert_eq!(Category::ThreeSlotBoard.slot_count(), 3);
        assert_eq!(Category::TwoSlotBoard.slot_count(), 2);
        assert_eq!(Category::RedButton.slot_count(), 0);
    }

    #[test]
    fn face_distance_only_for_sensitive_buttons() {
        assert!(Category::ArrowButton.face_distance().is_some());
        assert!(Category::RedButton.face_distance().is_some());
        assert!(Category::MushroomButton.face_distance().is_none());
        assert!(Category::TwoSlotBoard.face_distance().is_none());
    }

    #[test]
    fn scene_object_defaults_to_identity_pose() {
        let obj = SceneObject::new("red", Category::RedButton);
        assert_eq!(obj.pose, RigidPose::default());
        assert_eq!(obj.pose.rotation.w, 1.0);
    }
}
