//! Discrete slot allocation: seating buttons into board slots.
//!
//! Boards start every iteration with all slots free. The two-slot
//! board fills deterministically once only one slot remains; the
//! three-slot board draws random slot indices under a generous cap
//! and gives up if the draw never lands on a free slot. Giving up is
//! an expected outcome, the caller falls back to surface placement.

use tracing::trace;

use crate::geom::Quat;
use crate::prng::Pcg32;
use crate::tables;
use crate::types::{Category, RigidPose};

/// Bound on random slot draws for the three-slot board.
const SLOT_DRAW_CAP: usize = 100;

/// Fixed yaw so a seated button faces outward from the board.
const SLOT_YAW_DEG: f64 = -90.0;

/// Free-slot masks for both board categories, rebuilt every
/// iteration. `true` means free.
#[derive(Debug, Clone)]
pub struct BoardStates {
    two_slot: [bool; 2],
    three_slot: [bool; 3],
}

impl BoardStates {
    pub fn new() -> Self {
        Self {
            two_slot: [true; 2],
            three_slot: [true; 3],
        }
    }

    pub fn slots(&self, board: Category) -> Option<&[bool]> {
        match board {
            Category::TwoSlotBoard => Some(&self.two_slot),
            Category::ThreeSlotBoard => Some(&self.three_slot),
            _ => None,
        }
    }

    fn slots_mut(&mut self, board: Category) -> Option<&mut [bool]> {
        match board {
            Category::TwoSlotBoard => Some(&mut self.two_slot),
            Category::ThreeSlotBoard => Some(&mut self.three_slot),
            _ => None,
        }
    }
}

impl Default for BoardStates {
    fn default() -> Self {
        Self::new()
    }
}

fn pick_two_slot(state: &[bool], rng: &mut Pcg32) -> Option<usize> {
    match (state[0], state[1]) {
        (false, false) => None,
        (true, false) => Some(0),
        (false, true) => Some(1),
        (true, true) => Some(rng.next_below(2) as usize),
    }
}

fn pick_three_slot(state: &[bool], rng: &mut Pcg32) -> Option<usize> {
    if state.iter().all(|&free| !free) {
        return None;
    }
    for _ in 0..SLOT_DRAW_CAP {
        let slot = rng.next_below(3) as usize;
        if state[slot] {
            return Some(slot);
        }
    }
    // A pathological stream exhausted the cap with free slots left.
    None
}

/// Try to seat `button` into a slot of the board with pose
/// `board_pose`. Returns the chosen slot and the button's new world
/// pose, or `None` when the target is not a board, the board is full,
/// or the bounded draw gives up.
pub fn try_insert(
    button: Category,
    board: Category,
    board_pose: RigidPose,
    states: &mut BoardStates,
    rng: &mut Pcg32,
) -> Option<(usize, RigidPose)> {
    let offsets = tables::slot_offsets(button, board)?;
    let state = states.slots_mut(board)?;

    let slot = match board {
        Category::TwoSlotBoard => pick_two_slot(state, rng),
        Category::ThreeSlotBoard => pick_three_slot(state, rng),
        _ => None,
    }?;

    state[slot] = false;
    trace!(%button, %board, slot, "slot claimed");

    let pose = RigidPose {
        position: board_pose.position + board_pose.rotation.rotate(offsets[slot]),
        rotation: board_pose.rotation * Quat::from_euler_deg(0.0, SLOT_YAW_DEG, 0.0),
    };
    Some((slot, pose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vec3;

    fn board_pose() -> RigidPose {
        RigidPose::default()
    }

    #[test]
    fn non_board_target_fails() {
        let mut states = BoardStates::new();
        let mut rng = Pcg32::new(1, 0);
        let result = try_insert(
            Category::RedButton,
            Category::MushroomButton,
            board_pose(),
            &mut states,
            &mut rng,
        );
        assert!(result.is_none());
    }

    #[test]
    fn two_slot_fills_then_rejects() {
        let mut states = BoardStates::new();
        let mut rng = Pcg32::new(1, 0);

        let (first, _) = try_insert(
            Category::RedButton,
            Category::TwoSlotBoard,
            board_pose(),
            &mut states,
            &mut rng,
        )
        .expect("first insert");
        assert!(first < 2);

        // Second insert must take the remaining slot without a draw.
        let (second, _) = try_insert(
            Category::ArrowButton,
            Category::TwoSlotBoard,
            board_pose(),
            &mut states,
            &mut rng,
        )
        .expect("second insert");
        assert_eq!(second, 1 - first);

        let third = try_insert(
            Category::MushroomButton,
            Category::TwoSlotBoard,
            board_pose(),
            &mut states,
            &mut rng,
        );
        assert!(third.is_none());
    }

    #[test]
    fn two_slot_single_free_is_deterministic() {
        // A half-full two-slot board takes the remaining slot without
        // consuming any randomness.
        for seed in 0..20 {
            let mut states = BoardStates::new();
            let mut rng = Pcg32::new(seed, 0);
            let mut untouched = Pcg32::new(seed, 0);

            states.slots_mut(Category::TwoSlotBoard).expect("board")[0] = false;
            let (slot, _) = try_insert(
                Category::RedButton,
                Category::TwoSlotBoard,
                board_pose(),
                &mut states,
                &mut rng,
            )
            .expect("insert");
            assert_eq!(slot, 1);
            assert_eq!(rng.next_u32(), untouched.next_u32());
        }
    }

    #[test]
    fn three_slot_seats_all_three() {
        let mut states = BoardStates::new();
        let mut rng = Pcg32::new(77, 0);
        let mut seen = [false; 3];
        for _ in 0..3 {
            let (slot, _) = try_insert(
                Category::MushroomButton,
                Category::ThreeSlotBoard,
                board_pose(),
                &mut states,
                &mut rng,
            )
            .expect("insert");
            assert!(!seen[slot], "slot {slot} assigned twice");
            seen[slot] = true;
        }
        assert_eq!(seen, [true; 3]);

        let fourth = try_insert(
            Category::MushroomButton,
            Category::ThreeSlotBoard,
            board_pose(),
            &mut states,
            &mut rng,
        );
        assert!(fourth.is_none());
    }

    #[test]
    fn seated_pose_uses_slot_offset_and_outward_yaw() {
        let mut states = BoardStates::new();
        let mut rng = Pcg32::new(5, 0);

        // Occupy slot 0 so the pick is forced and the offset known.
        states.slots_mut(Category::TwoSlotBoard).expect("board")[0] = false;
        let (slot, pose) = try_insert(
            Category::RedButton,
            Category::TwoSlotBoard,
            board_pose(),
            &mut states,
            &mut rng,
        )
        .expect("insert");
        assert_eq!(slot, 1);
        // Identity board pose: position is the raw local offset.
        assert_eq!(pose.position, Vec3::new(0.0, -1.506, 0.0251));

        // The yaw turns the button's local X toward world Z.
        let face = pose.rotation.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert!((face.z - 1.0).abs() < 1e-9);
        assert!(face.x.abs() < 1e-9 && face.y.abs() < 1e-9);
    }

    #[test]
    fn rotated_board_carries_offset_into_world() {
        let mut states = BoardStates::new();
        let mut rng = Pcg32::new(5, 0);
        let board = RigidPose {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::from_euler_deg(0.0, 0.0, 180.0),
        };

        states.slots_mut(Category::TwoSlotBoard).expect("board")[1] = false;
        let (_, pose) = try_insert(
            Category::RedButton,
            Category::TwoSlotBoard,
            board,
            &mut states,
            &mut rng,
        )
        .expect("insert");
        // Slot 0 offset (0, 1.506, 0.0251) rotated 180 about Z flips
        // x and y.
        assert!((pose.position.x - 10.0).abs() < 1e-9);
        assert!((pose.position.y + 1.506).abs() < 1e-9);
        assert!((pose.position.z - 0.0251).abs() < 1e-9);
    }
}
