//! # Anchor offsets
//!
//! An [`Offset`] is the pose of an object expressed in the local frame of an
//! anchor. It is what gets replicated while an object is attached: every peer
//! observes the anchor on its own copy of the owner's rig and re-applies the
//! offset, so the object follows the anchor without per-frame updates.

use glam::{Quat, Vec3};

use crate::pose::Pose;

/// Position and rotation of an object relative to an anchor frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Offset {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

/// Offset of `object` in the frame of `anchor`.
///
/// `position = anchor.rotation⁻¹ · (object.position − anchor.position)`,
/// `rotation = anchor.rotation⁻¹ · object.rotation`.
pub fn compute_offset(object: &Pose, anchor: &Pose) -> Offset {
    let inverse = anchor.rotation.inverse();
    Offset {
        position: inverse * (object.position - anchor.position),
        rotation: inverse * object.rotation,
    }
}

/// World pose of an object held at `offset` from `anchor`. Inverse of
/// [`compute_offset`] for the same anchor pose.
pub fn apply_offset(anchor: &Pose, offset: &Offset) -> Pose {
    Pose {
        position: anchor.rotation * offset.position + anchor.position,
        rotation: anchor.rotation * offset.rotation,
    }
}
