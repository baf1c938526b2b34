use glam::{Quat, Vec3};

use crate::{
    pose::Pose,
    types::{AnchorId, ObjectId, PeerId},
};

/// Read access to the tracked rigs of every peer, as observed locally
pub trait Skeleton {
    fn anchor_position(&self, peer: PeerId, anchor: AnchorId) -> Vec3;
    fn anchor_rotation(&self, peer: PeerId, anchor: AnchorId) -> Quat;
    /// Whether the peer is using a head-mounted display
    fn is_immersive(&self, peer: PeerId) -> bool;

    fn anchor_pose(&self, peer: PeerId, anchor: AnchorId) -> Pose {
        Pose::new(
            self.anchor_position(peer, anchor),
            self.anchor_rotation(peer, anchor),
        )
    }
}

/// The local rigid-body simulation
pub trait PhysicsWorld {
    fn set_kinematic(&mut self, object: ObjectId, kinematic: bool);
    fn is_kinematic(&self, object: ObjectId) -> bool;
    /// Clears both linear and angular velocity
    fn zero_velocity(&mut self, object: ObjectId);
    fn set_pose(&mut self, object: ObjectId, pose: Pose);
    fn pose(&self, object: ObjectId) -> Pose;
}

/// The local grab/pickup system
pub trait PickupInput {
    /// Release the object from whichever hand holds it locally. Must be a
    /// no-op when nothing holds it.
    fn force_drop(&mut self, object: ObjectId);
    /// Keep the object in hand after the grab gesture ends
    fn set_auto_hold(&mut self, object: ObjectId, auto_hold: bool);
}

/// Everything a peer needs from its local scene
pub trait World: Skeleton + PhysicsWorld + PickupInput {}

impl<T: Skeleton + PhysicsWorld + PickupInput> World for T {}
