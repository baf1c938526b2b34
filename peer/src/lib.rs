//! # Tether Peer
//! Drives networked attachables on one peer of a shared session. Each object
//! has a single owner which alone writes its replicated placement; every other
//! peer reconstructs the object's pose from that placement and the owner's rig.

#![deny(trivial_casts, trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tether_shared::{
    apply_offset, compute_offset, AnchorId, AttachMode, AttachableConfig, Hand, ObjectId, Offset,
    PeerId, PeerMessage, PhysicsWorld, PickupInput, Placement, Pose, Quat, Skeleton, Snapshot,
    Vec3, Version, VolumeId, WireError, World,
};

mod attachable;
mod error;
mod events;
mod late_join;
mod ownership;
mod peer;
mod peer_config;
mod replication;
mod reset;
mod scheduler;
mod transport;

pub use attachable::{Attachable, Prediction};
pub use error::AttachError;
pub use events::{AttachmentEvent, DiscardReason, PeerEvents};
pub use ownership::OwnerStatus;
pub use peer::Peer;
pub use peer_config::PeerConfig;
pub use reset::{ExitRelay, VolumeWatch};
pub use transport::Network;
