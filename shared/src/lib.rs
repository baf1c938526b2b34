//! # Tether Shared
//! Common functionality used by every tether peer: identifiers, poses,
//! anchor offsets, the replicated placement of an object and its wire format.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use glam::{Quat, Vec3};
pub use naia_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

mod attachable_config;
mod messages;
mod offset;
mod placement;
mod pose;
mod time_queue;
mod types;
mod version;
mod world_type;

pub use attachable_config::{AttachMode, AttachableConfig};
pub use messages::{error::WireError, peer_message::PeerMessage, snapshot::Snapshot};
pub use offset::{apply_offset, compute_offset, Offset};
pub use placement::Placement;
pub use pose::Pose;
pub use time_queue::TimeQueue;
pub use types::{AnchorId, Hand, ObjectId, PeerId, VolumeId};
pub use version::Version;
pub use world_type::{PhysicsWorld, PickupInput, Skeleton, World};
