use glam::{Quat, Vec3};
use log::warn;
use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{offset::Offset, pose::Pose, types::AnchorId};

/// Replicated placement of an attachable object.
///
/// On the wire this is a single `anchorIndex` plus a position/rotation pair
/// whose meaning depends on the index: `-1` carries an absolute world pose,
/// anything else an offset in that anchor's frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Not attached to any anchor. The pose is the last published world pose.
    Idle(Pose),
    /// Locked to `anchor` on the owning peer's rig
    Attached { anchor: AnchorId, offset: Offset },
}

impl Placement {
    pub const IDLE_INDEX: i32 = -1;

    pub fn attached(anchor: AnchorId, offset: Offset) -> Self {
        Placement::Attached { anchor, offset }
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        match self {
            Placement::Idle(_) => None,
            Placement::Attached { anchor, .. } => Some(*anchor),
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, Placement::Attached { .. })
    }

    pub fn anchor_index(&self) -> i32 {
        match self {
            Placement::Idle(_) => Self::IDLE_INDEX,
            Placement::Attached { anchor, .. } => anchor.wire_index(),
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Placement::Idle(pose) => pose.is_finite(),
            Placement::Attached { offset, .. } => offset.is_finite(),
        }
    }

    fn wire_pair(&self) -> (Vec3, Quat) {
        match self {
            Placement::Idle(pose) => (pose.position, pose.rotation),
            Placement::Attached { offset, .. } => (offset.position, offset.rotation),
        }
    }
}

impl Serde for Placement {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let (position, rotation) = self.wire_pair();

        self.anchor_index().ser(writer);
        for value in position.to_array() {
            value.ser(writer);
        }
        for value in rotation.to_array() {
            value.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let anchor_index = i32::de(reader)?;

        let mut position = [0.0f32; 3];
        for value in position.iter_mut() {
            *value = f32::de(reader)?;
        }
        let mut rotation = [0.0f32; 4];
        for value in rotation.iter_mut() {
            *value = f32::de(reader)?;
        }
        let position = Vec3::from_array(position);
        let rotation = Quat::from_array(rotation);

        if anchor_index == Self::IDLE_INDEX {
            return Ok(Placement::Idle(Pose::new(position, rotation)));
        }
        let Some(anchor) = AnchorId::from_wire_index(anchor_index) else {
            warn!("anchor index {} is out of range", anchor_index);
            return Err(SerdeErr);
        };
        Ok(Placement::Attached {
            anchor,
            offset: Offset::new(position, rotation),
        })
    }

    fn bit_length(&self) -> u32 {
        // i32 index + 7 f32 components
        32 + 7 * 32
    }
}
