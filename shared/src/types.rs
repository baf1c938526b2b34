use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Identifies one participant of the shared session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u32);

/// Identifies one attachable object. Every peer uses the same id for the
/// same object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Identifies a trigger volume in the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VolumeId(pub u32);

/// A named point on a tracked skeletal rig. Values follow the humanoid bone
/// numbering used by common avatar rigs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnchorId(pub u16);

impl AnchorId {
    pub const HIPS: AnchorId = AnchorId(0);
    pub const CHEST: AnchorId = AnchorId(8);
    pub const HEAD: AnchorId = AnchorId(10);
    pub const LEFT_HAND: AnchorId = AnchorId(17);
    pub const RIGHT_HAND: AnchorId = AnchorId(18);

    /// Value carried in the replicated `anchorIndex` field
    pub fn wire_index(&self) -> i32 {
        i32::from(self.0)
    }

    /// Inverse of `wire_index`. Returns None for `-1` (the idle marker) and
    /// for anything that is not a valid anchor id.
    pub fn from_wire_index(index: i32) -> Option<Self> {
        u16::try_from(index).ok().map(AnchorId)
    }
}

/// The hand a pickup gesture was performed with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn anchor(self) -> AnchorId {
        match self {
            Hand::Left => AnchorId::LEFT_HAND,
            Hand::Right => AnchorId::RIGHT_HAND,
        }
    }
}

impl Serde for PeerId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u32::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}

impl Serde for ObjectId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u32::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}
