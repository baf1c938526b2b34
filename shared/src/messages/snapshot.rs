use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{placement::Placement, version::Version};

/// One complete replicated payload for an object at a point in time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub version: Version,
    pub placement: Placement,
    /// Physics mode of the author's rigid body, when it chose to send it
    pub kinematic: Option<bool>,
}

impl Snapshot {
    pub fn new(version: Version, placement: Placement) -> Self {
        Self {
            version,
            placement,
            kinematic: None,
        }
    }

    pub fn with_kinematic(mut self, kinematic: bool) -> Self {
        self.kinematic = Some(kinematic);
        self
    }

    pub fn anchor_index(&self) -> i32 {
        self.placement.anchor_index()
    }
}

impl Serde for Snapshot {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.version.ser(writer);
        self.placement.ser(writer);
        self.kinematic.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            version: Version::de(reader)?,
            placement: Placement::de(reader)?,
            kinematic: Option::<bool>::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.version.bit_length() + self.placement.bit_length() + self.kinematic.bit_length()
    }
}
