use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Per-object snapshot version. Wraps around at `u16::MAX`; ordering uses
/// the half-range rule so a version stays comparable across the wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Version(pub u16);

impl Version {
    pub const ZERO: Version = Version(0);

    pub fn next(self) -> Self {
        Version(self.0.wrapping_add(1))
    }

    /// Returns whether `self` was issued after `other`
    /// Version(2).is_newer_than(Version(1)) will return true
    /// Version(1).is_newer_than(Version(1)) will return false
    /// Version(0).is_newer_than(Version(65535)) will return true
    pub fn is_newer_than(self, other: Version) -> bool {
        sequence_greater_than(self.0, other.0)
    }

    /// The newer of two versions under wrapping order
    pub fn latest(self, other: Version) -> Version {
        if other.is_newer_than(self) {
            other
        } else {
            self
        }
    }
}

impl Serde for Version {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u16::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}

fn sequence_greater_than(s1: u16, s2: u16) -> bool {
    ((s1 > s2) && (s1 - s2 <= 32768)) || ((s1 < s2) && (s2 - s1 > 32768))
}
