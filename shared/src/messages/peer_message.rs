use naia_serde::{BitReader, BitWriter, Serde};

use crate::{
    messages::{error::WireError, snapshot::Snapshot},
    placement::Placement,
    types::{ObjectId, PeerId},
    version::Version,
};

/// Everything one peer sends to the others.
///
/// Layout: a single tag bit (`false` = snapshot, `true` = reset) followed by
/// the author and object ids, then the snapshot fields if any.
#[derive(Clone, Debug, PartialEq)]
pub enum PeerMessage {
    /// Owner-scoped state of one object
    Snapshot {
        author: PeerId,
        object: ObjectId,
        snapshot: Snapshot,
    },
    /// Broadcast request for every peer to restore the object to its origin
    ResetPosition { author: PeerId, object: ObjectId },
}

impl PeerMessage {
    pub fn object(&self) -> ObjectId {
        match self {
            PeerMessage::Snapshot { object, .. } | PeerMessage::ResetPosition { object, .. } => {
                *object
            }
        }
    }

    pub fn author(&self) -> PeerId {
        match self {
            PeerMessage::Snapshot { author, .. } | PeerMessage::ResetPosition { author, .. } => {
                *author
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PeerMessage::Snapshot { .. } => "Snapshot",
            PeerMessage::ResetPosition { .. } => "ResetPosition",
        }
    }

    pub fn to_bytes(&self) -> Box<[u8]> {
        let mut writer = BitWriter::new();

        match self {
            PeerMessage::Snapshot {
                author,
                object,
                snapshot,
            } => {
                false.ser(&mut writer);
                author.ser(&mut writer);
                object.ser(&mut writer);
                snapshot.ser(&mut writer);
            }
            PeerMessage::ResetPosition { author, object } => {
                true.ser(&mut writer);
                author.ser(&mut writer);
                object.ser(&mut writer);
            }
        }

        writer.to_bytes()
    }

    /// Decode a payload produced by `to_bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let mut reader = BitReader::new(bytes);

        let is_reset: bool = read(&mut reader, "PeerMessage", "tag")?;
        let message = if is_reset { "ResetPosition" } else { "Snapshot" };
        let author: PeerId = read(&mut reader, message, "author")?;
        let object: ObjectId = read(&mut reader, message, "object")?;

        if is_reset {
            return Ok(PeerMessage::ResetPosition { author, object });
        }

        let version: Version = read(&mut reader, message, "version")?;
        let placement: Placement = read(&mut reader, message, "placement")?;
        let kinematic: Option<bool> = read(&mut reader, message, "kinematic")?;

        if !placement.is_finite() {
            return Err(WireError::NonFiniteField {
                object_id: object.0,
                field: "placement",
            });
        }

        Ok(PeerMessage::Snapshot {
            author,
            object,
            snapshot: Snapshot {
                version,
                placement,
                kinematic,
            },
        })
    }

    pub fn bit_length(&self) -> u32 {
        let header = 1 + 32 + 32;
        match self {
            PeerMessage::Snapshot { snapshot, .. } => header + snapshot.bit_length(),
            PeerMessage::ResetPosition { .. } => header,
        }
    }
}

impl std::fmt::Display for PeerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(author: {}, object: {})",
            self.name(),
            self.author().0,
            self.object().0
        )
    }
}

fn read<T: Serde>(
    reader: &mut BitReader,
    message: &'static str,
    field: &'static str,
) -> Result<T, WireError> {
    T::de(reader).map_err(|_| WireError::Malformed { message, field })
}
