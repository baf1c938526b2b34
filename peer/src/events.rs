use std::vec::IntoIter;

use tether_shared::{AnchorId, Hand, ObjectId, PeerId, Version};

/// Why an inbound snapshot was not applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// The local peer owns the object and is its source of truth
    LocalOwner,
    /// The author is not the current owner
    NotOwner { owner: Option<PeerId> },
    /// Not newer than the newest version this peer has seen for the object
    Stale { applied: Version },
}

/// Outcomes of the attachment state machine, observed on one peer
#[derive(Clone, Debug, PartialEq)]
pub enum AttachmentEvent {
    PickedUp {
        object: ObjectId,
        hand: Hand,
    },
    Attached {
        object: ObjectId,
        anchor: AnchorId,
    },
    /// The attach test failed; the object stays held or goes idle
    AttachRejected {
        object: ObjectId,
        distance: f32,
    },
    /// Dropped without attaching
    Released {
        object: ObjectId,
    },
    /// Another peer took the object over while it was held or attached here
    OwnershipLost {
        object: ObjectId,
        new_owner: Option<PeerId>,
    },
    Reset {
        object: ObjectId,
    },
    SnapshotApplied {
        object: ObjectId,
        version: Version,
    },
    SnapshotDiscarded {
        object: ObjectId,
        version: Version,
        reason: DiscardReason,
    },
}

impl AttachmentEvent {
    pub fn object(&self) -> ObjectId {
        match self {
            AttachmentEvent::PickedUp { object, .. }
            | AttachmentEvent::Attached { object, .. }
            | AttachmentEvent::AttachRejected { object, .. }
            | AttachmentEvent::Released { object }
            | AttachmentEvent::OwnershipLost { object, .. }
            | AttachmentEvent::Reset { object }
            | AttachmentEvent::SnapshotApplied { object, .. }
            | AttachmentEvent::SnapshotDiscarded { object, .. } => *object,
        }
    }
}

pub struct PeerEvents {
    events: Vec<AttachmentEvent>,
}

impl Default for PeerEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerEvents {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttachmentEvent> {
        self.events.iter()
    }

    pub fn has<F: Fn(&AttachmentEvent) -> bool>(&self, predicate: F) -> bool {
        self.events.iter().any(predicate)
    }

    pub(crate) fn push(&mut self, event: AttachmentEvent) {
        self.events.push(event);
    }

    pub(crate) fn take(&mut self) -> Self {
        Self {
            events: std::mem::take(&mut self.events),
        }
    }
}

impl IntoIterator for PeerEvents {
    type Item = AttachmentEvent;
    type IntoIter = IntoIter<AttachmentEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
