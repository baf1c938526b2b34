use tether_shared::{Placement, PeerId, Pose, Snapshot, Version};

/// Owner-side push bookkeeping and receiver-side version gate for one object.
///
/// The version counter is shared between the two roles: a peer continues the
/// sequence from the newest version it sent or applied, so its first snapshot
/// after taking ownership is newer than anything it has seen.
pub(crate) struct ReplicationChannel {
    latest: Option<Version>,
    last_sent: Option<Snapshot>,
    /// Author and version of the last applied snapshot
    applied: Option<(PeerId, Version)>,
}

/// Result of the receiver-side version gate
pub(crate) enum Admission {
    Accept,
    Stale(Version),
}

impl ReplicationChannel {
    pub(crate) fn new() -> Self {
        Self {
            latest: None,
            last_sent: None,
            applied: None,
        }
    }

    pub(crate) fn last_sent(&self) -> Option<&Snapshot> {
        self.last_sent.as_ref()
    }

    pub(crate) fn last_applied(&self) -> Option<(PeerId, Version)> {
        self.applied
    }

    /// Build the next snapshot to push and record it as sent
    pub(crate) fn next_snapshot(&mut self, placement: Placement, kinematic: Option<bool>) -> Snapshot {
        let version = match self.latest {
            Some(latest) => latest.next(),
            None => Version::ZERO,
        };
        self.latest = Some(version);

        let snapshot = Snapshot {
            version,
            placement,
            kinematic,
        };
        self.last_sent = Some(snapshot);
        snapshot
    }

    /// Version gate. A snapshot must be strictly newer than every version
    /// this peer has applied or sent for the object, whoever authored it.
    /// The caller has already checked that the author owns the object.
    pub(crate) fn admit(&mut self, author: PeerId, version: Version) -> Admission {
        if let Some(latest) = self.latest {
            if !version.is_newer_than(latest) {
                return Admission::Stale(latest);
            }
        }

        self.applied = Some((author, version));
        self.latest = Some(version);
        Admission::Accept
    }
}

/// Whether an idle object has moved far enough from its last published pose
/// to be worth a push
pub(crate) fn idle_moved(published: &Pose, current: &Pose, epsilon: f32) -> bool {
    current.distance(published) > epsilon
}
