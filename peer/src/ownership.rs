use log::trace;

use tether_shared::{ObjectId, PeerId};

use crate::transport::Network;

/// Who may write an object's replicated fields, as seen from the local peer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerStatus {
    /// The local peer is the single writer
    Local,
    /// Another connected peer is the single writer
    Remote(PeerId),
    /// The session currently reports no valid owner
    Unresolved,
}

impl OwnerStatus {
    pub fn is_local(&self) -> bool {
        matches!(self, OwnerStatus::Local)
    }

    pub fn peer(&self, local: PeerId) -> Option<PeerId> {
        match self {
            OwnerStatus::Local => Some(local),
            OwnerStatus::Remote(peer) => Some(*peer),
            OwnerStatus::Unresolved => None,
        }
    }
}

/// Per-object view of ownership.
///
/// The cached owner is only a record of the last resolution. Every decision
/// re-resolves through the network, which is the single authority.
pub(crate) struct OwnershipAuthority {
    object: ObjectId,
    cached: Option<PeerId>,
}

impl OwnershipAuthority {
    pub(crate) fn new(object: ObjectId) -> Self {
        Self {
            object,
            cached: None,
        }
    }

    pub(crate) fn cached(&self) -> Option<PeerId> {
        self.cached
    }

    /// Re-resolve the owner. An owner that is no longer connected is treated
    /// as no owner at all.
    pub(crate) fn resolve<N: Network>(&mut self, network: &N) -> OwnerStatus {
        let owner = network
            .owner_of(self.object)
            .filter(|peer| network.is_connected(*peer));

        if owner != self.cached {
            trace!(
                "owner of {:?} re-resolved: {:?} -> {:?}",
                self.object,
                self.cached,
                owner
            );
            self.cached = owner;
        }

        match owner {
            Some(peer) if peer == network.local_peer() => OwnerStatus::Local,
            Some(peer) => OwnerStatus::Remote(peer),
            None => OwnerStatus::Unresolved,
        }
    }

    pub(crate) fn is_local<N: Network>(&mut self, network: &N) -> bool {
        self.resolve(network).is_local()
    }

    /// Make the local peer the owner. Returns false, without touching the
    /// network, when it already is.
    pub(crate) fn request<N: Network>(&mut self, network: &mut N) -> bool {
        if self.is_local(network) {
            return false;
        }

        let local = network.local_peer();
        network.set_owner(self.object, local);
        self.cached = Some(local);
        true
    }

    pub(crate) fn transferred(&mut self, new_owner: PeerId) {
        self.cached = Some(new_owner);
    }
}
