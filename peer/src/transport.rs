use tether_shared::{ObjectId, PeerId};

/// The session layer a peer talks through.
///
/// Implementations own delivery. Ownership assignment must be atomic from
/// the point of view of every peer: once `set_owner` returns, `owner_of`
/// answers the new owner everywhere, and every connected peer (the new owner
/// included) is told through `Peer::on_ownership_transferred`.
pub trait Network {
    fn local_peer(&self) -> PeerId;
    /// Authoritative current owner, or None if the session has no valid owner
    /// for the object at the moment
    fn owner_of(&self, object: ObjectId) -> Option<PeerId>;
    fn is_connected(&self, peer: PeerId) -> bool;
    fn set_owner(&mut self, object: ObjectId, peer: PeerId);
    /// Best-effort delivery to every other connected peer. No ordering,
    /// acknowledgement or replay to later joiners.
    fn send(&mut self, payload: Box<[u8]>);
}
