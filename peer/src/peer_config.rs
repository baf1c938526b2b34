use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by a Peer
#[derive(Clone)]
pub struct PeerConfig {
    /// Delay between detecting a reset trigger and broadcasting the reset.
    /// Keeps the same exit from firing again while the reset completes.
    pub reset_delay: Duration,
    /// Delay between a peer joining and the owner re-sending its snapshot
    pub late_join_delay: Duration,
    /// Include the owner's kinematic flag in every snapshot
    pub replicate_physics_mode: bool,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            reset_delay: Duration::from_millis(2500),
            late_join_delay: Duration::from_millis(2500),
            replicate_physics_mode: true,
        }
    }
}
