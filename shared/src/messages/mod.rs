pub mod error;
pub mod peer_message;
pub mod snapshot;
