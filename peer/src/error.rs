use thiserror::Error;

/// Errors that can occur when driving attachables through a Peer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    /// Object is already registered and cannot be registered again
    #[error("Object {object_id} is already registered with this peer")]
    ObjectAlreadyRegistered { object_id: u32 },

    /// Object is not registered when required
    #[error("Object {object_id} is not registered - operation '{operation}' requires registration")]
    ObjectNotRegistered {
        object_id: u32,
        operation: &'static str,
    },
}
