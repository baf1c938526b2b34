use thiserror::Error;

/// Errors that can occur while decoding an inbound peer payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// The payload ended early or a field held an impossible value
    #[error("Malformed {message} payload: could not read {field}")]
    Malformed {
        message: &'static str,
        field: &'static str,
    },

    /// A float field decoded to NaN or infinity
    #[error("Snapshot for object {object_id} carries a non-finite {field}")]
    NonFiniteField {
        object_id: u32,
        field: &'static str,
    },
}
