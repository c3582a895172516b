use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Every failure here is local and synchronous; nothing in the kernel
/// performs I/O, so no variant is transient or retryable.
#[derive(Debug, Error)]
pub enum Error {
    /// Construction-time validation failure (negative mass/radius,
    /// out-of-range damping or restitution, non-finite values).
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A component of this type already exists on the entity. Adding a
    /// second instance never overwrites the first.
    #[error("entity already has a {type_name} component")]
    DuplicateComponent { type_name: &'static str },

    /// A structural mutation addressed a dead or stale entity handle.
    #[error("entity is not alive")]
    NoSuchEntity,

    /// Scenario file failed to parse or validate.
    #[error("scenario error: {0}")]
    Scenario(String),

    /// Propagated I/O errors from scenario loading.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let err = Error::InvalidParam("mass must be > 0".to_string());
        let msg = err.to_string();
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("mass"));
    }

    #[test]
    fn duplicate_component_names_the_type() {
        let err = Error::DuplicateComponent {
            type_name: "particle",
        };
        assert!(err.to_string().contains("particle"));
    }
}
