use thiserror::Error;

/// Error for resource name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceNameError {
    #[error("Name is empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Name contains invalid character {0:?} (only alphanumeric, '.', '_', '-' and '+' allowed)")]
    InvalidCharacter(char),
}

/// Error for rejected resource payloads
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceValidationError {
    #[error("Payload must be a JSON object")]
    NotAnObject,

    #[error("Missing 'meta' section")]
    MissingMeta,

    #[error("Missing 'meta.name'")]
    MissingName,

    #[error("Invalid name: {0}")]
    InvalidName(#[from] ResourceNameError),

    #[error("Name mismatch: expected {expected}, got {actual}")]
    NameMismatch { expected: String, actual: String },

    #[error("Missing 'spec' section")]
    MissingSpec,

    #[error("Missing required attribute '{field}' for {kind}")]
    MissingField { kind: &'static str, field: &'static str },

    #[error("Attribute '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),
}

/// Error for provisioning client operations
#[derive(Debug, Clone, Error)]
pub enum ProvisioningError {
    #[error("Failed to start {command}: {reason}")]
    Spawn { command: String, reason: String },

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{command} reported no copied media: {output}")]
    UnrecognizedOutput { command: String, output: String },
}

/// Top-level error for inventory operations
#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{0}")]
    InvalidResource(#[from] ResourceValidationError),

    #[error("Image not found")]
    NoImagePaths,

    #[error("{0}")]
    Provisioning(#[from] ProvisioningError),

    #[error("Storage error: {0}")]
    Storage(String),
}
