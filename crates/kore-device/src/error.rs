//! Errors raised while constructing or parsing a [`Device`](crate::Device).

use crate::Backend;

/// Coarse classification of a [`DeviceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A type/index pair or backend that no device can be built from.
    InvalidArgument,
    /// A descriptor string that does not follow `type[:index]`.
    Parse,
}

/// Errors returned by every fallible `Device` constructor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("Device index must be -1 or non-negative, got {0}")]
    NegativeIndex(i32),

    #[error("CPU device index must be -1 or zero, got {0}")]
    CpuIndex(i32),

    #[error("Invalid backend {0} for Device construction")]
    InvalidBackend(Backend),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl DeviceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeviceError::NegativeIndex(_)
            | DeviceError::CpuIndex(_)
            | DeviceError::InvalidBackend(_) => ErrorKind::InvalidArgument,
            DeviceError::Parse(_) => ErrorKind::Parse,
        }
    }

    /// Whether this error came from invariant checking rather than the grammar.
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }
}

/// Grammar violations in a device descriptor string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Device string must not be empty")]
    Empty,

    #[error("Expected one of cpu, cuda device type at start of device string: {0}")]
    UnknownType(String),

    #[error("Missing ':' between device type and index in device string: {0}")]
    MissingSeparator(String),

    #[error("Invalid device index '{index}' in device string: {descriptor}")]
    InvalidIndex { descriptor: String, index: String },

    #[error("Unknown backend '{0}', expected one of CPU, CUDA, SparseCPU, SparseCUDA, Undefined")]
    UnknownBackend(String),
}
