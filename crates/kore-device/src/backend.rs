use std::fmt;

use crate::{DeviceError, DeviceType};

/// Execution backend of a tensor: the device type plus its storage layout.
///
/// Several backends share one [`DeviceType`] (dense and sparse CPU tensors
/// both live on the CPU). `Undefined` marks a tensor with no backend and
/// cannot be turned into a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Backend {
    Cpu,
    Cuda,
    SparseCpu,
    SparseCuda,
    Undefined,
}

impl Backend {
    pub const ALL: [Backend; 5] = [
        Backend::Cpu,
        Backend::Cuda,
        Backend::SparseCpu,
        Backend::SparseCuda,
        Backend::Undefined,
    ];

    /// Whether tensors on this backend use a sparse layout.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Backend::SparseCpu | Backend::SparseCuda)
    }

    /// Name used in diagnostics, e.g. `SparseCUDA`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Cpu => "CPU",
            Backend::Cuda => "CUDA",
            Backend::SparseCpu => "SparseCPU",
            Backend::SparseCuda => "SparseCUDA",
            Backend::Undefined => "UndefinedBackend",
        }
    }

    /// Device type this backend runs on, or `None` for `Undefined`.
    pub fn device_type(&self) -> Option<DeviceType> {
        match self {
            Backend::Cpu | Backend::SparseCpu => Some(DeviceType::Cpu),
            Backend::Cuda | Backend::SparseCuda => Some(DeviceType::Cuda),
            Backend::Undefined => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a `Backend` to a `DeviceType` if possible.
pub fn backend_to_type(backend: Backend) -> Result<DeviceType, DeviceError> {
    backend
        .device_type()
        .ok_or(DeviceError::InvalidBackend(backend))
}

impl TryFrom<Backend> for DeviceType {
    type Error = DeviceError;

    fn try_from(backend: Backend) -> Result<Self, Self::Error> {
        backend_to_type(backend)
    }
}

impl DeviceType {
    /// Dense backend for this device type.
    pub fn dense_backend(&self) -> Backend {
        match self {
            DeviceType::Cpu => Backend::Cpu,
            DeviceType::Cuda => Backend::Cuda,
        }
    }

    /// Sparse backend for this device type.
    pub fn sparse_backend(&self) -> Backend {
        match self {
            DeviceType::Cpu => Backend::SparseCpu,
            DeviceType::Cuda => Backend::SparseCuda,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_to_type() {
        assert_eq!(backend_to_type(Backend::Cpu), Ok(DeviceType::Cpu));
        assert_eq!(backend_to_type(Backend::SparseCpu), Ok(DeviceType::Cpu));
        assert_eq!(backend_to_type(Backend::Cuda), Ok(DeviceType::Cuda));
        assert_eq!(backend_to_type(Backend::SparseCuda), Ok(DeviceType::Cuda));
    }

    #[test]
    fn test_undefined_backend_rejected() {
        let err = DeviceType::try_from(Backend::Undefined).unwrap_err();
        assert_eq!(err, DeviceError::InvalidBackend(Backend::Undefined));
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("UndefinedBackend"));
    }

    #[test]
    fn test_inverse_mapping() {
        for ty in [DeviceType::Cpu, DeviceType::Cuda] {
            assert_eq!(ty.dense_backend().device_type(), Some(ty));
            assert_eq!(ty.sparse_backend().device_type(), Some(ty));
            assert!(!ty.dense_backend().is_sparse());
            assert!(ty.sparse_backend().is_sparse());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Backend::Cpu), "CPU");
        assert_eq!(format!("{}", Backend::SparseCuda), "SparseCUDA");
        assert_eq!(format!("{}", Backend::Undefined), "UndefinedBackend");
    }
}
