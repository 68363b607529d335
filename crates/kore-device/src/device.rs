use std::fmt;

use crate::{backend_to_type, Backend, DeviceError, Result};

/// Index value meaning "unspecified", i.e. the current device of its type.
pub const UNSPECIFIED_INDEX: i32 = -1;

/// Kind of machine a tensor lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DeviceType {
    /// Host CPU. Has at most one device, so the index is -1 or 0.
    Cpu,
    /// CUDA GPU (the accelerator type).
    Cuda,
}

impl DeviceType {
    /// Lower-case tag used in device strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Cpu => "cpu",
            DeviceType::Cuda => "cuda",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute device on which a tensor is located.
///
/// A device is a type plus an optional index. In its defaulted state
/// ([`UNSPECIFIED_INDEX`]) the index stands for "the current device" of that
/// type. When an index is stored explicitly:
/// 1. a negative index other than -1 is rejected, a non-negative index names a
///    concrete device;
/// 2. a CPU device may only carry index 0.
///
/// Equality compares type and index exactly: `cpu` and `cpu:0` are different
/// devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Device {
    device_type: DeviceType,
    index: i32,
}

impl Device {
    /// Build a device from a type and index, checking both invariants.
    pub fn new(device_type: DeviceType, index: i32) -> Result<Self> {
        check_index(device_type, index)?;
        Ok(Self { device_type, index })
    }

    /// Device of the given type with an unspecified index.
    pub fn from_type(device_type: DeviceType) -> Self {
        Self {
            device_type,
            index: UNSPECIFIED_INDEX,
        }
    }

    /// Build a device from a backend, which must map to a device type.
    pub fn from_backend(backend: Backend, index: i32) -> Result<Self> {
        Self::new(backend_to_type(backend)?, index)
    }

    /// Parse a `type[:index]` descriptor such as `cpu` or `cuda:1`.
    pub fn parse(descriptor: &str) -> Result<Self> {
        descriptor.parse()
    }

    pub fn cpu() -> Self {
        Self::from_type(DeviceType::Cpu)
    }

    /// CUDA device with the given index (-1 for the current one).
    pub fn cuda(index: i32) -> Result<Self> {
        Self::new(DeviceType::Cuda, index)
    }

    /// Sets the device index.
    ///
    /// Unlike the constructors this does not re-check the invariants; a CPU
    /// device given index 3 keeps it. Use [`Device::try_set_index`] when the
    /// value comes from outside.
    pub fn set_index(&mut self, index: i32) {
        if let Err(err) = check_index(self.device_type, index) {
            tracing::warn!(device = %self, index, "set_index stores invalid index: {}", err);
        }
        self.index = index;
    }

    /// Sets the device index, leaving the device untouched if the new value
    /// would break an invariant.
    pub fn try_set_index(&mut self, index: i32) -> Result<()> {
        check_index(self.device_type, index)?;
        self.index = index;
        Ok(())
    }

    /// Copy of this device with another index, validated like [`Device::new`].
    pub fn with_index(&self, index: i32) -> Result<Self> {
        Self::new(self.device_type, index)
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Returns the stored index, [`UNSPECIFIED_INDEX`] if none.
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Whether the device has a non-default index.
    pub fn has_index(&self) -> bool {
        self.index != UNSPECIFIED_INDEX
    }

    /// Concrete ordinal, if the index is set and non-negative.
    pub fn ordinal(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }

    pub fn is_cpu(&self) -> bool {
        self.device_type == DeviceType::Cpu
    }

    pub fn is_cuda(&self) -> bool {
        self.device_type == DeviceType::Cuda
    }

    /// Whether this device is an accelerator. CUDA is the only one.
    pub fn is_accelerator(&self) -> bool {
        self.is_cuda()
    }

    /// Re-check both invariants, e.g. after [`Device::set_index`].
    pub fn is_valid(&self) -> bool {
        check_index(self.device_type, self.index).is_ok()
    }
}

fn check_index(device_type: DeviceType, index: i32) -> Result<()> {
    if index < UNSPECIFIED_INDEX {
        return Err(DeviceError::NegativeIndex(index));
    }
    if device_type == DeviceType::Cpu && index > 0 {
        return Err(DeviceError::CpuIndex(index));
    }
    Ok(())
}

impl From<DeviceType> for Device {
    fn from(device_type: DeviceType) -> Self {
        Self::from_type(device_type)
    }
}

impl TryFrom<Backend> for Device {
    type Error = DeviceError;

    fn try_from(backend: Backend) -> Result<Self> {
        Self::from_backend(backend, UNSPECIFIED_INDEX)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_index() {
            write!(f, "{}:{}", self.device_type, self.index)
        } else {
            write!(f, "{}", self.device_type)
        }
    }
}
