//! Convenience re-exports for common kore-device types.
//!
//! ```rust
//! use kore_device::prelude::*;
//!
//! let dev: Device = "cuda:0".parse().unwrap();
//! assert_eq!(dev.device_type(), DeviceType::Cuda);
//! ```

pub use crate::Backend;
pub use crate::Device;
pub use crate::DeviceError;
pub use crate::DeviceType;
pub use crate::Result;
