//! # kore-device
//!
//! Device identity for the Kore ML framework.
//!
//! A [`Device`] names where a tensor lives: a [`DeviceType`] (CPU or CUDA)
//! plus an optional index. Devices can be built from:
//! - a type and index ([`Device::new`]), validated on construction
//! - a [`Backend`], mapped onto its device type ([`Device::from_backend`])
//! - a descriptor string such as `"cuda:1"` ([`Device::parse`], `FromStr`)
//!
//! Enable the `serde` feature to store devices as descriptor strings.

pub mod backend;
pub mod device;
pub mod error;
pub mod parse;
pub mod prelude;
#[cfg(feature = "serde")]
pub mod serialize;

pub use backend::{backend_to_type, Backend};
pub use device::{Device, DeviceType, UNSPECIFIED_INDEX};
pub use error::{DeviceError, ErrorKind, ParseError};

pub type Result<T> = std::result::Result<T, DeviceError>;
