//! serde support: a [`Device`] is stored as its descriptor string.
//!
//! Deserialization goes through the parser, so `"cpu:2"` is rejected the
//! same way `Device::parse` rejects it.

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;

use crate::Device;

impl Serialize for Device {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct DeviceVisitor;

impl<'de> Visitor<'de> for DeviceVisitor {
    type Value = Device;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a device string such as \"cpu\" or \"cuda:1\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Device, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Device {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(DeviceVisitor)
    }
}
