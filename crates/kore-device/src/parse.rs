//! Device descriptor strings.
//!
//! ```text
//! descriptor := type [ ":" [ index ] ]
//! type       := "cpu" | "cuda"
//! index      := [0-9]+
//! ```
//!
//! The type is case-sensitive and nothing is trimmed. An empty or missing
//! index leaves the device unspecified, so `cpu`, `cpu:` and `Device::cpu()`
//! are the same device. A parsed index is still subject to the constructor
//! invariants: `cpu:2` is an invalid argument, not a parse error.

use std::str::FromStr;

use crate::{Backend, Device, DeviceError, DeviceType, ParseError, UNSPECIFIED_INDEX};

impl FromStr for DeviceType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(DeviceType::Cpu),
            "cuda" => Ok(DeviceType::Cuda),
            _ => Err(ParseError::UnknownType(s.to_string())),
        }
    }
}

impl FromStr for Backend {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Backend::Cpu),
            "cuda" => Ok(Backend::Cuda),
            "sparsecpu" => Ok(Backend::SparseCpu),
            "sparsecuda" => Ok(Backend::SparseCuda),
            "undefined" | "undefinedbackend" => Ok(Backend::Undefined),
            _ => Err(ParseError::UnknownBackend(s.to_string())),
        }
    }
}

impl FromStr for Device {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (device_type, index) = split_descriptor(s)?;
        let device = Device::new(device_type, index)?;
        tracing::trace!("parsed device string {:?} as {}", s, device);
        Ok(device)
    }
}

fn split_descriptor(descriptor: &str) -> Result<(DeviceType, i32), ParseError> {
    if descriptor.is_empty() {
        return Err(ParseError::Empty);
    }

    let (type_token, index_token) = match descriptor.split_once(':') {
        Some((ty, idx)) => (ty, Some(idx)),
        None => (descriptor, None),
    };

    let device_type = type_token.parse::<DeviceType>().map_err(|_| {
        if index_token.is_none() && starts_with_type_and_digits(type_token) {
            ParseError::MissingSeparator(descriptor.to_string())
        } else {
            ParseError::UnknownType(descriptor.to_string())
        }
    })?;

    let index = match index_token {
        None | Some("") => UNSPECIFIED_INDEX,
        Some(token) => parse_index(token).ok_or_else(|| ParseError::InvalidIndex {
            descriptor: descriptor.to_string(),
            index: token.to_string(),
        })?,
    };

    Ok((device_type, index))
}

/// Base-10 index without sign; `None` on anything else or on `i32` overflow.
fn parse_index(token: &str) -> Option<i32> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

// "cuda0", "cpu1"
fn starts_with_type_and_digits(token: &str) -> bool {
    [DeviceType::Cpu, DeviceType::Cuda].iter().any(|ty| {
        token
            .strip_prefix(ty.as_str())
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(s: &str) -> ParseError {
        match s.parse::<Device>() {
            Err(DeviceError::Parse(err)) => err,
            other => panic!("expected parse error for {:?}, got {:?}", s, other),
        }
    }

    #[test]
    fn test_parse_type_only() {
        assert_eq!("cpu".parse::<Device>().unwrap(), Device::cpu());
        assert_eq!("cuda".parse::<Device>().unwrap().index(), UNSPECIFIED_INDEX);
    }

    #[test]
    fn test_parse_trailing_colon() {
        assert_eq!("cpu:".parse::<Device>().unwrap(), Device::cpu());
        assert_eq!(
            "cuda:".parse::<Device>().unwrap(),
            Device::from_type(DeviceType::Cuda)
        );
    }

    #[test]
    fn test_parse_with_index() {
        let dev: Device = "cuda:3".parse().unwrap();
        assert_eq!(dev.device_type(), DeviceType::Cuda);
        assert_eq!(dev.index(), 3);
        assert_eq!("cpu:0".parse::<Device>().unwrap().index(), 0);
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(parse_err("gpu:0"), ParseError::UnknownType("gpu:0".into()));
        assert_eq!(parse_err("CUDA:0"), ParseError::UnknownType("CUDA:0".into()));
        assert_eq!(parse_err(" cpu"), ParseError::UnknownType(" cpu".into()));
        assert_eq!(parse_err(":1"), ParseError::UnknownType(":1".into()));
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(parse_err("cuda0"), ParseError::MissingSeparator("cuda0".into()));
        assert_eq!(parse_err("cpu1"), ParseError::MissingSeparator("cpu1".into()));
    }

    #[test]
    fn test_invalid_index() {
        for s in ["cuda:-1", "cuda:+1", "cuda:x", "cuda:1:2", "cuda: 1", "cuda:99999999999"] {
            assert!(
                matches!(parse_err(s), ParseError::InvalidIndex { .. }),
                "{} should be an invalid index",
                s
            );
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_err(""), ParseError::Empty);
    }

    #[test]
    fn test_cpu_index_is_invalid_argument() {
        let err = "cpu:2".parse::<Device>().unwrap_err();
        assert_eq!(err, DeviceError::CpuIndex(2));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("SparseCUDA".parse::<Backend>().unwrap(), Backend::SparseCuda);
        assert_eq!("cpu".parse::<Backend>().unwrap(), Backend::Cpu);
        assert_eq!("UndefinedBackend".parse::<Backend>().unwrap(), Backend::Undefined);
        assert!("metal".parse::<Backend>().is_err());
    }

    #[test]
    fn test_device_type_from_str() {
        assert_eq!("cuda".parse::<DeviceType>().unwrap(), DeviceType::Cuda);
        assert!("Cpu".parse::<DeviceType>().is_err());
    }
}
