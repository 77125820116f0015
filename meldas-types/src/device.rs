//! Device descriptors
//!
//! Controller devices are addressed by a name whose first letter selects
//! the data width: `M` devices are single bits, `D` devices are 16-bit
//! words. Anything else is a configuration error, rejected before any
//! driver call.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Data width selected by the device name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceWidth {
    /// Single-bit device (`M…`)
    Bit,
    /// 16-bit word device (`D…`)
    Word,
}

impl DeviceWidth {
    /// Data-type code the driver expects (1 = bit, 4 = word)
    pub fn type_code(self) -> i32 {
        match self {
            Self::Bit => 1,
            Self::Word => 4,
        }
    }
}

/// A named controller device, e.g. `M900` or `D200`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAddress {
    name: String,
    width: DeviceWidth,
}

impl DeviceAddress {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> DeviceWidth {
        self.width
    }
}

impl FromStr for DeviceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let width = match s.chars().next() {
            Some('M') => DeviceWidth::Bit,
            Some('D') => DeviceWidth::Word,
            _ => return Err(Error::InvalidDevice(s.to_owned())),
        };
        let number = &s[1..];
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidDevice(s.to_owned()));
        }
        Ok(Self {
            name: s.to_owned(),
            width,
        })
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn m_prefix_is_a_bit_device() {
        let dev: DeviceAddress = "M900".parse().unwrap();
        assert_eq!(dev.name(), "M900");
        assert_eq!(dev.width(), DeviceWidth::Bit);
        assert_eq!(dev.width().type_code(), 1);
    }

    #[test]
    fn d_prefix_is_a_word_device() {
        let dev: DeviceAddress = "D200".parse().unwrap();
        assert_eq!(dev.width(), DeviceWidth::Word);
        assert_eq!(dev.width().type_code(), 4);
    }

    #[test]
    fn rejects_unknown_prefixes_and_junk() {
        assert!("X100".parse::<DeviceAddress>().is_err());
        assert!("m900".parse::<DeviceAddress>().is_err());
        assert!("M".parse::<DeviceAddress>().is_err());
        assert!("D12A".parse::<DeviceAddress>().is_err());
        assert!("".parse::<DeviceAddress>().is_err());
    }
}
