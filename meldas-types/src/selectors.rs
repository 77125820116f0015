//! Closed selector enumerations passed to the controller
//!
//! Each variant's code is the raw value the driver expects. Conversions
//! from untyped input (`TryFrom<i32>`, `FromStr`) reject anything outside
//! the enumeration before a driver call is ever made.

use std::str::FromStr;

use crate::error::Error;

/// Axis selector for position queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Axis {
    X = 1,
    Y = 2,
    Z = 3,
}

impl Axis {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for Axis {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::X),
            2 => Ok(Self::Y),
            3 => Ok(Self::Z),
            other => Err(Error::InvalidAxis(other.to_string())),
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" | "x" => Ok(Self::X),
            "Y" | "y" => Ok(Self::Y),
            "Z" | "z" => Ok(Self::Z),
            other => Err(Error::InvalidAxis(other.to_owned())),
        }
    }
}

/// Automatic-operation state reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum RunStatus {
    NotAutoRun = 0,
    AutoRun = 1,
}

impl RunStatus {
    /// Status code 1 means a program is running automatically; every
    /// other value reads as not running.
    pub fn from_code(code: i32) -> Self {
        if code == Self::AutoRun as i32 {
            Self::AutoRun
        } else {
            Self::NotAutoRun
        }
    }

    pub fn is_running(self) -> bool {
        self == Self::AutoRun
    }
}

/// Main or sub program selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ProgramType {
    Main = 0,
    Sub = 1,
}

impl ProgramType {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ProgramType {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Main),
            1 => Ok(Self::Sub),
            other => Err(Error::InvalidProgramType(other.to_string())),
        }
    }
}

impl FromStr for ProgramType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" | "MAIN" => Ok(Self::Main),
            "sub" | "SUB" => Ok(Self::Sub),
            other => Err(Error::InvalidProgramType(other.to_owned())),
        }
    }
}

/// Open mode for NC program files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum FileOpenMode {
    Read = 1,
    Write = 2,
    Overwrite = 3,
}

impl FileOpenMode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_codes_match_the_controller() {
        assert_eq!(Axis::X.code(), 1);
        assert_eq!(Axis::Y.code(), 2);
        assert_eq!(Axis::Z.code(), 3);
    }

    #[test]
    fn axis_rejects_values_outside_the_enumeration() {
        assert_eq!(Axis::try_from(2).unwrap(), Axis::Y);
        assert!(Axis::try_from(0).is_err());
        assert!(Axis::try_from(4).is_err());
        assert_eq!("z".parse::<Axis>().unwrap(), Axis::Z);
        assert!("A".parse::<Axis>().is_err());
    }

    #[test]
    fn run_status_maps_only_one_to_auto_run() {
        assert_eq!(RunStatus::from_code(1), RunStatus::AutoRun);
        assert!(RunStatus::from_code(1).is_running());
        assert_eq!(RunStatus::from_code(0), RunStatus::NotAutoRun);
        assert_eq!(RunStatus::from_code(7), RunStatus::NotAutoRun);
        assert_eq!(RunStatus::from_code(-1), RunStatus::NotAutoRun);
    }

    #[test]
    fn program_type_rejects_values_outside_the_enumeration() {
        assert_eq!(ProgramType::try_from(1).unwrap(), ProgramType::Sub);
        assert!(ProgramType::try_from(2).is_err());
        assert!("spindle".parse::<ProgramType>().is_err());
    }

    #[test]
    fn file_open_modes_match_the_controller() {
        assert_eq!(FileOpenMode::Read.code(), 1);
        assert_eq!(FileOpenMode::Write.code(), 2);
        assert_eq!(FileOpenMode::Overwrite.code(), 3);
    }
}
