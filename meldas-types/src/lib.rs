//! Type definitions for meldas

pub mod address;
pub mod device;
pub mod dir;
pub mod error;
pub mod selectors;

pub use address::Address;
pub use device::{DeviceAddress, DeviceWidth};
pub use dir::{DirEntry, EntryKind};
pub use error::{Error, Result};
pub use selectors::{Axis, FileOpenMode, ProgramType, RunStatus};
