//! # meldas-core
//!
//! Session-management primitives for MELDAS controllers:
//! - Unit-number pool (the scarce per-process identifiers the driver
//!   needs to tell concurrent logical connections apart)
//! - Fault classifier (raw status codes → semantic outcomes)
//! - Protocol selector constants

pub mod constants;
pub mod error;
pub mod fault;
pub mod unit;

pub use error::{Error, Result};
pub use fault::{Fault, Outcome, classify};
pub use unit::{UnitNo, UnitPool};
