//! # meldas
//!
//! Client for Mitsubishi MELDAS machining-center CNCs (M700/M700V/M70/
//! M70V) through the vendor automation driver.
//!
//! The wire protocol lives entirely inside the driver; this crate owns
//! everything above it: session lifecycle with lazy open and disconnect
//! recovery, unit-number allocation, fault classification, NC file
//! transfer, bit/word device access, and directory listing.
//!
//! ## Quick start
//!
//! ```no_run
//! use meldas::{Address, Driver, Hub};
//! # fn vendor_driver(_addr: &Address) -> Box<dyn Driver> {
//! #     Box::new(meldas_driver::SimController::new().driver())
//! # }
//!
//! fn main() -> meldas::Result<()> {
//!     // one hub per process; the factory builds vendor driver instances
//!     let hub = Hub::new(|addr| vendor_driver(addr));
//!
//!     let session = hub.session("192.168.1.20:683")?;
//!     println!("running: {:?}", session.run_status()?);
//!     println!("spindle: {} rpm", session.spindle_speed()?);
//!
//!     let program = session.read_file("M01:\\PRG\\USER\\100")?;
//!     println!("program is {} bytes", program.len());
//!
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod dir;
pub mod error;
pub mod file;
pub mod hub;
pub mod session;
pub mod status;

pub use error::{Error, Result};
pub use hub::Hub;
pub use session::{DriverFactory, Session};

// Re-exports
pub use meldas_core::{Fault, Outcome, UnitNo, classify};
pub use meldas_driver::Driver;
pub use meldas_types::{
    Address, Axis, DeviceAddress, DeviceWidth, DirEntry, EntryKind, ProgramType, RunStatus,
};
