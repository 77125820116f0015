//! Driver seam for MELDAS controllers
//!
//! The vendor automation interface does the actual wire communication
//! with the controller; this crate only defines the synchronous call
//! surface the client programs against, plus an in-memory stand-in for
//! tests and examples.
//!
//! Every call returns a raw [`Status`] code (zero = success, values
//! below the fault range = enumeration data, high-bit codes = faults);
//! classification lives in `meldas_core::fault`.

pub mod sim;

pub use sim::{FailPoint, SimController, SimDriver};

use bytes::Bytes;

/// Raw status code returned by every driver call
pub type Status = u32;

/// Synchronous call surface of the vendor automation driver.
///
/// One driver instance backs exactly one logical connection, identified
/// on the wire by the unit number passed to [`open_unit`]. A connection
/// must only be used from the thread that created it; the client enforces
/// this above the trait.
///
/// [`open_unit`]: Driver::open_unit
pub trait Driver: Send {
    // Connection lifecycle

    /// Select the controller's TCP/IP endpoint
    fn set_tcpip(&mut self, host: &str, port: u16) -> Status;

    /// Open the logical connection for `unit_no` (timeout in 100 ms units)
    fn open_unit(
        &mut self,
        machine_type: i32,
        unit_no: u8,
        timeout: i32,
        host_name: &str,
    ) -> Status;

    /// Close the logical connection
    fn close(&mut self) -> Status;

    /// Dispose driver-side resources. Called after [`close`]; failures
    /// are of no interest to anyone.
    ///
    /// [`close`]: Driver::close
    fn release(&mut self) {}

    // Status queries

    /// Available drive tokens, `DRIVE:\r\n` repeated
    fn drive_information(&mut self) -> (Status, String);

    /// NC software version string
    fn system_version(&mut self, kind: i32, unit: i32) -> (Status, String);

    /// Current machine position of one axis
    fn current_position(&mut self, axis: i32) -> (Status, f64);

    /// Run-status value for a query kind
    fn run_status(&mut self, kind: i32) -> (Status, i32);

    /// Spindle monitor value plus its informational string
    fn spindle_monitor(&mut self, param: i32, spindle_no: i32) -> (Status, i32, String);

    /// Total magazine pot count
    fn magazine_size(&mut self) -> (Status, i32);

    /// Tool number for a magazine/standby selector pair
    fn magazine_ready(&mut self, magazine_no: i32, standby: i32) -> (Status, i32);

    /// Number of tool offset sets
    fn toolset_size(&mut self) -> (Status, i32);

    /// Offset amount and virtual tool-tip number for one offset set
    fn tool_offset(&mut self, offset_type: i32, kind: i32, toolset_no: i32) -> (Status, f64, i32);

    /// Write one offset amount
    fn set_tool_offset(
        &mut self,
        offset_type: i32,
        kind: i32,
        toolset_no: i32,
        offset: f64,
        tip_no: i32,
    ) -> Status;

    /// Program number searched or running
    fn program_number(&mut self, program_type: i32) -> (Status, String);

    /// Active alarm message text
    fn alarm_message(&mut self, lines: i32, alarm_type: i32) -> (Status, String);

    // NC program files

    /// Open an NC file on the controller
    fn open_file(&mut self, path: &str, mode: i32) -> Status;

    /// Read up to `max_len` bytes from the open file
    fn read_file(&mut self, max_len: usize) -> (Status, Bytes);

    /// Write the whole payload to the open file
    fn write_file(&mut self, data: &[u8]) -> Status;

    /// Close the open file handle
    fn close_file(&mut self) -> Status;

    /// Delete a file by path
    fn delete_file(&mut self, path: &str) -> Status;

    // Directory scan

    /// Start a scan; returns the first record, status carries the
    /// remaining record count
    fn find_first(&mut self, path: &str, fields: i32) -> (Status, String);

    /// Next record of the running scan
    fn find_next(&mut self) -> (Status, String);

    /// Rewind the scan cursor
    fn reset_dir(&mut self) -> Status;

    // Devices

    /// Stage device descriptors, data-type codes and values for the next
    /// read or write
    fn set_devices(&mut self, names: &[String], type_codes: &[i32], values: &[i32]) -> Status;

    /// Read the staged devices
    fn read_devices(&mut self) -> (Status, Vec<i32>);

    /// Write the staged values
    fn write_devices(&mut self) -> Status;

    /// Drop all staged device settings
    fn clear_devices(&mut self) -> Status;
}
