//! Fault classification
//!
//! Every driver call returns a 32-bit status code. Zero is plain
//! success, codes below the fault range carry enumeration data (the
//! directory scan reports records this way), and codes with the high bit
//! set are faults looked up in the table below. Unknown nonzero codes in
//! the fault range are still faults, just without a registered message.

use std::fmt;

/// Codes at or above this value are faults
const FAULT_BASE: u32 = 0x8000_0000;

/// "communication line not open": the connection is gone
pub const LINE_NOT_OPEN: u32 = 0x80A0_0101;

/// "not connected": the socket layer lost the controller
pub const NOT_CONNECTED: u32 = 0x8202_000A;

/// True when `code` means the underlying connection is no longer usable
/// and the session holding it must be torn down.
pub fn disconnects(code: u32) -> bool {
    matches!(code, LINE_NOT_OPEN | NOT_CONNECTED)
}

/// Classified driver status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Plain success (code 0)
    Success,
    /// Success carrying enumeration data, e.g. a record count
    Data(u32),
    /// A fault from the code table
    Fault(Fault),
}

impl Outcome {
    /// The fault, if this outcome is one
    pub fn fault(self) -> Option<Fault> {
        match self {
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

/// A classified driver fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub code: u32,
    pub message: &'static str,
}

impl Fault {
    /// Whether this fault invalidates the session holding the connection
    pub fn disconnects(self) -> bool {
        disconnects(self.code)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}: {}", self.code, self.message)
    }
}

/// Classify a raw driver status code
pub fn classify(code: u32) -> Outcome {
    match code {
        0 => Outcome::Success,
        data if data < FAULT_BASE => Outcome::Data(data),
        code => Outcome::Fault(Fault {
            code,
            message: message_for(code),
        }),
    }
}

/// Registered description for a fault code
fn message_for(code: u32) -> &'static str {
    match code {
        0x80A0_0101 => "communication line not open",
        0x80A0_0104 => "duplicate open",
        0x80A0_0105 => "invalid argument data type",
        0x80A0_0106 => "argument data out of range",
        0x80A0_0107 => "not supported",
        0x80A0_0109 => "communication line cannot be opened",
        0x80A0_010A => "argument is a null pointer",
        0x80A0_010B => "invalid argument data",
        0x80A0_010C => "COMM port handle error",
        0x80B0_0101 => "cannot allocate memory",
        0x80B0_0102 => "cannot retrieve backend error",
        0x80B0_0201 => "invalid mode",
        0x80B0_0202 => "no file open",
        0x80B0_0203 => "file already exists",
        0x80B0_0204 => "a file is already open",
        0x80B0_0205 => "cannot create temporary file",
        0x80B0_0206 => "file not opened in write mode",
        0x80B0_0207 => "invalid write data size",
        0x80B0_0208 => "not writable in current state",
        0x80B0_0209 => "file not opened in read mode",
        0x80B0_020A => "not readable in current state",
        0x80B0_020B => "cannot create temporary file",
        0x80B0_020C => "file does not exist (read mode)",
        0x80B0_020D => "file cannot be opened",
        0x80B0_020E => "invalid file path",
        0x80B0_020F => "invalid read file",
        0x80B0_0210 => "invalid write file",
        0x80B0_0301 => "invalid host name for local automation connection",
        0x80B0_0302 => "TCP/IP communication not configured",
        0x80B0_0303 => "cannot configure while communicating",
        0x80B0_0304 => "lower-level module missing",
        0x80B0_0305 => "cannot create backend object",
        0x80B0_0401 => "data does not exist",
        0x80B0_0402 => "duplicate data",
        0x80B0_0501 => "parameter information file missing",
        0x8002_0190 => "invalid NC card number",
        0x8002_0102 => "device not opened",
        0x8002_0132 => "invalid command",
        0x8002_0133 => "communication parameter out of range",
        0x8003_0143 => "file system fault",
        0x8003_0191 => "directory does not exist",
        0x8003_019B => "drive does not exist",
        0x8003_01A2 => "directory does not exist",
        0x8003_01A8 => "drive does not exist",
        0x8005_0D90 => "invalid system or axis",
        0x8005_0D02 => "invalid alarm type",
        0x8005_0D03 => "communication data error between NC and PC",
        0x8004_1194 => "invalid tool life data kind",
        0x8004_1195 => "setting data out of range",
        0x8004_1196 => "set tool number mismatch",
        0x8004_1197 => "specified tool number out of specification",
        0x8004_0190 => "invalid system or axis",
        0x8004_0191 => "invalid major section number",
        0x8004_0192 => "invalid minor section number",
        0x8004_0196 => "data does not fit in the application buffer",
        0x8004_0197 => "invalid data type",
        0x8004_019D => "data cannot be read in current state",
        0x8004_019F => "write-only data",
        0x8004_01A0 => "invalid axis",
        0x8004_01A1 => "invalid data number",
        0x8004_01A3 => "no read data",
        0x8004_019A => "read data out of range",
        0x8004_0290 => "invalid system or axis",
        0x8004_0291 => "invalid major section number",
        0x8004_0292 => "invalid minor section number",
        0x8004_0296 => "data does not fit in the application buffer",
        0x8004_0297 => "invalid data type",
        0x8004_029B => "read-only data",
        0x8004_029E => "data cannot be written in current state",
        0x8004_02A0 => "invalid axis",
        0x8004_024D => "safety password locked",
        0x8004_02A2 => "format aborted, invalid SRAM release parameter",
        0x8004_02A4 => "cannot register edit file (already editing)",
        0x8004_02A5 => "cannot release edit file",
        0x8004_02A3 => "write destination data missing",
        0x8004_029A => "write data out of range",
        0x8004_02A6 => "safety password not set",
        0x8004_02A7 => "safety data consistency check error",
        0x8004_02A9 => "invalid safety data type",
        0x8004_02A8 => "cannot write while tool data is sorting",
        0x8004_0501 => "high-speed read not registered",
        0x8004_0402 => "invalid priority",
        0x8004_0401 => "registration count exceeded",
        0x8004_0490 => "invalid address",
        0x8004_0491 => "invalid major section number",
        0x8004_0492 => "invalid minor section number",
        0x8004_0497 => "invalid data type",
        0x8004_049B => "read-only data",
        0x8004_049D => "data cannot be read in current state",
        0x8004_049F => "write-only data",
        0x8004_04A0 => "invalid axis",
        0x8004_0BA3 => "re-threading position not set",
        0x8003_0101 => "another directory is already open",
        0x8003_0103 => "data size exceeded",
        0x8003_0148 => "file name too long",
        0x8003_0198 => "invalid file name format",
        0x8003_0190 => "not opened",
        0x8003_0194 => "file information read error",
        0x8003_0102 => "another directory is already open (PC only)",
        0x8003_01A0 => "not opened",
        0x8003_01A1 => "file does not exist",
        0x8003_01A5 => "file information read error",
        0x8003_0447 => "cannot copy (machine running)",
        0x8003_0403 => "registered program count exceeded",
        0x8003_0401 => "copy destination file already exists",
        0x8003_0443 => "file system fault",
        0x8003_0448 => "file name too long",
        0x8003_0498 => "invalid file name format",
        0x8003_0404 => "memory capacity exceeded",
        0x8003_0491 => "directory does not exist",
        0x8003_049B => "drive does not exist",
        0x8003_0442 => "file does not exist",
        0x8003_0446 => "cannot copy (PLC running)",
        0x8003_0494 => "cannot read source file",
        0x8003_0495 => "cannot write destination file",
        0x8003_044A => "cannot copy (protected)",
        0x8003_0405 => "compare error",
        0x8003_0449 => "compare function not supported",
        0x8003_044C => "file copy in progress",
        0x8003_0490 => "file not opened",
        0x8003_044D => "safety password locked",
        0x8003_049D => "invalid file format",
        0x8003_049E => "password mismatch",
        0x8003_04A4 => "file cannot be created (PC only)",
        0x8003_04A3 => "cannot open file (PC only)",
        0x8003_0402 => "copy destination file already exists",
        0x8003_04A7 => "invalid file name format",
        0x8003_04A2 => "directory does not exist",
        0x8003_04A8 => "drive does not exist",
        0x8003_04A1 => "file does not exist",
        0x8003_04A5 => "cannot read source file",
        0x8003_04A6 => "cannot write destination file",
        0x8003_0406 => "disk capacity exceeded",
        0x8003_04A0 => "file not opened",
        0x8003_0201 => "file cannot be deleted",
        0x8003_0242 => "file does not exist",
        0x8003_0243 => "file system fault",
        0x8003_0247 => "cannot delete (machine running)",
        0x8003_0248 => "file name too long",
        0x8003_024A => "file cannot be deleted (protected)",
        0x8003_0291 => "directory does not exist",
        0x8003_0298 => "invalid file name format",
        0x8003_029B => "drive does not exist",
        0x8003_0202 => "file cannot be deleted",
        0x8003_02A7 => "invalid file name format",
        0x8003_02A2 => "directory does not exist",
        0x8003_02A8 => "drive does not exist",
        0x8003_02A1 => "file does not exist",
        0x8003_0301 => "new file name already exists",
        0x8003_0342 => "file does not exist",
        0x8003_0343 => "file system fault",
        0x8003_0347 => "cannot rename (machine running)",
        0x8003_0348 => "file name too long",
        0x8003_034A => "cannot rename (protected)",
        0x8003_0391 => "directory does not exist",
        0x8003_0398 => "invalid file name format",
        0x8003_039B => "drive does not exist",
        0x8003_0303 => "cannot rename",
        0x8003_0305 => "old and new file names are identical",
        0x8003_0302 => "new file name already exists",
        0x8003_03A7 => "invalid file name format",
        0x8003_03A2 => "directory does not exist",
        0x8003_03A8 => "drive does not exist",
        0x8003_03A1 => "file does not exist",
        0x8003_0691 => "directory does not exist",
        0x8003_069B => "drive does not exist",
        0x8003_0643 => "file system fault",
        0x8003_0648 => "file name too long or invalid format",
        0x8003_06A2 => "directory does not exist (PC only)",
        0x8003_06A8 => "drive does not exist (PC only)",
        0x8003_0701 => "data does not fit in the application buffer",
        0x8003_0794 => "drive information read error",
        0x8202_0001 => "already opened",
        0x8202_0002 => "not opened",
        0x8202_0004 => "card does not exist",
        0x8202_0006 => "invalid channel number",
        0x8202_0007 => "invalid file descriptor",
        0x8202_000A => "not connected",
        0x8202_000B => "not closed",
        0x8202_0014 => "timeout",
        0x8202_0015 => "invalid data",
        0x8202_0016 => "terminated by cancel request",
        0x8202_0017 => "invalid packet size",
        0x8202_0018 => "terminated by task exit",
        0x8202_0032 => "invalid command",
        0x8202_0033 => "invalid setting data",
        0x8006_0001 => "data read cache disabled",
        0x8006_0090 => "invalid address",
        0x8006_0091 => "invalid major section number",
        0x8006_0092 => "invalid minor section number",
        0x8006_0097 => "invalid data type",
        0x8006_009A => "invalid data range",
        0x8006_009D => "data cannot be read in current state",
        0x8006_009F => "invalid data type",
        0x8006_00A0 => "invalid axis",
        0x8007_0140 => "cannot allocate work area",
        0x8007_0142 => "cannot open file",
        0x8007_0147 => "file cannot be opened (machine running)",
        0x8007_0148 => "file path too long",
        0x8007_0149 => "unsupported (no CF support)",
        0x8007_0192 => "already opened",
        0x8007_0199 => "maximum open file count exceeded",
        0x8007_019F => "cannot open while tool data is sorting",
        0x8007_01B0 => "safety password not authenticated",
        0x8007_0290 => "file not opened",
        0x8007_0340 => "cannot allocate work area",
        0x8007_0347 => "file cannot be created (machine running)",
        0x8007_0348 => "file path too long",
        0x8007_0349 => "unsupported (no CF support)",
        0x8007_0392 => "already created",
        0x8007_0393 => "cannot create file",
        0x8007_0399 => "maximum open file count exceeded",
        0x8007_039B => "drive does not exist",
        0x8007_0490 => "file not opened",
        0x8007_0494 => "file information read error",
        0x8007_0549 => "write not allowed",
        0x8007_0590 => "file not opened",
        0x8007_0595 => "file write error",
        0x8007_0740 => "file delete error",
        0x8007_0742 => "file does not exist",
        0x8007_0747 => "file cannot be deleted (machine running)",
        0x8007_0748 => "file path too long",
        0x8007_0749 => "unsupported (no CF support)",
        0x8007_0792 => "file is open",
        0x8007_079B => "drive does not exist",
        0x8007_0842 => "file does not exist",
        0x8007_0843 => "file cannot be renamed",
        0x8007_0848 => "file path too long",
        0x8007_0849 => "unsupported (no CF support)",
        0x8007_0892 => "file is open",
        0x8007_0899 => "maximum open file count exceeded",
        0x8007_089B => "drive does not exist",
        0x8007_0944 => "invalid command (unsupported)",
        0x8007_0990 => "not opened",
        0x8007_0994 => "read error",
        0x8007_0995 => "write error",
        0x8007_0996 => "data does not fit in the application buffer",
        0x8007_0997 => "invalid data type",
        0x8007_0949 => "unsupported (no CF support)",
        0x8007_0A40 => "cannot allocate work area",
        0x8007_0A47 => "directory cannot be opened (machine running)",
        0x8007_0A48 => "file path too long",
        0x8007_0A49 => "unsupported (no CF support)",
        0x8007_0A91 => "directory does not exist",
        0x8007_0A92 => "already opened",
        0x8007_0A99 => "maximum open directory count exceeded",
        0x8007_0A9B => "drive does not exist",
        0x8007_0B90 => "directory not opened",
        0x8007_0B91 => "directory does not exist",
        0x8007_0B96 => "data does not fit in the application buffer",
        0x8007_0D90 => "directory not opened",
        0x8007_0E48 => "file path too long",
        0x8007_0E49 => "unsupported (no CF support)",
        0x8007_0E94 => "file information read error",
        0x8007_0E99 => "maximum open file count exceeded",
        0x8007_0E9B => "drive does not exist",
        0x8007_0F48 => "file path too long",
        0x8007_0F49 => "unsupported (no CF support)",
        0x8007_0F94 => "file information read error",
        0x8007_0F90 => "file not opened",
        0x8007_0F9B => "drive does not exist",
        0x8007_099C => "format aborted, invalid SRAM release parameter",
        0xF000_00FF => "invalid argument",
        0xFFFF_FFFF => "data cannot be read or written in current state",
        _ => "unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_is_plain_success() {
        assert_eq!(classify(0), Outcome::Success);
    }

    #[test]
    fn positive_codes_carry_enumeration_data() {
        assert_eq!(classify(1), Outcome::Data(1));
        assert_eq!(classify(42), Outcome::Data(42));
        assert_eq!(classify(FAULT_BASE - 1), Outcome::Data(FAULT_BASE - 1));
    }

    #[test]
    fn known_codes_return_their_registered_message() {
        let fault = classify(0x80A0_0101).fault().unwrap();
        assert_eq!(fault.message, "communication line not open");
        let fault = classify(0x8003_0242).fault().unwrap();
        assert_eq!(fault.message, "file does not exist");
        let fault = classify(0x8202_0014).fault().unwrap();
        assert_eq!(fault.message, "timeout");
        let fault = classify(0xFFFF_FFFF).fault().unwrap();
        assert_eq!(
            fault.message,
            "data cannot be read or written in current state"
        );
    }

    #[test]
    fn unknown_codes_in_the_fault_range_are_still_faults() {
        let fault = classify(0x80FF_0000).fault().unwrap();
        assert_eq!(fault.message, "unknown error");
        assert_eq!(fault.code, 0x80FF_0000);
    }

    #[test]
    fn only_the_two_line_down_codes_disconnect() {
        assert!(classify(LINE_NOT_OPEN).fault().unwrap().disconnects());
        assert!(classify(NOT_CONNECTED).fault().unwrap().disconnects());
        assert!(!classify(0x80A0_0104).fault().unwrap().disconnects());
        assert!(!classify(0x8003_0242).fault().unwrap().disconnects());
        assert!(!classify(0x80FF_0000).fault().unwrap().disconnects());
    }

    proptest! {
        #[test]
        fn fault_range_codes_never_classify_as_success(code in FAULT_BASE..=u32::MAX) {
            prop_assert!(classify(code).fault().is_some());
        }

        #[test]
        fn sub_fault_range_codes_never_classify_as_fault(code in 1..FAULT_BASE) {
            prop_assert_eq!(classify(code), Outcome::Data(code));
        }
    }
}
