//! NC program file transfer
//!
//! Reads are chunked: the driver hands back at most
//! [`FILE_CHUNK_SIZE`] bytes per call, and a short chunk (zero bytes
//! included) marks end of file. Writes go out in one call. The file
//! handle is closed on every exit path; a fault from the close itself
//! never overrides the operation's result.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use meldas_core::constants::FILE_CHUNK_SIZE;
use meldas_types::FileOpenMode;

use crate::error::Result;
use crate::session::{Link, Session};

impl Session {
    /// Read a whole NC program file, e.g. `M01:\PRG\USER\100`
    pub fn read_file(&self, path: &str) -> Result<Bytes> {
        self.with_session(|link| {
            let result = (|| {
                self.check(link.driver.open_file(path, FileOpenMode::Read.code()))?;
                let mut contents = BytesMut::new();
                loop {
                    let (code, chunk) = link.driver.read_file(FILE_CHUNK_SIZE);
                    self.check(code)?;
                    contents.extend_from_slice(&chunk);
                    if chunk.len() < FILE_CHUNK_SIZE {
                        return Ok(contents.freeze());
                    }
                }
            })();
            self.close_file_best_effort(link);
            result
        })
    }

    /// Replace the contents of an NC program file
    pub fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.with_session(|link| {
            let result = (|| {
                self.check(link.driver.open_file(path, FileOpenMode::Overwrite.code()))?;
                self.check(link.driver.write_file(data))
            })();
            self.close_file_best_effort(link);
            result
        })
    }

    /// Delete an NC program file by path
    pub fn delete_file(&self, path: &str) -> Result<()> {
        self.with_session(|link| self.check(link.driver.delete_file(path)))
    }

    fn close_file_best_effort(&self, link: &mut Link) {
        let code = link.driver.close_file();
        if code != 0 {
            debug!(
                address = %self.address(),
                code = format_args!("0x{code:08X}"),
                "file close fault ignored"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use meldas_driver::{FailPoint, SimController};

    use crate::Hub;

    fn sim_hub() -> (SimController, Hub) {
        let sim = SimController::new();
        let hub = {
            let sim = sim.clone();
            Hub::new(move |_| Box::new(sim.driver()))
        };
        (sim, hub)
    }

    const PATH: &str = "M01:\\PRG\\USER\\100";

    #[test]
    fn write_then_read_round_trips() {
        let (_sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        for len in [0usize, 1, 100, 255, 256, 257, 512, 256 * 1000 + 19] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            session.write_file(PATH, &payload).unwrap();
            let read = session.read_file(PATH).unwrap();
            assert_eq!(&read[..], &payload[..], "length {len}");
        }
    }

    #[test]
    fn chunk_multiple_payloads_terminate_on_the_empty_tail() {
        // exactly one chunk: the second read returns zero bytes and must
        // end the loop rather than spin or fault
        let (sim, hub) = sim_hub();
        sim.add_file(PATH, &[7u8; 256]);
        let session = hub.session("10.0.0.5:683").unwrap();
        let read = session.read_file(PATH).unwrap();
        assert_eq!(read.len(), 256);
    }

    #[test]
    fn reading_a_missing_file_faults() {
        let (_sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        let err = session.read_file(PATH).unwrap_err();
        assert_eq!(err.fault_code(), Some(0x80B0_020C));
    }

    #[test]
    fn double_delete_classifies_as_missing_file() {
        let (_sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        session.write_file(PATH, b"G0 X0").unwrap();
        session.delete_file(PATH).unwrap();
        let err = session.delete_file(PATH).unwrap_err();
        match err {
            crate::Error::Driver { code, message, .. } => {
                assert_eq!(code, 0x8003_0242);
                assert_eq!(message, "file does not exist");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn a_mid_read_fault_still_closes_the_file_handle() {
        let (sim, hub) = sim_hub();
        sim.add_file(PATH, &[1u8; 600]);
        let session = hub.session("10.0.0.5:683").unwrap();
        sim.inject_fault(FailPoint::ReadFile, 0x80B0_020A);
        assert!(session.read_file(PATH).is_err());
        // the handle was released, so the next transfer can open again
        let read = session.read_file(PATH).unwrap();
        assert_eq!(read.len(), 600);
    }

    #[test]
    fn overwrite_replaces_previous_contents() {
        let (sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        session.write_file(PATH, b"G28 X0 Y0 Z0").unwrap();
        session.write_file(PATH, b"M30").unwrap();
        assert_eq!(sim.file(PATH).unwrap(), b"M30");
    }
}
