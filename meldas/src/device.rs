//! Bit and word device access
//!
//! Devices go through a set / execute / clear cycle: the descriptor is
//! staged, the read or write executes, and the staging table is cleared
//! again. Clear always runs, even after a failed execute, and the
//! earliest fault encountered is the one reported.
//!
//! The driver protocol accepts whole arrays; this client stages one
//! device per call.

use meldas_types::DeviceAddress;

use crate::error::{Error, Result};
use crate::session::{Link, Session};

impl Session {
    /// Read one device value (`M…` = bit, `D…` = word)
    pub fn read_device(&self, device: &str) -> Result<i32> {
        let device: DeviceAddress = device.parse()?;
        self.with_session(|link| {
            // the staged value is a dummy; only the descriptor matters
            self.stage_device(link, &device, 0)?;
            let (code, values) = link.driver.read_devices();
            let read = self.check(code).and_then(|()| {
                values.first().copied().ok_or_else(|| {
                    Error::InvalidResponse("device read returned no values".into())
                })
            });
            let clear = self.check(link.driver.clear_devices());
            match read {
                Ok(value) => clear.map(|()| value),
                Err(err) => Err(err),
            }
        })
    }

    /// Write one device value
    pub fn write_device(&self, device: &str, value: i32) -> Result<()> {
        let device: DeviceAddress = device.parse()?;
        self.with_session(|link| {
            self.stage_device(link, &device, value)?;
            let write = self.check(link.driver.write_devices());
            let clear = self.check(link.driver.clear_devices());
            write.and(clear)
        })
    }

    fn stage_device(&self, link: &mut Link, device: &DeviceAddress, value: i32) -> Result<()> {
        let names = [device.name().to_owned()];
        let type_codes = [device.width().type_code()];
        let values = [value];
        self.check(link.driver.set_devices(&names, &type_codes, &values))
    }
}

#[cfg(test)]
mod tests {
    use meldas_driver::{FailPoint, SimController};

    use crate::{Error, Hub};

    fn sim_hub() -> (SimController, Hub) {
        let sim = SimController::new();
        let hub = {
            let sim = sim.clone();
            Hub::new(move |_| Box::new(sim.driver()))
        };
        (sim, hub)
    }

    #[test]
    fn bit_device_round_trips() {
        let (sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        session.write_device("M900", 1).unwrap();
        assert_eq!(session.read_device("M900").unwrap(), 1);
        assert_eq!(sim.device("M900"), 1);
    }

    #[test]
    fn word_device_round_trips() {
        let (sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        session.write_device("D200", 10).unwrap();
        assert_eq!(session.read_device("D200").unwrap(), 10);
        assert_eq!(sim.device("D200"), 10);
    }

    #[test]
    fn unknown_prefixes_fail_before_any_driver_call() {
        let (sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        let err = session.read_device("X100").unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
        let err = session.write_device("R5", 1).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
        assert_eq!(sim.open_count(), 0);
    }

    #[test]
    fn staging_is_cleared_after_each_cycle() {
        let (sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        session.write_device("D10", 3).unwrap();
        assert_eq!(sim.staged_count(), 0);
        session.read_device("D10").unwrap();
        assert_eq!(sim.staged_count(), 0);
    }

    #[test]
    fn clear_still_runs_when_the_write_faults() {
        let (sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        sim.inject_fault(FailPoint::WriteDevices, 0x8004_029E);
        let err = session.write_device("D10", 3).unwrap_err();
        // the write's own fault wins over anything the clear reports
        assert_eq!(err.fault_code(), Some(0x8004_029E));
        assert_eq!(sim.staged_count(), 0);
        assert_eq!(sim.device("D10"), 0);
    }

    #[test]
    fn unread_devices_default_to_zero() {
        let (_sim, hub) = sim_hub();
        let session = hub.session("10.0.0.5:683").unwrap();
        assert_eq!(session.read_device("M123").unwrap(), 0);
    }
}
