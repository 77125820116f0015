//! Controller sessions
//!
//! A session owns one logical connection to one controller address. It
//! opens lazily on first use, serializes every operation behind an
//! exclusive lock, and recovers from disconnect-class faults by tearing
//! itself down so the next call reopens from scratch.
//!
//! The driver forbids using a connection outside the thread that created
//! it, so a session is tagged with its owning thread and refuses calls
//! from anywhere else; [`Hub`](crate::Hub) hands each thread its own
//! session per address.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use meldas_core::constants::{LOCAL_HOST_NAME, MACHINE_TYPE_MACHINING_CENTER, OPEN_TIMEOUT};
use meldas_core::fault::{Fault, Outcome, classify};
use meldas_core::{UnitNo, UnitPool};
use meldas_driver::Driver;
use meldas_types::Address;

use crate::error::{Error, Result};

/// Creates driver instances for new connections
pub type DriverFactory = dyn Fn(&Address) -> Box<dyn Driver> + Send + Sync;

/// An open connection: the driver plus the unit number it was opened with
pub(crate) struct Link {
    pub(crate) driver: Box<dyn Driver>,
    pub(crate) unit: UnitNo,
}

/// One logical, mutually exclusive connection to a controller
pub struct Session {
    address: Address,
    owner: ThreadId,
    units: UnitPool,
    factory: Arc<DriverFactory>,
    link: Mutex<Option<Link>>,
}

impl Session {
    pub(crate) fn new(address: Address, units: UnitPool, factory: Arc<DriverFactory>) -> Self {
        Self {
            address,
            owner: thread::current().id(),
            units,
            factory,
            link: Mutex::new(None),
        }
    }

    /// The controller address this session talks to
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Whether the session currently holds an open connection
    pub fn is_open(&self) -> bool {
        self.link.lock().is_some()
    }

    /// Try to open the session, reporting whether it ended up open.
    ///
    /// Faults are swallowed; use as a pre-flight liveness check.
    pub fn probe_open(&self) -> bool {
        self.with_session(|_| Ok(())).is_ok()
    }

    /// Close the session, returning its unit number to the pool.
    ///
    /// Never fails: faults during teardown are discarded.
    pub fn close(&self) {
        if thread::current().id() != self.owner {
            warn!(address = %self.address, "close ignored: session owned by another thread");
            return;
        }
        Self::close_link(&self.units, &self.address, &mut self.link.lock());
    }

    /// Run one operation under the session lock.
    ///
    /// Opens the connection first if necessary. Any disconnect-classified
    /// fault, whether from the open or from `op`, tears the session down
    /// the error surfaces, so the next call starts from a clean slate.
    pub(crate) fn with_session<T>(&self, op: impl FnOnce(&mut Link) -> Result<T>) -> Result<T> {
        if thread::current().id() != self.owner {
            return Err(Error::ForeignThread {
                address: self.address.to_string(),
            });
        }
        let mut link = self.link.lock();
        let result = match link.as_mut() {
            Some(open) => op(open),
            None => match self.open_link() {
                Ok(opened) => op(link.insert(opened)),
                Err(err) => Err(err),
            },
        };
        if let Err(err) = &result {
            if err.disconnects() {
                warn!(address = %self.address, %err, "disconnect-class fault, closing session");
                Self::close_link(&self.units, &self.address, &mut link);
            }
        }
        result
    }

    /// Classify a raw status code into an operation result
    pub(crate) fn check(&self, code: u32) -> Result<()> {
        match classify(code) {
            Outcome::Success | Outcome::Data(_) => Ok(()),
            Outcome::Fault(fault) => Err(self.fault_error(fault)),
        }
    }

    pub(crate) fn fault_error(&self, fault: Fault) -> Error {
        trace!(address = %self.address, %fault, "driver call faulted");
        Error::Driver {
            address: self.address.to_string(),
            code: fault.code,
            message: fault.message,
        }
    }

    fn open_link(&self) -> Result<Link> {
        debug!(address = %self.address, "opening session");
        let mut driver = (self.factory)(&self.address);
        let code = driver.set_tcpip(&self.address.host, self.address.port);
        if let Err(err) = self.check(code) {
            driver.release();
            return Err(err);
        }
        let unit = self.units.allocate()?;
        let code = driver.open_unit(
            MACHINE_TYPE_MACHINING_CENTER,
            unit.get(),
            OPEN_TIMEOUT,
            LOCAL_HOST_NAME,
        );
        if let Err(err) = self.check(code) {
            // the slot must not leak when the open fails halfway
            self.units.release(unit);
            let _ = driver.close();
            driver.release();
            return Err(err);
        }
        info!(address = %self.address, unit = %unit, "session open");
        Ok(Link { driver, unit })
    }

    fn close_link(units: &UnitPool, address: &Address, link: &mut Option<Link>) {
        if let Some(mut open) = link.take() {
            units.release(open.unit);
            let code = open.driver.close();
            if code != 0 {
                debug!(
                    address = %address,
                    code = format_args!("0x{code:08X}"),
                    "driver close fault ignored"
                );
            }
            open.driver.release();
            debug!(address = %address, unit = %open.unit, "session closed");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        Self::close_link(&self.units, &self.address, self.link.get_mut());
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.link.try_lock() {
            Some(link) => {
                if link.is_some() {
                    "Open"
                } else {
                    "Closed"
                }
            }
            None => "Busy",
        };
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("state", &state)
            .finish()
    }
}
