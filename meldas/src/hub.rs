//! Session registry
//!
//! A [`Hub`] owns the process-wide pieces: the unit-number pool, the
//! driver factory, and the session map. Construct one at startup and
//! pass it (or a clone) wherever sessions are needed; there is no
//! ambient global state.
//!
//! The map is keyed by `(thread, address)`: the driver forbids using a
//! connection outside the thread that created it, so each thread gets
//! its own session per controller. Lookup-or-create is atomic, which
//! keeps two racing first calls from allocating two unit numbers for
//! what should be one logical session.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use meldas_core::UnitPool;
use meldas_driver::Driver;
use meldas_types::Address;

use crate::error::Result;
use crate::session::{DriverFactory, Session};

/// Shared handle to the session registry
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

struct HubInner {
    units: UnitPool,
    factory: Arc<DriverFactory>,
    sessions: Mutex<HashMap<(ThreadId, Address), Arc<Session>>>,
}

impl Hub {
    /// Create a hub; `factory` builds a driver for every new connection
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&Address) -> Box<dyn Driver> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(HubInner {
                units: UnitPool::new(),
                factory: Arc::new(factory),
                sessions: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The shared session for the calling thread and `addr` (`host:port`),
    /// created on first use
    pub fn session(&self, addr: &str) -> Result<Arc<Session>> {
        Ok(self.session_at(addr.parse()?))
    }

    /// Same as [`session`](Hub::session), for an already-parsed address
    pub fn session_at(&self, address: Address) -> Arc<Session> {
        let key = (thread::current().id(), address);
        let mut sessions = self.inner.sessions.lock();
        Arc::clone(sessions.entry(key).or_insert_with_key(|(_, address)| {
            Arc::new(Session::new(
                address.clone(),
                self.inner.units.clone(),
                Arc::clone(&self.inner.factory),
            ))
        }))
    }

    /// Unit numbers currently assigned to open sessions
    pub fn units_in_use(&self) -> usize {
        self.inner.units.in_use()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use meldas_driver::SimController;

    use super::Hub;

    fn sim_hub() -> (SimController, Hub) {
        let sim = SimController::new();
        let hub = {
            let sim = sim.clone();
            Hub::new(move |_| Box::new(sim.driver()))
        };
        (sim, hub)
    }

    #[test]
    fn same_thread_and_address_share_one_session() {
        let (_sim, hub) = sim_hub();
        let first = hub.session("10.0.0.5:683").unwrap();
        let second = hub.session("10.0.0.5:683").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn distinct_addresses_get_distinct_sessions() {
        let (sim, hub) = sim_hub();
        let first = hub.session("10.0.0.5:683").unwrap();
        let second = hub.session("10.0.0.6:683").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));

        first.magazine_size().unwrap();
        second.magazine_size().unwrap();
        assert_eq!(sim.units_seen(), vec![1, 2]);
    }

    #[test]
    fn distinct_threads_get_distinct_sessions() {
        let (_sim, hub) = sim_hub();
        let here = hub.session("10.0.0.5:683").unwrap();
        let there = {
            let hub = hub.clone();
            std::thread::spawn(move || hub.session("10.0.0.5:683").unwrap())
                .join()
                .unwrap()
        };
        assert!(!Arc::ptr_eq(&here, &there));
        // the other thread's session works from the thread that made it,
        // and that thread is gone, so only the address should match
        assert_eq!(here.address(), there.address());
    }

    #[test]
    fn bad_address_strings_are_rejected() {
        let (_sim, hub) = sim_hub();
        assert!(hub.session("10.0.0.5").is_err());
        assert!(hub.session("host:port").is_err());
    }
}
