//! Unit-number pool
//!
//! The driver tells concurrent logical connections apart with a unit
//! number in 1..=255. Numbers are a process-wide scarce resource: one per
//! open session, never reused while assigned, returned to the pool on
//! session close.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::constants::UNIT_POOL_SIZE;
use crate::error::{Error, Result};

/// A unit number in 1..=255, exclusive while held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitNo(u8);

impl UnitNo {
    pub fn get(self) -> u8 {
        self.0
    }

    /// Two-digit uppercase hex form used in drive prefixes (`M0A:`)
    pub fn to_hex(self) -> String {
        format!("{:02X}", self.0)
    }
}

impl fmt::Display for UnitNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pool of driver unit numbers
///
/// Cloneable handle; clones share the same slot table. Safe to allocate
/// and release from any thread.
#[derive(Debug, Clone)]
pub struct UnitPool {
    slots: Arc<Mutex<[bool; UNIT_POOL_SIZE]>>,
}

impl UnitPool {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new([false; UNIT_POOL_SIZE])),
        }
    }

    /// Claim the lowest free unit number
    pub fn allocate(&self) -> Result<UnitNo> {
        let mut slots = self.slots.lock();
        for (index, used) in slots.iter_mut().enumerate() {
            if !*used {
                *used = true;
                let unit = UnitNo((index + 1) as u8);
                debug!(unit = %unit, "allocated unit number");
                return Ok(unit);
            }
        }
        Err(Error::UnitsExhausted)
    }

    /// Return a unit number to the pool. Idempotent: releasing an
    /// already-free number is a no-op.
    pub fn release(&self, unit: UnitNo) {
        self.slots.lock()[(unit.0 - 1) as usize] = false;
        debug!(unit = %unit, "released unit number");
    }

    /// Number of units currently assigned
    pub fn in_use(&self) -> usize {
        self.slots.lock().iter().filter(|used| **used).count()
    }
}

impl Default for UnitPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_ascending_from_one() {
        let pool = UnitPool::new();
        for expected in 1..=255u8 {
            assert_eq!(pool.allocate().unwrap().get(), expected);
        }
        assert_eq!(pool.in_use(), 255);
    }

    #[test]
    fn fails_once_exhausted() {
        let pool = UnitPool::new();
        for _ in 0..255 {
            pool.allocate().unwrap();
        }
        assert_eq!(pool.allocate(), Err(Error::UnitsExhausted));
    }

    #[test]
    fn released_number_is_the_next_returned() {
        let pool = UnitPool::new();
        let units: Vec<_> = (0..10).map(|_| pool.allocate().unwrap()).collect();
        pool.release(units[3]);
        assert_eq!(pool.allocate().unwrap(), units[3]);
        // nothing was freed, so allocation continues past the high mark
        assert_eq!(pool.allocate().unwrap().get(), 11);
    }

    #[test]
    fn release_is_idempotent() {
        let pool = UnitPool::new();
        let unit = pool.allocate().unwrap();
        pool.release(unit);
        pool.release(unit);
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.allocate().unwrap(), unit);
    }

    #[test]
    fn concurrent_allocation_yields_distinct_numbers() {
        let pool = UnitPool::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    (0..16)
                        .map(|_| pool.allocate().unwrap().get())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut all: Vec<u8> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 128);
        assert_eq!(pool.in_use(), 128);
    }

    #[test]
    fn hex_form_is_two_digit_uppercase() {
        let pool = UnitPool::new();
        let unit = pool.allocate().unwrap();
        assert_eq!(unit.to_hex(), "01");
        assert_eq!(UnitNo(0xAB).to_hex(), "AB");
    }
}
