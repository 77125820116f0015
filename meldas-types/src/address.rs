//! Controller addressing

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Network address of one controller unit
///
/// Parsed from the `host:port` form used throughout the configuration
/// surface. Immutable once a session has been created for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub host: String,
    pub port: u16,
}

impl Address {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidAddress(s.to_owned()))?;
        if host.is_empty() {
            return Err(Error::InvalidAddress(s.to_owned()));
        }
        let port = port
            .parse()
            .map_err(|_| Error::InvalidAddress(s.to_owned()))?;
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
