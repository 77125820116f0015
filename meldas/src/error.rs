//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core error: {0}")]
    Core(#[from] meldas_core::Error),

    #[error("Invalid argument: {0}")]
    Argument(#[from] meldas_types::Error),

    /// A driver call returned a fault-range status code
    #[error("{address}: driver fault 0x{code:08X}: {message}")]
    Driver {
        address: String,
        code: u32,
        message: &'static str,
    },

    /// The session was used from a thread other than the one that
    /// created it; the driver forbids sharing connections across threads
    #[error("Session for {address} is owned by another thread")]
    ForeignThread { address: String },

    /// The driver returned a payload its protocol does not allow
    #[error("Invalid driver response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// True when the underlying fault invalidates the session
    pub fn disconnects(&self) -> bool {
        matches!(self, Self::Driver { code, .. } if meldas_core::fault::disconnects(*code))
    }

    /// The raw status code, for driver faults
    pub fn fault_code(&self) -> Option<u32> {
        match self {
            Self::Driver { code, .. } => Some(*code),
            _ => None,
        }
    }
}
