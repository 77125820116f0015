//! Error types for meldas-core

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Every unit number in 1..=255 is assigned to an open session
    #[error("Unit number pool exhausted: all 255 units are in use")]
    UnitsExhausted,
}
