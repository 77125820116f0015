pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid controller address {0:?}: expected host:port")]
    InvalidAddress(String),

    #[error("Invalid axis selector {0:?}: expected X, Y or Z")]
    InvalidAxis(String),

    #[error("Invalid program type selector {0:?}: expected main or sub")]
    InvalidProgramType(String),

    #[error("Invalid device name {0:?}: expected an M (bit) or D (word) device")]
    InvalidDevice(String),

    #[error("Malformed directory record {0:?}")]
    MalformedRecord(String),
}
