use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Maximum {0} extensions")]
    CapacityExceeded(usize),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn invalid(msg: &str) -> Self { Self::InvalidInput(msg.to_string()) }
    pub fn not_found(msg: &str) -> Self { Self::NotFound(msg.to_string()) }
    pub fn conflict(msg: &str) -> Self { Self::Conflict(msg.to_string()) }
    pub fn storage<E: std::fmt::Display>(e: E) -> Self { Self::Storage(e.to_string()) }
}
