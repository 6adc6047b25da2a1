use thiserror::Error;

/// Boxed error carried by transport-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message used when the gateway rejects an order without saying why.
pub const DEFAULT_REJECTION: &str = "could not create the order";

/// Failure to create a payment order. Terminal for that attempt.
#[derive(Error, Debug)]
pub enum OrderError {
    /// The gateway answered, but refused the order.
    #[error("{0}")]
    Rejected(String),
    /// The gateway could not be reached or answered with something unreadable.
    #[error("could not connect to the payment gateway")]
    ConnectionFailure(#[source] BoxError),
}

/// Failure of a single status check. Never ends a polling session.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("status check failed: {0}")]
    Transient(#[source] BoxError),
}

#[derive(Error, Debug)]
pub enum PosError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Order error: {0}")]
    Order(#[from] OrderError),
    #[error("Gateway error: {0}")]
    Gateway(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PosError>;
