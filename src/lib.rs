//! Point-of-sale display for fixed-QR payments.
//!
//! Creates one payment order at a time against a remote gateway and follows
//! its status until the gateway reports an outcome.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::poller::{PollingSession, SessionContext, SessionState, StatusUpdate};
pub use application::terminal::Terminal;
pub use config::GatewayConfig;
pub use domain::order::{Amount, CreatedOrder, OrderRef, QrInfo};
pub use domain::status::PaymentStatus;
pub use error::{CheckError, OrderError, PosError};
