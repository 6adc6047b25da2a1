//! Application layer: the order lifecycle.
//!
//! `OrderInitiator` creates an order, `StatusPoller` follows it until the
//! gateway reports a terminal status, and `Terminal` ties the two together
//! while guaranteeing that at most one polling session is alive at a time.

pub mod initiator;
pub mod poller;
pub mod terminal;
