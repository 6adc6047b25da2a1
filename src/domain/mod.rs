//! Domain types for a single payment order and the gateway port it is tracked through.

pub mod order;
pub mod ports;
pub mod status;
