//! Gateway adapters: the HTTP client used in production and a scripted in-memory double.

pub mod http;
pub mod in_memory;
