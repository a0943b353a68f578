//! HTTP transport

mod transport;

pub use transport::{Transport, TransportBuilder};
