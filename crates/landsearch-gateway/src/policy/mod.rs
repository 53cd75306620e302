//! Policy layer (request admission).
//!
//! The limiter itself lives in `landsearch-core`; this module only decides
//! which requests go through it and how a rejection looks on the wire.

pub mod admission;

pub use admission::admit;
