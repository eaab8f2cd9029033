//! Domain layer: catalog reference data, mapping records, and the storage ports
//! the engine reads and writes through.

pub mod catalog;
pub mod mapping;
pub mod ports;
