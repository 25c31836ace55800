//! Adapter implementations of the board port contracts.

pub mod memory;
