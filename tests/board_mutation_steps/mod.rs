//! Step definitions for board mutation behaviour scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
