//! Kanban task board for one project.
//!
//! This module keeps an in-memory board representation synchronized with the
//! durable task repository: three fixed columns (backlog, in-progress, done)
//! partition the project's tasks, every mutation is applied optimistically
//! and rolled back to its pre-mutation snapshot when the repository rejects
//! it, and successful writes are reconciled with the authoritative record.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
