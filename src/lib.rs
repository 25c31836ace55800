//! Trellis: kanban task board core for a project-management dashboard.
//!
//! This crate provides the stateful heart of the dashboard's task board: an
//! in-memory board representation per open project, synchronized with a
//! remote task repository through optimistic updates, rollback on failure,
//! and sequence-guarded reconciliation.
//!
//! # Architecture
//!
//! Trellis follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, backends)
//!
//! # Modules
//!
//! - [`board`]: Task board domain, repository port, and the board store

pub mod board;
