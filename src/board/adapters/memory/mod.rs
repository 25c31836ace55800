//! In-memory adapter implementations of the board ports.

mod task;

pub use task::InMemoryTaskRepository;
