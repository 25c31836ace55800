//! Application services for the kanban task board.

mod store;

pub use store::{
    BoardStore, BoardStoreError, BoardStoreResult, CreateTaskRequest, MoveTrigger, MutationKind,
    MutationSeq,
};
