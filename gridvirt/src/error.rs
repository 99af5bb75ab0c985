use crate::{BufferId, SceneNodeId};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Coarse classification of [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The operation named a disposed or unknown node, row, or buffer.
    InvalidHandle,
    /// The caller's input broke a documented precondition.
    PreconditionViolation,
}

/// Errors returned by the planner, the column cache and the dirty tree.
///
/// Every fallible operation is atomic: when an error is returned, no state was modified.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("scene node {id:?} is disposed or unknown")]
    InvalidNode { id: SceneNodeId },

    #[error("buffer {id} is not bound to any row")]
    InvalidBuffer { id: BufferId },

    #[error("row node id {node_id} is not in the row table")]
    UnknownRow { node_id: u32 },

    #[error("duplicate row node id {node_id} at indexes {first} and {second}")]
    DuplicateNodeId {
        node_id: u32,
        first: usize,
        second: usize,
    },

    #[error("row node id {node_id} has invalid height {height} (must be finite and > 0)")]
    InvalidRowHeight { node_id: u32, height: f32 },

    #[error("{definitions} column definitions but {slots} column slots")]
    ColumnSlotMismatch { definitions: usize, slots: usize },

    #[error("attaching {id:?} under {parent:?} would create a cycle")]
    ParentCycle {
        id: SceneNodeId,
        parent: SceneNodeId,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidNode { .. } | Self::InvalidBuffer { .. } | Self::UnknownRow { .. } => {
                ErrorKind::InvalidHandle
            }
            Self::DuplicateNodeId { .. }
            | Self::InvalidRowHeight { .. }
            | Self::ColumnSlotMismatch { .. }
            | Self::ParentCycle { .. } => ErrorKind::PreconditionViolation,
        }
    }

    pub fn is_invalid_handle(&self) -> bool {
        self.kind() == ErrorKind::InvalidHandle
    }

    pub fn is_precondition_violation(&self) -> bool {
        self.kind() == ErrorKind::PreconditionViolation
    }
}
