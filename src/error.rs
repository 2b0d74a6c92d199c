use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("index {idx} is out of range for a list of length {len}")]
    OutOfRange { idx: usize, len: usize },

    /// The list has no backing container yet.
    #[error("list is not initialized yet")]
    NotReady,

    #[error("initialization of the list was cancelled")]
    Cancelled,

    #[error("initialization of the list failed: {0}")]
    InitFailed(String),
}

pub(crate) fn check_idx(idx: usize, len: usize) -> Result<(), ListError> {
    if idx < len {
        Ok(())
    } else {
        Err(ListError::OutOfRange { idx, len })
    }
}

/// Checks that the run `idx .. idx + count` lies within a list of length `len`.
pub(crate) fn check_range(idx: usize, count: usize, len: usize) -> Result<(), ListError> {
    match idx.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(ListError::OutOfRange { idx, len }),
    }
}
