// Typed collection failures; never cross the CounterCollector boundary

use std::num::ParseIntError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} has no content line", path.display())]
    EmptySource { path: PathBuf },

    #[error("{} has no token at position {position}", path.display())]
    MissingField { path: PathBuf, position: usize },

    #[error("{} token {token:?} at position {position} is not an integer", path.display())]
    InvalidField {
        path: PathBuf,
        position: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("current process is not visible to the counter source")]
    ProcessUnavailable,
}

impl CollectError {
    /// True for layout problems, as opposed to the source being unreachable.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            CollectError::EmptySource { .. }
                | CollectError::MissingField { .. }
                | CollectError::InvalidField { .. }
        )
    }
}
