use thiserror::Error;

use crate::editing::domain::edit_error::EditError;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export: every word in the project is deleted")]
    NothingToExport,
    #[error("invalid project settings: {0}")]
    Settings(#[from] EditError),
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {code:?}: {message}")]
    Failed {
        program: String,
        code: Option<i32>,
        message: String,
    },
    #[error("export cancelled")]
    Cancelled,
    #[error("i/o error during export: {0}")]
    Io(#[from] std::io::Error),
}
