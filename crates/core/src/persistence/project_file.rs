use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::editing::domain::project::Project;

/// Conventional extension for saved projects.
pub const PROJECT_EXTENSION: &str = "talkcut.json";

#[derive(Error, Debug)]
pub enum ProjectFileError {
    #[error("failed to read project {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write project {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid project file: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize project for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn to_json(project: &Project) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(project)
}

/// Parses a project and restores the start-order invariant of its units.
pub fn from_json(json: &str) -> Result<Project, serde_json::Error> {
    let mut project: Project = serde_json::from_str(json)?;
    if !project.segments.is_sorted() {
        log::warn!("project units were out of order; sorting by start time");
        project.segments.sort_by_start();
    }
    Ok(project)
}

/// Writes the whole project, creating parent directories as needed.
pub fn save(project: &Project, path: &Path) -> Result<(), ProjectFileError> {
    let json = to_json(project).map_err(|source| ProjectFileError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    let write_err = |source| ProjectFileError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)?;
    log::debug!("saved project to {}", path.display());
    Ok(())
}

pub fn load(path: &Path) -> Result<Project, ProjectFileError> {
    let json = fs::read_to_string(path).map_err(|source| ProjectFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&json).map_err(|source| ProjectFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
