//! Project Scaffolding
//!
//! Copies the starter template into a new project directory.
//!
//! # Rules
//!
//! - The target may be the current directory. If it is not empty a warning
//!   is logged and existing files may be overwritten.
//! - Any other existing target is refused.
//! - A directory created by this run is removed again if the template is
//!   missing or the copy fails. A pre-existing directory is never removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while scaffolding a project.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("directory \"{0}\" already exists")]
    AlreadyExists(PathBuf),

    #[error("template directory not found at {0}")]
    TemplateMissing(PathBuf),

    #[error("failed to inspect {path}: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a successful scaffold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    /// Absolute path of the project.
    pub target: PathBuf,
    /// Last path component, used in messages.
    pub name: String,
    /// The project was scaffolded into the working directory itself.
    pub in_current_dir: bool,
    pub files_copied: usize,
}

impl Scaffold {
    /// Instructions printed after a successful run.
    pub fn next_steps(&self) -> String {
        let mut out = format!("Success! Your Unreacted project \"{}\" is ready.\n\nTo get started:\n", self.name);
        if !self.in_current_dir {
            out.push_str(&format!("  cd {}\n", self.name));
        }
        out.push_str("  Build the project:\n    cargo build\n");
        out.push_str("  Run the starter app:\n    cargo run\n");
        out
    }
}

/// Scaffold `project` (relative to `cwd` unless absolute) from `template`.
pub fn scaffold(project: &Path, template: &Path, cwd: &Path) -> Result<Scaffold, ScaffoldError> {
    let target = if project.is_absolute() {
        project.to_path_buf()
    } else {
        cwd.join(project)
    };
    let in_current_dir = same_directory(&target, cwd);
    let name = target
        .canonicalize()
        .unwrap_or_else(|_| target.clone())
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| project.display().to_string());

    let mut created = false;
    if target.exists() {
        if !in_current_dir {
            return Err(ScaffoldError::AlreadyExists(project.to_path_buf()));
        }
        let mut entries = fs::read_dir(&target).map_err(|source| ScaffoldError::Inspect {
            path: target.clone(),
            source,
        })?;
        if entries.next().is_some() {
            warn!(directory = %name, "target directory is not empty; files may be overwritten");
        }
    } else {
        fs::create_dir_all(&target).map_err(|source| ScaffoldError::CreateDir {
            path: target.clone(),
            source,
        })?;
        created = true;
        info!(directory = %name, "created directory");
    }

    let result = if template.is_dir() {
        copy_dir(template, &target)
    } else {
        Err(ScaffoldError::TemplateMissing(template.to_path_buf()))
    };

    match result {
        Ok(files_copied) => {
            info!(files = files_copied, "copied template files");
            Ok(Scaffold {
                target,
                name,
                in_current_dir,
                files_copied,
            })
        }
        Err(err) => {
            if created {
                warn!(path = %target.display(), "cleaning up");
                if let Err(cleanup) = fs::remove_dir_all(&target) {
                    warn!(path = %target.display(), error = %cleanup, "failed to remove project directory");
                }
            }
            Err(err)
        }
    }
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Recursively copy `from` into `to`, overwriting files. Returns the number
/// of files copied.
fn copy_dir(from: &Path, to: &Path) -> Result<usize, ScaffoldError> {
    let copy_error = |source: io::Error| ScaffoldError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    fs::create_dir_all(to).map_err(copy_error)?;
    let mut copied = 0;
    for entry in fs::read_dir(from).map_err(copy_error)? {
        let entry = entry.map_err(copy_error)?;
        let source = entry.path();
        let destination = to.join(entry.file_name());
        if entry.file_type().map_err(copy_error)?.is_dir() {
            copied += copy_dir(&source, &destination)?;
        } else {
            fs::copy(&source, &destination).map_err(|err| ScaffoldError::Copy {
                from: source.clone(),
                to: destination.clone(),
                source: err,
            })?;
            debug!(file = %destination.display(), "copied");
            copied += 1;
        }
    }
    Ok(copied)
}
