use crate::{
    errors::{FileOperation, IoError},
    manifest::{get_project_structure, PLACEHOLDER_FILE_NAME, PUBLIC_DIR},
    variables::TemplateVariables,
};
use colored::Colorize;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Error, Diagnostic)]
pub enum MaterializeError {
    #[error("I/O error while materializing project")]
    #[diagnostic(code(nextstrap::materialize::io))]
    Io(#[from] IoError),

    #[error("unable to strip prefix from directory")]
    #[diagnostic(code(nextstrap::materialize::strip_prefix))]
    StripPrefix {
        path: PathBuf,
        dir: PathBuf,
        source: std::path::StripPrefixError,
    },
}

/// Directory names never copied out of an external template: installed dependencies,
/// version control metadata and build output.
pub const EXCLUDED_DIRS: [&str; 3] = ["node_modules", ".git", ".next"];

/// How the project tree gets produced. Chosen once, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Recursively copy an existing template directory.
    CopyTemplate(PathBuf),
    /// Write the built-in manifest.
    Manifest,
}
impl Strategy {
    pub fn select(template_dir: Option<&Path>) -> Self {
        match template_dir {
            Some(dir) if dir.is_dir() => Self::CopyTemplate(dir.to_path_buf()),
            Some(dir) => {
                log::warn!(
                    "template directory '{}' does not exist, using built-in skeleton",
                    dir.display()
                );
                Self::Manifest
            }
            None => Self::Manifest,
        }
    }
}

/// An entry that materialization would create, relative to the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub path: PathBuf,
    pub is_file: bool,
}

/// Creates the project tree under `target` and returns the strategy that was used.
///
/// `target` is created if absent and used as-is otherwise. Errors abort immediately and
/// leave whatever was already written in place.
pub fn materialize(
    template_dir: Option<&Path>,
    target: &Path,
    variables: &TemplateVariables,
) -> Result<Strategy, MaterializeError> {
    let strategy = Strategy::select(template_dir);

    materialize_with(&strategy, target, variables)?;

    Ok(strategy)
}

pub fn materialize_with(
    strategy: &Strategy,
    target: &Path,
    variables: &TemplateVariables,
) -> Result<(), MaterializeError> {
    log::debug!("materializing {} with {:?}", target.display(), strategy);

    create_directory(target)?;

    match strategy {
        Strategy::CopyTemplate(source) => copy_template(source, target),
        Strategy::Manifest => write_manifest(target, variables),
    }
}

/// Lists what [`materialize_with`] would create, without touching the target.
pub fn plan(
    strategy: &Strategy,
    variables: &TemplateVariables,
) -> Result<Vec<PlannedEntry>, MaterializeError> {
    match strategy {
        Strategy::CopyTemplate(source) => {
            let mut entries = Vec::new();

            for entry in walk_template(source) {
                let entry = map_walk_error(entry)?;
                let relative = relative_path(entry.path(), source)?;

                if relative.as_os_str().is_empty() {
                    continue;
                }

                entries.push(PlannedEntry {
                    path: relative.to_path_buf(),
                    is_file: !entry.file_type().is_dir(),
                });
            }

            Ok(entries)
        }
        Strategy::Manifest => {
            let structure = get_project_structure(variables);

            let mut entries = Vec::new();
            for dir in &structure.empty_dirs {
                entries.push(PlannedEntry {
                    path: dir.clone(),
                    is_file: false,
                });
                entries.push(PlannedEntry {
                    path: dir.join(PLACEHOLDER_FILE_NAME),
                    is_file: true,
                });
            }
            entries.push(PlannedEntry {
                path: PathBuf::from(PUBLIC_DIR),
                is_file: false,
            });
            for file in structure.files {
                entries.push(PlannedEntry {
                    path: file.path,
                    is_file: true,
                });
            }

            Ok(entries)
        }
    }
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && EXCLUDED_DIRS
            .iter()
            .any(|excluded| entry.file_name() == *excluded)
}

/// Walks the template, pruning excluded directories together with everything below them.
fn walk_template(source: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let excluded = is_excluded(entry);
            if excluded {
                log::debug!("skipping excluded path: {}", entry.path().display());
            }
            !excluded
        })
}

fn map_walk_error(entry: walkdir::Result<DirEntry>) -> Result<DirEntry, MaterializeError> {
    entry.map_err(|error| {
        let path = error.path().unwrap_or_else(|| Path::new("")).to_path_buf();

        IoError::new(FileOperation::Walk, path, error.into()).into()
    })
}

fn relative_path<'a>(path: &'a Path, dir: &Path) -> Result<&'a Path, MaterializeError> {
    path.strip_prefix(dir).map_err(|error| MaterializeError::StripPrefix {
        path: path.to_path_buf(),
        dir: dir.to_path_buf(),
        source: error,
    })
}

fn copy_template(source: &Path, target: &Path) -> Result<(), MaterializeError> {
    for entry in walk_template(source) {
        let entry = map_walk_error(entry)?;
        let relative = relative_path(entry.path(), source)?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            create_directory(&destination)?;
        } else {
            copy_file(entry.path(), &destination)?;
        }
    }

    Ok(())
}

fn write_manifest(target: &Path, variables: &TemplateVariables) -> Result<(), MaterializeError> {
    let structure = get_project_structure(variables);

    for dir in &structure.empty_dirs {
        let path = target.join(dir);

        create_directory(&path)?;
        write_file(&path.join(PLACEHOLDER_FILE_NAME), "")?;
    }

    create_directory(&target.join(PUBLIC_DIR))?;

    for file in &structure.files {
        let path = target.join(&file.path);

        if let Some(parent) = path.parent() {
            create_directory(parent)?;
        }

        write_file(&path, &file.content)?;
    }

    Ok(())
}

/// Creates all directories in the specified path if they do not exist.
fn create_directory(path: &Path) -> Result<(), MaterializeError> {
    std::fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.into(), error))?;

    Ok(())
}

/// Writes a file with the provided contents, replacing any existing file.
fn write_file(path: &Path, contents: &str) -> Result<(), MaterializeError> {
    std::fs::write(path, contents)
        .map_err(|error| IoError::new(FileOperation::Write, path.into(), error))?;

    println!("{} {}", "create".green(), path.display());

    Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<(), MaterializeError> {
    if let Some(parent) = to.parent() {
        create_directory(parent)?;
    }

    std::fs::copy(from, to)
        .map_err(|error| IoError::new(FileOperation::Copy, from.into(), error))?;

    println!("{} {}", "copy".cyan(), to.display());

    Ok(())
}
