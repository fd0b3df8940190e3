use crate::{
    errors::{FileOperation, IoError},
    manifest::{PACKAGE_JSON, README},
    variables::TemplateVariables,
};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SubstituteError {
    #[error("I/O error while substituting template variables")]
    #[diagnostic(code(nextstrap::substitute::io))]
    Io(#[from] IoError),
}

pub const PROJECT_NAME_TOKEN: &str = "{{PROJECT_NAME}}";
pub const PACKAGE_MANAGER_TOKEN: &str = "{{PACKAGE_MANAGER}}";

/// Files, relative to the project root, that may carry placeholder tokens.
pub const SUBSTITUTED_FILES: [&str; 2] = [PACKAGE_JSON, README];

/// Result of a substitution pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    pub rewritten: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
}

/// Replaces every placeholder token in the well-known files under `target`.
///
/// Files that do not exist are skipped and reported in [`Substitution::missing`].
pub fn substitute(
    target: &Path,
    variables: &TemplateVariables,
) -> Result<Substitution, SubstituteError> {
    let mut substitution = Substitution::default();

    for relative in SUBSTITUTED_FILES {
        let path = target.join(relative);

        if !path.is_file() {
            log::debug!("nothing to substitute, missing: {}", path.display());
            substitution.missing.push(path);
            continue;
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|error| IoError::new(FileOperation::Read, path.clone(), error))?;

        let replaced = replace_tokens(&content, variables);

        std::fs::write(&path, replaced)
            .map_err(|error| IoError::new(FileOperation::Write, path.clone(), error))?;

        log::debug!("substituted variables in {}", path.display());
        substitution.rewritten.push(path);
    }

    Ok(substitution)
}

pub fn replace_tokens(content: &str, variables: &TemplateVariables) -> String {
    content
        .replace(PROJECT_NAME_TOKEN, variables.project_name.as_str())
        .replace(PACKAGE_MANAGER_TOKEN, variables.package_manager.as_str())
}
