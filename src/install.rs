use crate::variables::PackageManager;
use miette::Diagnostic;
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, ExitStatus},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum InstallError {
    #[error("'{program}' was not found on PATH")]
    #[diagnostic(
        code(nextstrap::install::not_found),
        help("Install {program} or pick another package manager with --package-manager")
    )]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to start '{command}'")]
    #[diagnostic(code(nextstrap::install::spawn))]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}")]
    #[diagnostic(code(nextstrap::install::failed))]
    Failed { command: String, status: ExitStatus },
}

/// Runs the package manager's install command inside `target`, streaming its output.
pub fn install_dependencies(
    target: &Path,
    package_manager: PackageManager,
) -> Result<(), InstallError> {
    install_from_path(target, package_manager, std::env::var_os("PATH"))
}

/// Same as [`install_dependencies`], looking the executable up in `search_path`.
fn install_from_path(
    target: &Path,
    package_manager: PackageManager,
    search_path: Option<OsString>,
) -> Result<(), InstallError> {
    let program = package_manager.as_str();
    let command = package_manager.install_command();

    let executable =
        which::which_in(program, search_path, target).map_err(|err| InstallError::NotFound {
            program: program.to_string(),
            source: err,
        })?;

    log::debug!(
        "running '{}' ({}) in {}",
        command,
        executable.display(),
        target.display()
    );

    let status = Command::new(&executable)
        .arg("install")
        .current_dir(target)
        .status()
        .map_err(|err| InstallError::Spawn {
            command: command.clone(),
            source: err,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(InstallError::Failed { command, status })
    }
}
