use crate::{
    config::{self, Settings},
    errors::{FileOperation, IoError},
    install::{self, install_dependencies},
    materialize::{self, materialize_with, plan, Strategy},
    preview::preview_as_tree,
    prompt::{self, Prompter},
    source::{self, TemplateSource},
    substitute::{self, substitute},
    variables::{self, PackageManager, ProjectName, TemplateVariables},
};
use colored::Colorize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Project name used with `--yes` when none was supplied.
pub const DEFAULT_PROJECT_NAME: &str = "my-next-app";

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum NextstrapError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Variables(#[from] variables::VariablesError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] source::SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Materialize(#[from] materialize::MaterializeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Substitute(#[from] substitute::SubstituteError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] prompt::PromptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),

    #[error("template '{template}' overlaps target '{target}'")]
    #[diagnostic(
        code(nextstrap::api::template_overlaps_target),
        help("The template must live outside the project directory, and must not contain it")
    )]
    TemplateOverlapsTarget { template: PathBuf, target: PathBuf },

    #[error("target '{path}' exists and is not a directory")]
    #[diagnostic(
        code(nextstrap::api::target_is_file),
        help("Choose another project name or remove the file")
    )]
    TargetIsFile { path: PathBuf },
}

/// Everything the command line (or a caller) supplies for one run.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub project_name: Option<String>,
    pub package_manager: Option<String>,
    /// Local directory or git reference of an external template.
    pub template: Option<String>,
    /// Skip every prompt, overwriting an existing target.
    pub yes: bool,
    pub skip_install: bool,
    pub dry_run: bool,
    /// Directory the project directory is created in.
    pub working_dir: PathBuf,
    pub settings: Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Installed,
    Skipped,
    Failed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Created {
        target: PathBuf,
        variables: TemplateVariables,
        strategy: Strategy,
        install: InstallStatus,
    },
    Previewed {
        target: PathBuf,
    },
    /// The user declined to overwrite the existing target. Nothing was changed.
    Aborted,
}

/// Generates a project according to `options`, asking `prompter` for anything missing.
///
/// # Errors
///
/// Returns a [`NextstrapError`] if:
///
/// - The package manager or project name supplied up front is invalid.
/// - The settings file cannot be read or parsed.
/// - User prompts fail or the user cancels the input.
/// - A git template cannot be cloned.
/// - The template directory is, contains, or sits inside the target directory.
/// - A directory or file cannot be removed, created or written to.
///
/// A failing dependency installation is reported as a warning, not an error.
pub fn create_project(
    options: CreateOptions,
    prompter: &dyn Prompter,
) -> Result<Outcome, NextstrapError> {
    let variables = resolve_variables(&options, prompter)?;

    log::debug!("resolved variables: {:?}", variables);

    let template = options.template.or(options.settings.template);
    let install = !options.skip_install && options.settings.install.unwrap_or(true);
    let target = options.working_dir.join(variables.project_name.as_str());

    if target.exists() && !target.is_dir() {
        return Err(NextstrapError::TargetIsFile { path: target });
    }

    if options.dry_run {
        let (_source, strategy) = select_strategy(template.as_deref(), &target)?;

        preview_as_tree(&plan(&strategy, &variables)?, &target);

        return Ok(Outcome::Previewed { target });
    }

    let occupied = is_non_empty_dir(&target)?;

    if occupied && !options.yes && !prompter.confirm_overwrite(&target)? {
        println!("{}", "Operation cancelled, nothing was changed.".yellow());

        return Ok(Outcome::Aborted);
    }

    // resolved before removal so a failed clone or an overlapping template leaves the
    // existing directory alone
    let (_source, strategy) = select_strategy(template.as_deref(), &target)?;

    if occupied {
        log::debug!("removing existing directory {}", target.display());

        fs::remove_dir_all(&target)
            .map_err(|error| IoError::new(FileOperation::Remove, target.clone(), error))?;
    }

    println!(
        "Creating a new Next.js app in {}\n",
        target.display().to_string().cyan()
    );

    materialize_with(&strategy, &target, &variables)?;

    let substitution = substitute(&target, &variables)?;

    if let Strategy::CopyTemplate(template_dir) = &strategy {
        for missing in &substitution.missing {
            log::warn!(
                "template '{}' has no {}, placeholders were not substituted there",
                template_dir.display(),
                missing.display()
            );
            println!("{} {}", "skip".yellow(), missing.display());
        }
    }

    let install = if install {
        run_install(&target, &variables)
    } else {
        InstallStatus::Skipped
    };

    print_next_steps(&target, &variables, install);

    Ok(Outcome::Created {
        target,
        variables,
        strategy,
        install,
    })
}

/// Resolves the package manager then the project name.
///
/// Values given up front are validated before any prompt is shown, so a bad flag fails
/// without touching the filesystem.
fn resolve_variables(
    options: &CreateOptions,
    prompter: &dyn Prompter,
) -> Result<TemplateVariables, NextstrapError> {
    let package_manager = options
        .package_manager
        .as_deref()
        .or(options.settings.package_manager.as_deref())
        .map(str::parse::<PackageManager>)
        .transpose()?;

    let project_name = options
        .project_name
        .as_deref()
        .or(options.settings.project_name.as_deref())
        .map(ProjectName::parse)
        .transpose()?;

    let package_manager = match package_manager {
        Some(pm) => pm,
        None if options.yes => PackageManager::Npm,
        None => prompter.package_manager()?,
    };

    let project_name = match project_name {
        Some(name) => name,
        None if options.yes => ProjectName::parse(DEFAULT_PROJECT_NAME)?,
        None => prompter.project_name()?,
    };

    Ok(TemplateVariables::new(project_name, package_manager))
}

/// Resolves the template reference and picks the materialization strategy once.
///
/// The returned source owns any git checkout and must outlive materialization.
fn select_strategy(
    template: Option<&str>,
    target: &Path,
) -> Result<(Option<TemplateSource>, Strategy), NextstrapError> {
    let source = template.map(TemplateSource::resolve).transpose()?;
    let strategy = Strategy::select(source.as_ref().map(TemplateSource::directory));

    if let Strategy::CopyTemplate(template_dir) = &strategy {
        let template = resolve_path(template_dir)?;
        let target = resolve_path(target)?;

        if template.starts_with(&target) || target.starts_with(&template) {
            return Err(NextstrapError::TemplateOverlapsTarget { template, target });
        }
    }

    Ok((source, strategy))
}

/// Canonicalizes the longest existing ancestor of `path` and appends the rest.
fn resolve_path(path: &Path) -> Result<PathBuf, NextstrapError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|error| IoError::new(FileOperation::Read, PathBuf::from("."), error))?
            .join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = existing
        .canonicalize()
        .map_err(|error| IoError::new(FileOperation::Read, existing.to_path_buf(), error))?;
    for name in missing.iter().rev() {
        resolved.push(name);
    }

    Ok(resolved)
}

fn is_non_empty_dir(path: &Path) -> Result<bool, NextstrapError> {
    if !path.is_dir() {
        return Ok(false);
    }

    let mut entries = fs::read_dir(path)
        .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

    Ok(entries.next().is_some())
}

fn run_install(target: &Path, variables: &TemplateVariables) -> InstallStatus {
    let pm = variables.package_manager;

    println!(
        "\nInstalling dependencies with {}...\n",
        pm.as_str().cyan()
    );

    match install_dependencies(target, pm) {
        Ok(()) => InstallStatus::Installed,
        Err(error) => {
            log::warn!("dependency installation failed: {:?}", error);
            report_install_failure(&error, variables);
            InstallStatus::Failed
        }
    }
}

fn report_install_failure(error: &install::InstallError, variables: &TemplateVariables) {
    println!(
        "\n{} {}",
        "warning:".yellow().bold(),
        format!("dependency installation failed: {}", error).yellow()
    );
    println!("Install them manually with:\n");
    println!(
        "  cd {} && {}",
        variables.project_name,
        variables.package_manager.install_command()
    );
}

fn print_next_steps(target: &Path, variables: &TemplateVariables, install: InstallStatus) {
    let pm = variables.package_manager;

    println!(
        "\n{} Created {} at {}\n",
        "Success!".green().bold(),
        variables.project_name.as_str().bold(),
        target.display()
    );
    println!("Next steps:\n");
    println!("  cd {}", variables.project_name);
    if install != InstallStatus::Installed {
        println!("  {}", pm.install_command());
    }
    println!("  {}", pm.run_command());
    println!();
}
