use crate::variables::{PackageManager, ProjectName};
use inquire::{validator::Validation, Confirm, InquireError, Select, Text};
use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("Error occurred trying to prompt user: {0}")]
    #[diagnostic(
        code(nextstrap::prompt::inquire),
        help("Run with --yes and pass values as arguments when no terminal is available")
    )]
    Inquire(#[from] InquireError),
}

/// Source of answers for the values not supplied on the command line.
pub trait Prompter {
    fn package_manager(&self) -> Result<PackageManager, PromptError>;

    /// Must only return names that pass [`ProjectName::parse`].
    fn project_name(&self) -> Result<ProjectName, PromptError>;

    fn confirm_overwrite(&self, target: &Path) -> Result<bool, PromptError>;
}

/// Terminal prompts backed by `inquire`.
pub struct InteractivePrompter;
impl Prompter for InteractivePrompter {
    fn package_manager(&self) -> Result<PackageManager, PromptError> {
        let answer = Select::new(
            "Which package manager do you want to use?",
            PackageManager::ALL.to_vec(),
        )
        .prompt()?;

        Ok(answer)
    }

    fn project_name(&self) -> Result<ProjectName, PromptError> {
        loop {
            let answer = Text::new("What is your project named?")
                .with_help_message("letters, digits and hyphens only")
                .with_validator(|input: &str| match ProjectName::parse(input) {
                    Ok(_) => Ok(Validation::Valid),
                    Err(error) => Ok(Validation::Invalid(error.to_string().into())),
                })
                .prompt()?;

            // the validator already rejected bad input, this only guards the type
            if let Ok(name) = ProjectName::parse(&answer) {
                return Ok(name);
            }
        }
    }

    fn confirm_overwrite(&self, target: &Path) -> Result<bool, PromptError> {
        let answer = Confirm::new(&format!(
            "Directory '{}' already exists. Overwrite it?",
            target.display()
        ))
        .with_default(false)
        .prompt()?;

        Ok(answer)
    }
}
