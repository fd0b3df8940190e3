use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use nextstrap::{
    api::{create_project, CreateOptions},
    config::Settings,
    errors::{FileOperation, IoError},
    prompt::InteractivePrompter,
};
use std::path::{Path, PathBuf};

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("project-name").help("Name of the project directory to create"))
        .arg(
            Arg::new("package-manager")
                .short('p')
                .long("package-manager")
                .value_name("npm|pnpm|yarn|bun")
                .help("Package manager the project is configured for"),
        )
        .arg(
            Arg::new("yes")
                .short('y')
                .long("yes")
                .help("Skip all prompts, using defaults and overwriting an existing directory")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("DIR|GIT")
                .help("Copy an external template (local directory or git reference) instead of the built-in skeleton"),
        )
        .arg(
            Arg::new("skip-install")
                .long("skip-install")
                .help("Do not install dependencies after generating the project")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the project tree that would be generated and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Settings file providing default values"),
        )
        .get_matches();

    init_logger(matches.get_flag("verbose"));

    let options = handle_create(&matches)?;

    create_project(options, &InteractivePrompter)?;

    Ok(())
}

fn init_logger(is_verbose: bool) {
    let level = if is_verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn handle_create(args: &ArgMatches) -> miette::Result<CreateOptions> {
    let settings = Settings::load(args.get_one::<String>("config").map(Path::new))?;

    let working_dir = std::env::current_dir()
        .map_err(|error| IoError::new(FileOperation::Read, PathBuf::from("."), error))?;

    Ok(CreateOptions {
        project_name: args.get_one::<String>("project-name").cloned(),
        package_manager: args.get_one::<String>("package-manager").cloned(),
        template: args.get_one::<String>("template").cloned(),
        yes: args.get_flag("yes"),
        skip_install: args.get_flag("skip-install"),
        dry_run: args.get_flag("dry-run"),
        working_dir,
        settings,
    })
}
