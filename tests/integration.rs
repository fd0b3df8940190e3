// Drives the nextstrap binary end to end inside temporary working directories.
use std::{fs, path::Path};

fn nextstrap(working_dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("nextstrap").unwrap();

    cmd.current_dir(working_dir).env_remove("NEXTSTRAP_CONFIG");

    cmd
}

#[test]
fn create_project_non_interactively() {
    let dir = tempfile::tempdir().unwrap();

    nextstrap(dir.path())
        .args(["demo-app", "-p", "pnpm", "--yes", "--skip-install"])
        .assert()
        .success()
        .stdout(predicates::str::contains("pnpm dev"));

    let target = dir.path().join("demo-app");
    let package = fs::read_to_string(target.join("package.json")).unwrap();
    let readme = fs::read_to_string(target.join("README.md")).unwrap();

    assert!(package.contains("\"name\": \"demo-app\""));
    assert!(readme.contains("pnpm install"));
    assert!(target.join("src/stores/.gitkeep").is_file());
    assert!(target.join("public").is_dir());
}

#[test]
fn unknown_package_manager_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    nextstrap(dir.path())
        .args(["demo-app", "--package-manager", "cargo", "-y", "--skip-install"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown package manager"));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn dry_run_previews_without_writing() {
    let dir = tempfile::tempdir().unwrap();

    nextstrap(dir.path())
        .args(["demo-app", "-y", "--dry-run"])
        .assert()
        .success()
        .stdout(predicates::str::contains("package.json"))
        .stdout(predicates::str::contains("middleware.ts"));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn settings_file_provides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("nextstrap.toml");
    fs::write(
        &settings,
        "package_manager = \"yarn\"\nproject_name = \"from-config\"\ninstall = false\n",
    )
    .unwrap();

    nextstrap(dir.path())
        .arg("--config")
        .arg(&settings)
        .arg("-y")
        .assert()
        .success();

    let readme = fs::read_to_string(dir.path().join("from-config").join("README.md")).unwrap();
    assert!(readme.contains("yarn install"));
}

#[test]
fn copy_external_template() {
    let template = tempfile::tempdir().unwrap();
    fs::write(
        template.path().join("package.json"),
        "{ \"name\": \"{{PROJECT_NAME}}\" }\n",
    )
    .unwrap();
    fs::create_dir_all(template.path().join(".next").join("cache")).unwrap();
    fs::write(template.path().join(".next").join("cache").join("x"), "").unwrap();

    let dir = tempfile::tempdir().unwrap();

    nextstrap(dir.path())
        .args(["shop", "-y", "--skip-install", "--template"])
        .arg(template.path())
        .assert()
        .success();

    let target = dir.path().join("shop");
    assert_eq!(
        fs::read_to_string(target.join("package.json")).unwrap(),
        "{ \"name\": \"shop\" }\n"
    );
    assert!(!target.join(".next").exists());
}

#[test]
fn failed_install_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();

    nextstrap(dir.path())
        .env("PATH", empty_path.path())
        .args(["demo-app", "-p", "npm", "-y"])
        .assert()
        .success()
        .stdout(predicates::str::contains("dependency installation failed"))
        .stdout(predicates::str::contains("cd demo-app && npm install"));

    assert!(dir.path().join("demo-app").join("package.json").is_file());
}
