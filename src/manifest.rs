//! In-memory description of the generated Next.js project.
//!
//! Static file contents are embedded at compile time from the `skeleton/` directory, the
//! package descriptor and readme are assembled from the [`TemplateVariables`].
use crate::variables::TemplateVariables;
use indexmap::IndexMap;
use serde_json::json;
use std::path::PathBuf;

/// Marker written inside directories that would otherwise be empty.
pub const PLACEHOLDER_FILE_NAME: &str = ".gitkeep";
/// Directory for static public assets, created without a placeholder.
pub const PUBLIC_DIR: &str = "public";

pub const PACKAGE_JSON: &str = "package.json";
pub const README: &str = "README.md";

const STATIC_FILES: &[(&str, &str)] = &[
    ("tsconfig.json", include_str!("../skeleton/tsconfig.json")),
    ("next.config.ts", include_str!("../skeleton/next.config.ts")),
    ("eslint.config.mjs", include_str!("../skeleton/eslint.config.mjs")),
    ("next-env.d.ts", include_str!("../skeleton/next-env.d.ts")),
    (".gitignore", include_str!("../skeleton/gitignore")),
    (".env.example", include_str!("../skeleton/env.example")),
    (
        "src/app/globals.css",
        include_str!("../skeleton/src/app/globals.css"),
    ),
    (
        "src/app/layout.tsx",
        include_str!("../skeleton/src/app/layout.tsx"),
    ),
    ("src/app/page.tsx", include_str!("../skeleton/src/app/page.tsx")),
    (
        "src/app/providers.tsx",
        include_str!("../skeleton/src/app/providers.tsx"),
    ),
    (
        "src/app/(auth)/login/page.tsx",
        include_str!("../skeleton/src/app/(auth)/login/page.tsx"),
    ),
    (
        "src/middleware.ts",
        include_str!("../skeleton/src/middleware.ts"),
    ),
    (
        "src/shared/lib/api-client.ts",
        include_str!("../skeleton/src/shared/lib/api-client.ts"),
    ),
    (
        "src/shared/lib/query-client.ts",
        include_str!("../skeleton/src/shared/lib/query-client.ts"),
    ),
    (
        "src/features/auth/api/auth.api.ts",
        include_str!("../skeleton/src/features/auth/api/auth.api.ts"),
    ),
    (
        "src/features/auth/services/auth.service.ts",
        include_str!("../skeleton/src/features/auth/services/auth.service.ts"),
    ),
    (
        "src/features/auth/validations/auth.schema.ts",
        include_str!("../skeleton/src/features/auth/validations/auth.schema.ts"),
    ),
    (
        "src/features/auth/types/auth.types.ts",
        include_str!("../skeleton/src/features/auth/types/auth.types.ts"),
    ),
    (
        "src/features/auth/hooks/use-login.ts",
        include_str!("../skeleton/src/features/auth/hooks/use-login.ts"),
    ),
    (
        "src/features/auth/components/login-form.tsx",
        include_str!("../skeleton/src/features/auth/components/login-form.tsx"),
    ),
    (
        "src/features/auth/index.ts",
        include_str!("../skeleton/src/features/auth/index.ts"),
    ),
];

const EMPTY_DIRS: &[&str] = &["src/shared/constants", "src/stores", "src/tests/e2e"];

/// A file to be written, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub content: String,
}

/// Every file and empty directory that makes up a generated project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStructure {
    /// Unique by path, ordered for display.
    pub files: Vec<FileEntry>,
    pub empty_dirs: Vec<PathBuf>,
}
impl ProjectStructure {
    pub fn file(&self, path: &str) -> Option<&FileEntry> {
        self.files.iter().find(|entry| entry.path == PathBuf::from(path))
    }
}

/// Builds the full project manifest for the given variables.
///
/// Pure: no filesystem access, and identical variables always produce identical output.
pub fn get_project_structure(variables: &TemplateVariables) -> ProjectStructure {
    // keyed by path to keep entries unique and in insertion order
    let mut files: IndexMap<PathBuf, String> = IndexMap::new();

    files.insert(PathBuf::from(PACKAGE_JSON), package_json(variables));
    files.insert(PathBuf::from(README), readme(variables));

    for (path, content) in STATIC_FILES {
        files.insert(PathBuf::from(path), content.to_string());
    }

    ProjectStructure {
        files: files
            .into_iter()
            .map(|(path, content)| FileEntry { path, content })
            .collect(),
        empty_dirs: EMPTY_DIRS.iter().map(PathBuf::from).collect(),
    }
}

fn package_json(variables: &TemplateVariables) -> String {
    let pm = variables.package_manager;

    let manifest = json!({
        "name": variables.project_name.as_str(),
        "version": "0.1.0",
        "private": true,
        "scripts": {
            "dev": "next dev --turbopack",
            "build": "next build",
            "start": "next start",
            "lint": "next lint",
            "typecheck": "tsc --noEmit",
            "test:e2e": "playwright test",
            "check": format!("{} && {}", pm.run_script("lint"), pm.run_script("typecheck")),
        },
        "dependencies": {
            "@tanstack/react-query": "^5.62.0",
            "next": "15.1.0",
            "react": "^19.0.0",
            "react-dom": "^19.0.0",
            "zod": "^3.24.1",
        },
        "devDependencies": {
            "@eslint/eslintrc": "^3",
            "@playwright/test": "^1.49.1",
            "@types/node": "^20",
            "@types/react": "^19",
            "@types/react-dom": "^19",
            "eslint": "^9",
            "eslint-config-next": "15.1.0",
            "typescript": "^5",
        },
    });

    // alternate formatting pretty-prints the value
    format!("{:#}\n", manifest)
}

fn readme(variables: &TemplateVariables) -> String {
    let name = variables.project_name.as_str();
    let pm = variables.package_manager;

    format!(
        r#"# {name}

A Next.js application using the App Router, TypeScript and a feature-sliced layout.

## Getting started

Install dependencies:

```bash
{install}
```

Copy the environment template and point it at your backend:

```bash
cp .env.example .env.local
```

Start the development server:

```bash
{run}
```

Open [http://localhost:3000](http://localhost:3000) in your browser.

## Scripts

| Command | Description |
| --- | --- |
| `{run}` | Start the development server |
| `{build}` | Build for production |
| `{lint}` | Lint the project |
| `{check}` | Lint and typecheck |
| `{e2e}` | Run end-to-end tests |

Before running end-to-end tests for the first time, install the browsers:

```bash
{exec} playwright install
```

## Environment

| Variable | Description |
| --- | --- |
| `NEXT_PUBLIC_API_URL` | Base URL of the backend API, proxied under `/api` |
| `AUTH_COOKIE_NAME` | Name of the session cookie checked by the middleware (default `session`) |

## Project structure

```
src/
├── app/                 routes, layouts and providers
├── features/            one folder per feature
│   └── auth/
│       ├── api/         HTTP calls
│       ├── components/  UI
│       ├── hooks/       React Query hooks
│       ├── services/    business logic
│       ├── types/       TypeScript types
│       └── validations/ zod schemas
├── shared/
│   ├── constants/
│   └── lib/             api client, query client
├── stores/              client state
├── tests/
│   └── e2e/
└── middleware.ts        route protection
```

New features follow the same layout as `src/features/auth`.
"#,
        name = name,
        install = pm.install_command(),
        run = pm.run_command(),
        build = pm.run_script("build"),
        lint = pm.run_script("lint"),
        check = pm.run_script("check"),
        e2e = pm.run_script("test:e2e"),
        exec = pm.exec_command(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::{PackageManager, ProjectName};
    use std::collections::HashSet;

    fn variables(name: &str, pm: PackageManager) -> TemplateVariables {
        TemplateVariables::new(ProjectName::parse(name).unwrap(), pm)
    }

    #[test]
    fn test_package_json_embeds_project_name() {
        let structure = get_project_structure(&variables("demo-app", PackageManager::Pnpm));
        let entry = structure.file(PACKAGE_JSON).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&entry.content).unwrap();

        assert_eq!(parsed["name"], "demo-app");
        assert_eq!(parsed["scripts"]["check"], "pnpm lint && pnpm typecheck");
    }

    #[test]
    fn test_readme_contains_package_manager_commands() {
        for pm in PackageManager::ALL {
            let structure = get_project_structure(&variables("demo-app", pm));
            let readme = &structure.file(README).unwrap().content;

            assert!(readme.starts_with("# demo-app\n"));
            assert!(readme.contains(&pm.install_command()));
            assert!(readme.contains(&pm.run_command()));
            assert!(readme.contains(&format!("{} playwright install", pm.exec_command())));
        }
    }

    #[test]
    fn test_structure_is_deterministic() {
        let vars = variables("demo-app", PackageManager::Yarn);

        assert_eq!(get_project_structure(&vars), get_project_structure(&vars));
    }

    #[test]
    fn test_paths_are_unique_and_relative() {
        let structure = get_project_structure(&variables("demo-app", PackageManager::Npm));
        let mut seen = HashSet::new();

        for entry in &structure.files {
            assert!(entry.path.is_relative(), "{}", entry.path.display());
            assert!(seen.insert(entry.path.clone()), "{}", entry.path.display());
        }
        assert_eq!(structure.files.len(), STATIC_FILES.len() + 2);
        assert!(STATIC_FILES
            .iter()
            .all(|(path, _)| *path != PACKAGE_JSON && *path != README));
    }

    #[test]
    fn test_empty_dirs() {
        let structure = get_project_structure(&variables("demo-app", PackageManager::Bun));

        assert_eq!(
            structure.empty_dirs,
            vec![
                PathBuf::from("src/shared/constants"),
                PathBuf::from("src/stores"),
                PathBuf::from("src/tests/e2e"),
            ]
        );
    }

    #[test]
    fn test_feature_module_is_complete() {
        let structure = get_project_structure(&variables("demo-app", PackageManager::Npm));

        for layer in [
            "api/auth.api.ts",
            "services/auth.service.ts",
            "validations/auth.schema.ts",
            "types/auth.types.ts",
            "hooks/use-login.ts",
            "components/login-form.tsx",
        ] {
            let path = format!("src/features/auth/{}", layer);
            assert!(structure.file(&path).is_some(), "missing {}", path);
        }
    }

    #[test]
    fn test_generated_config_reads_environment() {
        let structure = get_project_structure(&variables("demo-app", PackageManager::Npm));

        let next_config = &structure.file("next.config.ts").unwrap().content;
        assert!(next_config.contains("process.env.NEXT_PUBLIC_API_URL"));

        let middleware = &structure.file("src/middleware.ts").unwrap().content;
        assert!(middleware.contains("process.env.AUTH_COOKIE_NAME"));
        assert!(middleware.contains("PUBLIC_ROUTES"));
    }

    #[test]
    fn test_no_placeholder_tokens_in_manifest() {
        let structure = get_project_structure(&variables("demo-app", PackageManager::Pnpm));

        for entry in &structure.files {
            assert!(!entry.content.contains("{{PROJECT_NAME}}"));
            assert!(!entry.content.contains("{{PACKAGE_MANAGER}}"));
        }
    }
}
