use crate::errors::{FileOperation, IoError};
use git2::Repository;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum SourceError {
    #[error("I/O error within source domain")]
    #[diagnostic(code(nextstrap::source::io))]
    Io(#[from] IoError),

    #[error("unable to clone repo at: '{url}': {source}")]
    #[diagnostic(
        code(nextstrap::source::git_clone),
        help("Make sure that username and project name are correct")
    )]
    GitClone {
        url: String,
        path: PathBuf,
        source: git2::Error,
    },

    #[error("invalid git prefix provided: {url}")]
    #[diagnostic(
        code(nextstrap::source::invalid_git_prefix),
        help("Valid git prefix are: ['gh:', 'gl:', 'git@', 'git+https://']")
    )]
    InvalidGitPrefix { url: String },
}

/// Where an external template directory comes from.
#[derive(Debug)]
pub enum TemplateSource {
    Local(PathBuf),
    /// A fresh clone. The checkout is deleted when this value is dropped.
    Git { url: String, checkout: TempDir },
}
impl TemplateSource {
    fn is_git(source: &str) -> bool {
        lazy_static::lazy_static! {
            static ref GIT_URL_REGEX: regex::Regex = regex::Regex::new(
                r"(?x)        # Enable extended mode
                ^(?:
                    # 1) gh:account/repo
                    gh:[^/]+/[^/]+
                    |
                    # 2) gl:account/repo
                    gl:[^/]+/[^/]+
                    |
                    # 3) git@host:account/repo.git
                    git@[A-Za-z0-9._-]+:[^/]+/[^/]+\.git
                    |
                    # 4) git+http(s)://...
                    git\+https?://.*
                )$"
            ).expect("a valid regex pattern");
        }

        GIT_URL_REGEX.is_match(source)
    }

    fn expand_git_url(url: &str) -> Result<String, SourceError> {
        if let Some(stripped) = url.strip_prefix("gh:") {
            Ok(format!("https://github.com/{}.git", stripped))
        } else if let Some(stripped) = url.strip_prefix("gl:") {
            Ok(format!("https://gitlab.com/{}.git", stripped))
        } else if let Some(stripped) = url.strip_prefix("git+") {
            Ok(stripped.to_string())
        } else if url.starts_with("git@") {
            Ok(url.to_string())
        } else {
            Err(SourceError::InvalidGitPrefix {
                url: url.to_string(),
            })
        }
    }

    /// Resolves a template reference, cloning it first when it points at a git repository.
    pub fn resolve(source: &str) -> Result<Self, SourceError> {
        if !TemplateSource::is_git(source) {
            log::debug!("using local template: {}", source);

            return Ok(Self::Local(PathBuf::from(source)));
        }

        let checkout = tempfile::tempdir()
            .map_err(|error| IoError::new(FileOperation::Mkdir, std::env::temp_dir(), error))?;

        let url = TemplateSource::expand_git_url(source)?;

        log::debug!("cloning {} into {}", url, checkout.path().display());

        Repository::clone(&url, checkout.path()).map_err(|err| SourceError::GitClone {
            url: url.clone(),
            path: checkout.path().to_path_buf(),
            source: err,
        })?;

        Ok(Self::Git { url, checkout })
    }

    pub fn directory(&self) -> &Path {
        match self {
            Self::Local(path) => path,
            Self::Git { checkout, .. } => checkout.path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_git() {
        assert!(TemplateSource::is_git("gh:vercel/next.js"));
        assert!(TemplateSource::is_git("gl:group/project"));
        assert!(TemplateSource::is_git("git@github.com:account/repo.git"));
        assert!(TemplateSource::is_git("git+https://example.com/repo.git"));
        assert!(!TemplateSource::is_git("./templates/next"));
        assert!(!TemplateSource::is_git("/tmp/template"));
        assert!(!TemplateSource::is_git("https://github.com/account/repo"));
    }

    #[test]
    fn test_expand_git_url() {
        assert_eq!(
            TemplateSource::expand_git_url("gh:account/repo").unwrap(),
            "https://github.com/account/repo.git"
        );
        assert_eq!(
            TemplateSource::expand_git_url("gl:account/repo").unwrap(),
            "https://gitlab.com/account/repo.git"
        );
        assert_eq!(
            TemplateSource::expand_git_url("git+https://example.com/r.git").unwrap(),
            "https://example.com/r.git"
        );
        assert_eq!(
            TemplateSource::expand_git_url("git@github.com:a/r.git").unwrap(),
            "git@github.com:a/r.git"
        );
        assert!(matches!(
            TemplateSource::expand_git_url("svn:account/repo"),
            Err(SourceError::InvalidGitPrefix { .. })
        ));
    }

    #[test]
    fn test_resolve_local() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().to_string_lossy().to_string();

        let source = TemplateSource::resolve(&reference).unwrap();

        assert_eq!(source.directory(), dir.path());
    }
}
