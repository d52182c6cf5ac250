use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a project from loading at all.
///
/// Problems below the root build file never surface here; they become
/// diagnostics of the file that includes them.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("no meson.build found in {path}")]
    MissingBuildFile { path: PathBuf },
    #[error("{message}")]
    Unreadable {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{message}")]
    Parse {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl LoadError {
    pub(crate) fn unreadable(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Unreadable {
            message: meson_support::fs_error("read", &path.display().to_string(), &source),
            source,
        }
    }

    pub(crate) fn parse(path: &std::path::Path, source: anyhow::Error) -> Self {
        Self::Parse {
            message: meson_support::parse_error(&path.display().to_string(), format!("{source:#}")),
            source,
        }
    }
}
