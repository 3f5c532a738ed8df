//! Request path to file resolution
//!
//! Every request opens and reads its file independently. Nothing is cached
//! and the whole file is buffered before the response is built.

use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

/// Result of looking up a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    /// Full content of a regular file
    Found(Bytes),
    /// Missing, not a regular file, unreadable, or outside the root
    NotFound,
}

/// Resolves request paths against a document root.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the file named by `path` relative to the root.
    ///
    /// All failure causes collapse into `NotFound`; the reason is only logged.
    pub async fn resolve(&self, path: &str) -> ResourceOutcome {
        let Some(relative) = confine(path) else {
            tracing::debug!(path = %path, "Rejected path escaping document root");
            return ResourceOutcome::NotFound;
        };
        let Some(full) = self.canonical_within_root(&self.root.join(relative)).await else {
            return ResourceOutcome::NotFound;
        };

        match tokio::fs::metadata(&full).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                tracing::debug!(path = %full.display(), "Not a regular file");
                return ResourceOutcome::NotFound;
            }
            Err(e) => {
                tracing::debug!(path = %full.display(), error = %e, "Stat failed");
                return ResourceOutcome::NotFound;
            }
        }

        match tokio::fs::read(&full).await {
            Ok(content) => ResourceOutcome::Found(Bytes::from(content)),
            Err(e) => {
                tracing::debug!(path = %full.display(), error = %e, "Read failed");
                ResourceOutcome::NotFound
            }
        }
    }

    /// Resolves symlinks in `candidate` and checks the target still lies
    /// under the canonical root.
    async fn canonical_within_root(&self, candidate: &Path) -> Option<PathBuf> {
        let root = match tokio::fs::canonicalize(&self.root).await {
            Ok(root) => root,
            Err(e) => {
                tracing::debug!(root = %self.root.display(), error = %e, "Cannot canonicalize root");
                return None;
            }
        };
        let target = match tokio::fs::canonicalize(candidate).await {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!(path = %candidate.display(), error = %e, "Cannot canonicalize path");
                return None;
            }
        };

        if !target.starts_with(&root) {
            tracing::debug!(
                path = %candidate.display(),
                target = %target.display(),
                "Symlink leads outside document root"
            );
            return None;
        }
        Some(target)
    }
}

/// Keeps only normal path segments. Returns `None` for anything that could
/// leave the root: `..`, an absolute path, or a drive prefix.
fn confine(path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}
