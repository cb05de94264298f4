//! Virtual host resolution.
//!
//! Maps a request's `Host` and target onto a file below that host's
//! document root.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

const INDEX_FILE: &str = "index.html";

/// Reasons a request cannot be mapped to a file. Every variant is answered
/// with a 404.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown virtual host {0:?}")]
    UnknownHost(String),

    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is a directory", .0.display())]
    IsDirectory(PathBuf),

    #[error("stat {} failed: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Host name to document root table. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct VirtualHosts {
    roots: HashMap<String, PathBuf>,
}

impl VirtualHosts {
    pub fn new(roots: HashMap<String, PathBuf>) -> Self {
        Self { roots }
    }

    pub fn doc_root(&self, host: &str) -> Option<&Path> {
        self.roots.get(host).map(PathBuf::as_path)
    }

    /// Resolves `target` for `host`.
    ///
    /// A trailing `/` gets `index.html` appended before the first stat. If
    /// the path then turns out to be a directory, `/index.html` is appended
    /// once more and stat'ed again; there is no further fallback.
    pub async fn resolve(&self, host: &str, target: &str) -> Result<Resolved, ResolveError> {
        let root = self
            .doc_root(host)
            .ok_or_else(|| ResolveError::UnknownHost(host.to_string()))?;

        let mut url = target.to_string();
        if url.ends_with('/') {
            url.push_str(INDEX_FILE);
        }

        let mut path = contain(root, &url);
        let mut meta = stat(&path).await?;

        if meta.is_dir() {
            url.push('/');
            url.push_str(INDEX_FILE);
            path = contain(root, &url);
            meta = stat(&path).await?;

            if meta.is_dir() {
                return Err(ResolveError::IsDirectory(path));
            }
        }

        Ok(Resolved {
            path,
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        })
    }
}

/// Lexically cleans `url` as a rooted path and joins it below `root`.
///
/// Cleaning a rooted path drops every `..` that would climb above `/`, so
/// the result can never leave `root`.
pub fn contain(root: &Path, url: &str) -> PathBuf {
    let cleaned = path_clean::clean(Path::new("/").join(url));
    match cleaned.strip_prefix("/") {
        Ok(relative) => root.join(relative),
        Err(_) => root.to_path_buf(),
    }
}

async fn stat(path: &Path) -> Result<std::fs::Metadata, ResolveError> {
    tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ResolveError::NotFound(path.to_path_buf()),
        _ => ResolveError::Stat {
            path: path.to_path_buf(),
            source: e,
        },
    })
}
