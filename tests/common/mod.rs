#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vhttpd::http::vhost::VirtualHosts;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A throwaway document root, removed on drop.
pub struct DocRoot {
    pub path: PathBuf,
}

impl DocRoot {
    pub fn new(name: &str) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "vhttpd-test-{}-{}-{}",
            name,
            std::process::id(),
            id
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn file(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path.join(rel);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn root(&self) -> &Path {
        &self.path
    }
}

impl Drop for DocRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub fn hosts(entries: &[(&str, &DocRoot)]) -> Arc<VirtualHosts> {
    let roots: HashMap<String, PathBuf> = entries
        .iter()
        .map(|(host, root)| (host.to_string(), root.path.clone()))
        .collect();
    Arc::new(VirtualHosts::new(roots))
}
