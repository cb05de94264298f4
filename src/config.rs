use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::http::connection::DEFAULT_IDLE_TIMEOUT;
use crate::http::vhost::VirtualHosts;

const DEFAULT_CONFIG_PATH: &str = "vhttpd.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub virtual_hosts: HashMap<String, PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_idle_timeout_secs() -> u64 {
    DEFAULT_IDLE_TIMEOUT.as_secs()
}

impl Config {
    /// Loads the file named by `VHTTPD_CONFIG` (default `vhttpd.yaml`).
    /// `LISTEN` overrides the listen address.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("VHTTPD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Self::from_file(&path)?;

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Checks every document root is an existing directory and makes each
    /// path absolute.
    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.virtual_hosts.is_empty() {
            bail!("no virtual hosts configured");
        }

        for (host, root) in self.virtual_hosts.iter_mut() {
            let abs = std::fs::canonicalize(&*root)
                .with_context(|| format!("doc root {} for host {host:?}", root.display()))?;
            if !abs.is_dir() {
                bail!("doc root {} for host {host:?} is not a directory", abs.display());
            }
            *root = abs;
        }

        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.idle_timeout_secs)
    }

    pub fn virtual_hosts(&self) -> VirtualHosts {
        VirtualHosts::new(self.virtual_hosts.clone())
    }
}
