//! Kubeconfig-based configuration for processes outside the cluster

use crate::{ClusterConfig, ClusterProvider};
use gate_error::{Category, CategoryExt, ErrorEnvelope, Result, ResultExt};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// The parts of a kubeconfig needed to reach the API server
#[derive(Debug, Deserialize)]
struct Kubeconfig {
    #[serde(default)]
    clusters: Vec<NamedCluster>,
    #[serde(default)]
    contexts: Vec<NamedContext>,
    #[serde(rename = "current-context", default)]
    current_context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedCluster {
    #[serde(default)]
    name: String,
    cluster: ClusterEntry,
}

#[derive(Debug, Deserialize)]
struct ClusterEntry {
    server: String,
    #[serde(rename = "certificate-authority", default)]
    certificate_authority: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct NamedContext {
    name: String,
    context: ContextEntry,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    cluster: String,
}

impl Kubeconfig {
    /// The cluster of `current-context`, or the only cluster when no context is selected
    fn current_cluster(&self) -> Result<&ClusterEntry> {
        let current = self.current_context.as_deref().filter(|name| !name.is_empty());

        let Some(current) = current else {
            return match self.clusters.as_slice() {
                [only] => Ok(&only.cluster),
                [] => Err(ErrorEnvelope::from_detail(Category::Parse, "kubeconfig defines no cluster").into()),
                _ => Err(ErrorEnvelope::from_detail(
                    Category::IllegalParam,
                    "kubeconfig defines several clusters but no current-context",
                )
                .into()),
            };
        };

        let context = self
            .contexts
            .iter()
            .find(|context| context.name == current)
            .ok_or_else(|| {
                ErrorEnvelope::from_detail(
                    Category::IllegalParam,
                    format!("context '{}' not found in kubeconfig", current),
                )
                .with_meta("context", current)
            })?;

        self.clusters
            .iter()
            .find(|cluster| cluster.name == context.context.cluster)
            .map(|cluster| &cluster.cluster)
            .ok_or_else(|| {
                ErrorEnvelope::from_detail(
                    Category::IllegalParam,
                    format!("cluster '{}' not found in kubeconfig", context.context.cluster),
                )
                .with_meta("context", current)
                .into()
            })
    }
}

/// Reads the API server of the current context in a kubeconfig
#[derive(Debug, Clone)]
pub struct OutOfCluster {
    kubeconfig: Option<PathBuf>,
}

impl OutOfCluster {
    pub fn new(kubeconfig: impl Into<PathBuf>) -> Self {
        Self {
            kubeconfig: Some(kubeconfig.into()),
        }
    }

    /// Explicit path first, then `$KUBECONFIG`, then `~/.kube/config`
    pub fn from_env(explicit: Option<PathBuf>) -> Self {
        let kubeconfig = explicit
            .or_else(|| std::env::var_os(KUBECONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".kube").join("config"))
            });
        Self { kubeconfig }
    }

    fn rest_config(&self) -> Result<ClusterConfig> {
        let path = match &self.kubeconfig {
            Some(path) => path,
            None => {
                return Err(ErrorEnvelope::from_detail(
                    Category::IllegalParam,
                    "no kubeconfig path given and HOME is not set",
                )
                .with_operation("outofcluster.rest_config")
                .into())
            }
        };

        let contents = std::fs::read_to_string(path)
            .operation("outofcluster.read_kubeconfig")
            .meta("path", path.display().to_string())?;

        let kubeconfig: Kubeconfig = serde_yaml::from_str(&contents)
            .category(Category::Parse)
            .operation("outofcluster.parse_kubeconfig")
            .meta("path", path.display().to_string())?;

        let cluster = kubeconfig
            .current_cluster()
            .operation("outofcluster.rest_config")
            .meta("path", path.display().to_string())?;

        if cluster.server.is_empty() {
            return Err(ErrorEnvelope::from_detail(Category::Parse, "cluster server is empty")
                .with_operation("outofcluster.rest_config")
                .with_meta("path", path.display().to_string())
                .into());
        }

        Ok(ClusterConfig {
            host: cluster.server.clone(),
            token: None,
            ca_cert: cluster.certificate_authority.clone(),
            kubeconfig: Some(path.to_path_buf()),
        })
    }

    pub fn kubeconfig(&self) -> Option<&Path> {
        self.kubeconfig.as_deref()
    }
}

impl ClusterProvider for OutOfCluster {
    fn client(&self) -> Result<ClusterConfig> {
        self.rest_config().operation("outofcluster.client")
    }
}
