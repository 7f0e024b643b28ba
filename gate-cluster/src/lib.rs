//! # gate-cluster
//!
//! Acquires the connection settings for a Kubernetes cluster, either from the
//! pod's service account (in-cluster) or from a kubeconfig file.
//!
//! Every failure is an envelope: classified where it happens, tagged with
//! the operation of each layer it crosses.

pub mod incluster;
pub mod outofcluster;

pub use incluster::InCluster;
pub use outofcluster::OutOfCluster;

use gate_error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Connection settings for a cluster API server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// API server URL
    pub host: String,
    /// Bearer token, when authenticating as a service account
    pub token: Option<String>,
    /// CA bundle used to verify the API server
    pub ca_cert: Option<PathBuf>,
    /// Kubeconfig the settings were read from
    pub kubeconfig: Option<PathBuf>,
}

/// Source of cluster connection settings
pub trait ClusterProvider {
    fn client(&self) -> Result<ClusterConfig>;
}

/// How the process reaches its cluster
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterMode {
    #[default]
    InCluster,
    OutOfCluster {
        #[serde(default)]
        kubeconfig: Option<PathBuf>,
    },
}

/// Build the provider for a mode, reading the process environment
pub fn provider(mode: &ClusterMode) -> Box<dyn ClusterProvider> {
    tracing::debug!(?mode, "selecting cluster provider");
    match mode {
        ClusterMode::InCluster => Box::new(InCluster::from_env()),
        ClusterMode::OutOfCluster { kubeconfig } => Box::new(OutOfCluster::from_env(kubeconfig.clone())),
    }
}
