//! Service-account configuration for processes running inside a pod

use crate::{ClusterConfig, ClusterProvider};
use gate_error::{Category, CategoryExt, ErrorEnvelope, Result, ResultExt};
use std::path::{Path, PathBuf};

pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
pub const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Reads the API server address from the environment and the credentials
/// from the mounted service account.
#[derive(Debug, Clone)]
pub struct InCluster {
    host: Option<String>,
    port: Option<String>,
    account_dir: PathBuf,
}

impl InCluster {
    pub fn new(host: Option<String>, port: Option<String>, account_dir: impl Into<PathBuf>) -> Self {
        Self {
            host,
            port,
            account_dir: account_dir.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var(SERVICE_HOST_ENV).ok(),
            std::env::var(SERVICE_PORT_ENV).ok(),
            SERVICE_ACCOUNT_DIR,
        )
    }

    fn rest_config(&self) -> Result<ClusterConfig> {
        let (host, port) = match (self.host.as_deref(), self.port.as_deref()) {
            (Some(host), Some(port)) if !host.is_empty() && !port.is_empty() => (host, port),
            _ => {
                return Err(ErrorEnvelope::from_detail(
                    Category::Internal,
                    format!(
                        "unable to load in-cluster configuration, {} and {} must be defined",
                        SERVICE_HOST_ENV, SERVICE_PORT_ENV
                    ),
                )
                .with_operation("incluster.rest_config.env")
                .into())
            }
        };

        let token_path = self.account_dir.join("token");
        let token = read_token(&token_path)?;

        let ca_path = self.account_dir.join("ca.crt");
        let ca_cert = ca_path.exists().then_some(ca_path);

        Ok(ClusterConfig {
            host: server_url(host, port),
            token: Some(token),
            ca_cert,
            kubeconfig: None,
        })
    }
}

impl ClusterProvider for InCluster {
    fn client(&self) -> Result<ClusterConfig> {
        self.rest_config().operation("incluster.client")
    }
}

fn read_token(path: &Path) -> Result<String> {
    let token = std::fs::read_to_string(path)
        .category(Category::Internal)
        .operation("incluster.read_token")
        .meta("path", path.display().to_string())?;

    let token = token.trim();
    if token.is_empty() {
        return Err(ErrorEnvelope::from_detail(Category::IllegalParam, "service account token is empty")
            .with_operation("incluster.read_token")
            .with_meta("path", path.display().to_string())
            .into());
    }
    Ok(token.to_string())
}

fn server_url(host: &str, port: &str) -> String {
    if host.contains(':') {
        format!("https://[{}]:{}", host, port)
    } else {
        format!("https://{}:{}", host, port)
    }
}
